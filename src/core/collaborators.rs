//! Seams between the game session and the systems around it.
//!
//! The session only knows these traits; the terminal host, the simulator and
//! the tests each plug in their own implementations.

use crate::core::game_state::PlayerState;
use crate::quests::QuestKind;

/// Persistence. Called after every committed change; implementations decide
/// when to actually write.
pub trait SaveSink {
    fn request_save(&mut self, player: &PlayerState);
}

/// Death detection and revival. Receives the dead player (hp 0, death reason
/// set) and returns the record to continue with.
pub trait DeathFlow {
    fn handle_death(&mut self, player: &PlayerState) -> PlayerState;
}

/// Fire-and-forget daily quest progress.
pub trait QuestSink {
    fn record_progress(&mut self, kind: QuestKind, amount: u32);
}

/// Discards every save request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSave;

impl SaveSink for NoSave {
    fn request_save(&mut self, _player: &PlayerState) {}
}

/// Ignores quest progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoQuests;

impl QuestSink for NoQuests {
    fn record_progress(&mut self, _kind: QuestKind, _amount: u32) {}
}
