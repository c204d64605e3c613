//! Per-tick orchestration.
//!
//! [`game_tick`] processes a single 100ms meditation tick. It banks exp, and
//! once per second counts play time, recovers hp and feeds the daily quests.
//! Then the breakthrough machine looks at the result. It returns a
//! [`TickResult`] so the host can print what happened without the game logic
//! knowing about the terminal.

use crate::character::realm::RealmPosition;
use crate::core::collaborators::{DeathFlow, QuestSink, SaveSink};
use crate::core::constants::TICKS_PER_SECOND;
use crate::core::game_logic::{apply_exp, exp_gain_per_tick, meditation_regen};
use crate::core::session::GameSession;
use crate::quests::QuestKind;
use crate::tribulation::Transition;

/// Something the host may want to show.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    LevelUp {
        from: RealmPosition,
        to: RealmPosition,
        message: String,
    },
    /// Entered a new realm.
    Breakthrough {
        from: RealmPosition,
        to: RealmPosition,
        hp_loss: u32,
        message: String,
    },
    BreakthroughBlocked { message: String },
    /// The host should ask the player to face the tribulation.
    TribulationPending {
        target: RealmPosition,
        strikes: u32,
        reveal_delay_ms: u64,
        message: String,
    },
    PeakReached { message: String },
    Died { reason: String, message: String },
}

impl TickEvent {
    /// Maps a machine transition to the event a host shows for it.
    pub fn from_transition(transition: &Transition) -> Option<TickEvent> {
        match transition {
            Transition::Advanced {
                from, to, hp_loss, ..
            } => {
                if from.realm != to.realm {
                    let mut message = format!("Breakthrough! You have reached {}.", to);
                    if *hp_loss > 0 {
                        message.push_str(&format!(" The lightning cost you {} hp.", hp_loss));
                    }
                    Some(TickEvent::Breakthrough {
                        from: *from,
                        to: *to,
                        hp_loss: *hp_loss,
                        message,
                    })
                } else {
                    Some(TickEvent::LevelUp {
                        from: *from,
                        to: *to,
                        message: format!("Your cultivation deepens: {}.", to),
                    })
                }
            }
            Transition::Blocked { message, .. } => Some(TickEvent::BreakthroughBlocked {
                message: message.clone(),
            }),
            Transition::AwaitingConfirmation(pending) => Some(TickEvent::TribulationPending {
                target: pending.target,
                strikes: pending.strikes,
                reveal_delay_ms: pending.reveal_delay_ms,
                message: format!(
                    "Storm clouds gather. {} bolts of heavenly lightning stand between you and {}.",
                    pending.strikes, pending.target
                ),
            }),
            Transition::Terminal { player } => Some(TickEvent::PeakReached {
                message: format!("{} stands at the peak of cultivation.", player.character_name),
            }),
            Transition::Died { reason, .. } => Some(TickEvent::Died {
                reason: reason.clone(),
                message: format!("You died: {}.", reason),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    pub exp_gained: u64,
    pub events: Vec<TickEvent>,
}

/// Runs one tick against the session.
pub fn game_tick<S: SaveSink, D: DeathFlow, Q: QuestSink>(
    session: &mut GameSession<S, D, Q>,
) -> TickResult {
    let mut result = TickResult::default();

    let gain = exp_gain_per_tick(session.player()) + session.exp_carry;
    let whole = gain.floor();
    session.exp_carry = gain - whole;
    result.exp_gained = whole as u64;

    let mut next = apply_exp(session.player(), result.exp_gained);

    session.tick_counter += 1;
    if session.tick_counter >= TICKS_PER_SECOND {
        session.tick_counter = 0;
        next.play_time_seconds += 1;
        let regen = meditation_regen(&next);
        next.attributes.heal(regen);
        session.record_quest(QuestKind::Meditate, 1);
    }

    let transition = session.replace_player(next);
    result.events.extend(TickEvent::from_transition(&transition));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::death::ReviveWithPenalty;
    use crate::character::realm::Realm;
    use crate::core::collaborators::{NoQuests, NoSave};
    use crate::core::game_state::PlayerState;
    use crate::tribulation::BreakthroughMachine;

    fn session(player: PlayerState) -> GameSession<NoSave, ReviveWithPenalty, NoQuests> {
        GameSession::new(
            player,
            BreakthroughMachine::default(),
            NoSave,
            ReviveWithPenalty::default(),
            NoQuests,
        )
    }

    #[test]
    fn test_tick_banks_exp() {
        let mut s = session(PlayerState::new("Test".to_string(), 0));
        let result = game_tick(&mut s);
        assert_eq!(result.exp_gained, 1);
        assert_eq!(s.player().exp, 1);
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_play_time_counts_whole_seconds() {
        let mut s = session(PlayerState::new("Test".to_string(), 0));
        for _ in 0..TICKS_PER_SECOND - 1 {
            game_tick(&mut s);
        }
        assert_eq!(s.player().play_time_seconds, 0);
        game_tick(&mut s);
        assert_eq!(s.player().play_time_seconds, 1);
    }

    #[test]
    fn test_meditation_recovers_hp() {
        let mut p = PlayerState::new("Test".to_string(), 0);
        p.attributes.wound(50);
        let mut s = session(p);
        for _ in 0..TICKS_PER_SECOND * 3 {
            game_tick(&mut s);
        }
        assert_eq!(s.player().attributes.hp, 53);
    }

    #[test]
    fn test_tick_reports_level_up() {
        let mut p = PlayerState::new("Test".to_string(), 0);
        p.exp = p.max_exp - 1;
        let mut s = session(p);

        let result = game_tick(&mut s);
        assert!(matches!(
            result.events.as_slice(),
            [TickEvent::LevelUp { .. }]
        ));
        assert_eq!(s.player().realm_level, 2);
    }

    #[test]
    fn test_tick_reports_pending_tribulation_once() {
        let mut p = PlayerState::new("Test".to_string(), 0);
        p.realm_level = 9;
        p.max_exp = crate::core::game_logic::exp_for_level(p.position());
        p.exp = p.max_exp - 1;
        let mut s = session(p);

        let first = game_tick(&mut s);
        assert!(matches!(
            first.events.as_slice(),
            [TickEvent::TribulationPending { strikes: 3, .. }]
        ));
        // Waiting on the player; meditation continues silently
        let second = game_tick(&mut s);
        assert!(second.events.is_empty());
        assert_eq!(s.player().realm, Realm::QiRefining);
    }
}
