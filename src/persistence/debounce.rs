//! Coalesces save requests so a burst of commits produces one write.

use super::save_manager::{SaveError, SaveManager};
use crate::core::collaborators::SaveSink;
use crate::core::constants::AUTOSAVE_DEBOUNCE_MS;
use crate::core::game_state::PlayerState;
use std::time::{Duration, Instant};

/// Where a debounced snapshot ends up.
pub trait SaveTarget {
    fn write(&mut self, player: &PlayerState) -> Result<(), SaveError>;
}

/// Stamps the write time so offline progression starts from the last save.
impl SaveTarget for SaveManager {
    fn write(&mut self, player: &PlayerState) -> Result<(), SaveError> {
        let stamped = PlayerState {
            last_save_time: chrono::Utc::now().timestamp(),
            ..player.clone()
        };
        self.save(&stamped)
    }
}

/// Keeps the latest requested snapshot and writes it once the debounce
/// interval has passed since the previous write.
pub struct DebouncedSaver<T: SaveTarget> {
    target: T,
    pending: Option<PlayerState>,
    last_write: Option<Instant>,
    interval: Duration,
    writes: u64,
}

impl<T: SaveTarget> DebouncedSaver<T> {
    pub fn new(target: T) -> Self {
        Self::with_interval(target, Duration::from_millis(AUTOSAVE_DEBOUNCE_MS))
    }

    pub fn with_interval(target: T, interval: Duration) -> Self {
        Self {
            target,
            pending: None,
            last_write: None,
            interval,
            writes: 0,
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of snapshots actually written.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Writes the pending snapshot if the interval has elapsed at `now`.
    /// Returns true when a write happened.
    pub fn flush_due(&mut self, now: Instant) -> bool {
        if self.pending.is_none() {
            return false;
        }
        if let Some(last) = self.last_write {
            if now.saturating_duration_since(last) < self.interval {
                return false;
            }
        }
        self.write_pending(now)
    }

    /// Writes the pending snapshot immediately.
    pub fn flush(&mut self) -> bool {
        self.write_pending(Instant::now())
    }

    fn write_pending(&mut self, now: Instant) -> bool {
        let Some(player) = self.pending.take() else {
            return false;
        };
        self.last_write = Some(now);
        match self.target.write(&player) {
            Ok(()) => {
                self.writes += 1;
                true
            }
            Err(e) => {
                // Keep the snapshot so the next flush retries it
                log::warn!("autosave failed: {}", e);
                self.pending = Some(player);
                false
            }
        }
    }
}

impl<T: SaveTarget> SaveSink for DebouncedSaver<T> {
    fn request_save(&mut self, player: &PlayerState) {
        self.pending = Some(player.clone());
        self.flush_due(Instant::now());
    }
}
