//! Persisted best score
//!
//! Read once at startup, written only when a round beats it.

use crate::persistence::KeyValueStore;

/// The best score recorded on this device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScoreRecord {
    pub value: u32,
}

impl HighScoreRecord {
    /// Store key
    pub const STORAGE_KEY: &'static str = "cw_highscore";

    pub fn new(value: u32) -> Self {
        Self { value }
    }

    /// Load the record. Any read failure means "no high score recorded".
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(value)) => {
                // Negative or oversized values can only come from tampering
                let value = value.clamp(0, u32::MAX as i64) as u32;
                log::info!("Loaded high score: {}", value);
                Self { value }
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("High score unavailable ({}), starting fresh", e);
                Self::default()
            }
        }
    }

    /// Whether a score would replace the record
    pub fn is_beaten_by(&self, score: u32) -> bool {
        score > self.value
    }

    /// Record a finished round's score. Returns true if it set a new record.
    ///
    /// The in-memory record is updated even when the write fails.
    pub fn submit(&mut self, score: u32, store: &mut dyn KeyValueStore) -> bool {
        if !self.is_beaten_by(score) {
            return false;
        }

        self.value = score;
        match store.set(Self::STORAGE_KEY, score as i64) {
            Ok(()) => log::info!("New high score saved: {}", score),
            Err(e) => log::warn!("High score {} not saved: {}", score, e),
        }
        true
    }
}
