//! Difficulty presets and player preferences
//!
//! Settings are persisted as JSON in the same key-value store as the high score.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Fixed per-difficulty tuning. Immutable once a round has started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Time between spawns
    pub spawn_interval_ms: u64,
    /// Multiplier applied to every drop's base fall speed
    pub fall_speed_multiplier: f32,
    /// Round length
    pub duration_secs: u32,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                spawn_interval_ms: 950,
                fall_speed_multiplier: 0.8,
                duration_secs: 40,
            },
            Difficulty::Normal => DifficultyProfile {
                spawn_interval_ms: 700,
                fall_speed_multiplier: 1.0,
                duration_secs: 30,
            },
            Difficulty::Hard => DifficultyProfile {
                spawn_interval_ms: 480,
                fall_speed_multiplier: 1.25,
                duration_secs: 22,
            },
        }
    }
}

/// Player preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Difficulty preselected for the next round
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Feedback sounds muted
    #[serde(default)]
    pub muted: bool,
}

impl Settings {
    /// Store key
    pub const STORAGE_KEY: &'static str = "cw_settings";

    /// Load settings, falling back to defaults on any failure
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring corrupt settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Settings unavailable: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Persist settings; failures are logged and skipped
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to encode settings: {}", e);
                return;
            }
        };
        match store.set_item(Self::STORAGE_KEY, &json) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Settings not saved: {}", e),
        }
    }

    /// Flip the mute flag, returning the new value
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }
}
