//! Drop Catcher - A falling-drop arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, catching, combos)
//! - `round`: Round lifecycle, difficulty lock and high score handling
//! - `persistence`: Key-value store abstraction (LocalStorage on web)
//! - `platform`: Browser/native platform adapters
//! - `audio`: Sound effects for simulation events

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod round;
pub mod settings;
pub mod sim;

pub use highscores::HighScoreRecord;
pub use persistence::{KeyValueStore, MemoryStore, StoreError};
pub use round::{RoundController, RoundError, RoundPhase, RoundSummary};
pub use settings::{Difficulty, DifficultyProfile, Settings};

/// Game configuration constants
pub mod consts {
    /// Default play field dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 320.0;
    pub const FIELD_HEIGHT: f32 = 480.0;

    /// Falling object size
    pub const DROP_WIDTH: f32 = 36.0;
    pub const DROP_HEIGHT: f32 = 48.0;

    /// Catcher (bucket) size
    pub const CATCHER_WIDTH: f32 = 80.0;
    pub const CATCHER_HEIGHT: f32 = 40.0;
    /// Horizontal step for one arrow key press
    pub const CATCHER_NUDGE: f32 = 24.0;

    /// Catch window: how far above the catcher top a drop bottom may be
    pub const CATCH_MARGIN: f32 = 4.0;
    /// Catch window: leeway below the field bottom
    pub const CATCH_TOLERANCE: f32 = 8.0;

    /// Clock tick period
    pub const CLOCK_INTERVAL_MS: u64 = 1000;
    /// Combo decays if no catch happens within this window
    pub const COMBO_TIMEOUT_MS: u64 = 1800;
    /// How long catch feedback text stays visible
    pub const FEEDBACK_DURATION_MS: u64 = 800;
    /// Largest frame delta fed to the virtual clock (tab-switch guard)
    pub const MAX_FRAME_MS: u64 = 100;

    /// Probability that a spawn is a golden drop
    pub const GOLDEN_CHANCE: f64 = 0.08;
    /// Probability of water (vs pollutant) among non-golden spawns
    pub const WATER_CHANCE: f64 = 0.7;

    /// Points
    pub const WATER_POINTS: u32 = 1;
    pub const GOLDEN_POINTS: u32 = 5;
    pub const POLLUTANT_PENALTY: u32 = 2;
}
