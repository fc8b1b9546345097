//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual clock only (frame deltas in, no wall-clock reads)
//! - Seeded RNG only
//! - Stable iteration order (by drop ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod combo;
pub mod scoring;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{catch_window, in_catch_window, is_caught, is_missed, overlaps_horizontally};
pub use combo::{ComboTier, ComboTracker};
pub use scoring::{CatchOutcome, catch_by_id, resolve_catch, resolve_miss};
pub use spawn::{base_speed_range, roll_kind, spawn_drop};
pub use state::{
    Catcher, ComboBreak, DropKind, FallingDrop, Feedback, Field, GameEvent, GameSession,
    RoundStats, Schedule,
};
pub use tick::{TickInput, TickOutcome, tick};
