//! Spawn policy: what falls, where, and how fast

use std::ops::Range;

use glam::Vec2;
use rand::Rng;

use super::state::{DropKind, GameSession};
use crate::consts::*;

/// Base fall speed range (pixels per tick) before the difficulty multiplier
pub fn base_speed_range(kind: DropKind) -> Range<f32> {
    match kind {
        DropKind::Water | DropKind::Golden => 1.7..2.4,
        DropKind::Pollutant => 1.3..2.0,
    }
}

/// Weighted kind roll: golden first, then water/pollutant from the rest
pub fn roll_kind<R: Rng>(rng: &mut R) -> DropKind {
    if rng.random_bool(GOLDEN_CHANCE) {
        DropKind::Golden
    } else if rng.random_bool(WATER_CHANCE) {
        DropKind::Water
    } else {
        DropKind::Pollutant
    }
}

/// Spawn one drop above the visible field. Returns its id.
pub fn spawn_drop(state: &mut GameSession) -> u32 {
    let kind = roll_kind(&mut state.rng);
    let max_x = (state.field.width - DROP_WIDTH).max(0.0);
    let x = state.rng.random_range(0.0..=max_x).floor();
    let speed =
        state.rng.random_range(base_speed_range(kind)) * state.profile.fall_speed_multiplier;

    let id = state.insert_drop(kind, Vec2::new(x, -DROP_HEIGHT), speed);
    log::debug!("Spawned {} drop {} at x={} speed={:.2}", kind.as_str(), id, x, speed);
    id
}
