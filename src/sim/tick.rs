//! Per-frame simulation tick
//!
//! One call per display frame. The frame delta only drives the virtual clock
//! (spawn cadence, round timer, combo and feedback expiry); drops move a fixed
//! `fall_speed` per tick regardless of the delta.

use super::collision::{is_caught, is_missed};
use super::scoring::{catch_by_id, resolve_catch, resolve_miss};
use super::spawn::spawn_drop;
use super::state::{ComboBreak, GameEvent, GameSession};
use crate::consts::MAX_FRAME_MS;

/// Input gathered since the previous frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest field-relative pointer x
    pub pointer_x: Option<f32>,
    /// Arrow key presses
    pub nudge_left: u32,
    pub nudge_right: u32,
    /// Drops clicked/tapped directly
    pub clicked: Vec<u32>,
}

impl TickInput {
    /// Clear one-shot inputs after a frame consumed them
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// What the round controller needs to know after a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// The clock reached zero this tick
    pub time_up: bool,
}

/// Advance the session by one frame of `dt_ms` virtual milliseconds
pub fn tick(state: &mut GameSession, input: &TickInput, dt_ms: u64) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    if !state.active {
        return outcome;
    }

    state.now_ms += dt_ms.min(MAX_FRAME_MS);
    let now = state.now_ms;

    if state.combo.expire(now) {
        state.events.push(GameEvent::ComboBroken {
            reason: ComboBreak::Timeout,
        });
    }
    if state.feedback.as_ref().is_some_and(|f| now >= f.expires_at_ms) {
        state.feedback = None;
    }

    // Catcher input
    let field = state.field;
    if let Some(x) = input.pointer_x {
        state.catcher.follow_pointer(x, &field);
    }
    let steps = input.nudge_right as i32 - input.nudge_left as i32;
    if steps != 0 {
        state.catcher.nudge(steps, &field);
    }

    for &id in &input.clicked {
        catch_by_id(state, id);
    }

    // Spawn cadence
    let spawns = state.spawn_schedule.poll(now);
    for _ in 0..spawns {
        if !state.active {
            break;
        }
        spawn_drop(state);
    }

    // Motion, then catch before miss for every drop
    for i in 0..state.drops.len() {
        if state.drops[i].resolved {
            continue;
        }
        state.drops[i].fall();
        if is_caught(&state.drops[i], &state.catcher, &field) {
            resolve_catch(state, i);
        } else if is_missed(&state.drops[i], &field) {
            resolve_miss(state, i);
        }
    }
    state.drops.retain(|d| !d.resolved);

    // Round clock
    let seconds = state.clock_schedule.poll(now);
    for _ in 0..seconds {
        if !state.active || state.time_remaining == 0 {
            break;
        }
        state.time_remaining -= 1;
        state.events.push(GameEvent::ClockTick {
            remaining: state.time_remaining,
        });
        if state.time_remaining == 0 {
            state.cancel_schedules();
            state.events.push(GameEvent::TimeUp);
            outcome.time_up = true;
        }
    }

    outcome
}
