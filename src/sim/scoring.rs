//! Score and combo updates for resolved drops
//!
//! Both resolution paths (bucket collision during a tick, and a direct click)
//! funnel through [`resolve_catch`], which checks and sets the drop's
//! `resolved` flag before touching any score.

use super::state::{ComboBreak, DropKind, GameEvent, GameSession};
use crate::consts::*;

/// Result of one scored catch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatchOutcome {
    pub id: u32,
    pub kind: DropKind,
    /// Net score change, bonus included (negative for pollutants)
    pub delta: i32,
    /// Combo bonus part of `delta`
    pub bonus: u32,
    /// Combo after the catch
    pub combo: u32,
}

/// Score the drop at `index` as caught. No-op (None) if it was already resolved.
pub fn resolve_catch(state: &mut GameSession, index: usize) -> Option<CatchOutcome> {
    let drop = state.drops.get_mut(index)?;
    if drop.resolved {
        return None;
    }
    drop.resolved = true;
    let (id, kind) = (drop.id, drop.kind);

    let before = state.score;
    let now = state.now_ms;
    let mut bonus = 0;
    match kind {
        DropKind::Water | DropKind::Golden => {
            let points = if kind == DropKind::Golden {
                state.stats.golden_caught += 1;
                GOLDEN_POINTS
            } else {
                state.stats.water_caught += 1;
                WATER_POINTS
            };
            bonus = state.combo.on_catch(now);
            state.score += points + bonus;
        }
        DropKind::Pollutant => {
            state.stats.pollutants_caught += 1;
            state.score = state.score.saturating_sub(POLLUTANT_PENALTY);
            if state.combo.on_pollutant() {
                state.events.push(GameEvent::ComboBroken {
                    reason: ComboBreak::Pollutant,
                });
            }
        }
    }

    let delta = state.score as i32 - before as i32;
    let combo = state.combo.combo;
    state.events.push(GameEvent::Caught {
        id,
        kind,
        delta,
        combo,
    });

    let text = match kind {
        DropKind::Water => format!("Great! +{}", WATER_POINTS),
        DropKind::Golden => format!("Golden! +{}", GOLDEN_POINTS),
        DropKind::Pollutant => format!("Pollutant! -{}", POLLUTANT_PENALTY),
    };
    let text = if bonus > 0 {
        format!("{} Combo x{}! +{}", text, combo, bonus)
    } else {
        text
    };
    state.show_feedback(text, kind.is_collectible());

    log::debug!(
        "Caught {} drop {}: score {} -> {} (combo {})",
        kind.as_str(),
        id,
        before,
        state.score,
        combo
    );

    Some(CatchOutcome {
        id,
        kind,
        delta,
        bonus,
        combo,
    })
}

/// Direct-interaction catch by drop id, ignoring the catch window
pub fn catch_by_id(state: &mut GameSession, id: u32) -> Option<CatchOutcome> {
    if !state.active {
        return None;
    }
    let index = state.drops.iter().position(|d| d.id == id)?;
    resolve_catch(state, index)
}

/// Mark the drop at `index` as missed. Returns true if this call resolved it.
pub fn resolve_miss(state: &mut GameSession, index: usize) -> bool {
    let Some(drop) = state.drops.get_mut(index) else {
        return false;
    };
    if drop.resolved {
        return false;
    }
    drop.resolved = true;
    let (id, kind) = (drop.id, drop.kind);

    if kind.is_collectible() {
        state.stats.drops_missed += 1;
        if state.combo.on_miss() {
            state.events.push(GameEvent::ComboBroken {
                reason: ComboBreak::Missed,
            });
        }
    }
    state.events.push(GameEvent::Missed { id, kind });
    true
}
