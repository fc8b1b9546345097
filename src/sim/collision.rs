//! Catch detection
//!
//! Axis-aligned only: a drop is catchable while its bottom edge sits in a
//! narrow band around the bucket, and is caught if the half-open horizontal
//! intervals `[left, right)` of drop and bucket intersect.

use super::state::{Catcher, FallingDrop, Field};
use crate::consts::{CATCH_MARGIN, CATCH_TOLERANCE};

/// Vertical band (top, bottom) a drop's bottom edge must lie in to be caught
pub fn catch_window(catcher: &Catcher, field: &Field) -> (f32, f32) {
    (
        field.height - catcher.height - CATCH_MARGIN,
        field.height + CATCH_TOLERANCE,
    )
}

/// Drop bottom inside the catch band
pub fn in_catch_window(drop: &FallingDrop, catcher: &Catcher, field: &Field) -> bool {
    let (top, bottom) = catch_window(catcher, field);
    let y = drop.bottom();
    y >= top && y <= bottom
}

/// Half-open interval overlap on x
pub fn overlaps_horizontally(drop: &FallingDrop, catcher: &Catcher) -> bool {
    drop.right() > catcher.left() && drop.left() < catcher.right()
}

/// Whether the bucket catches this drop this tick
pub fn is_caught(drop: &FallingDrop, catcher: &Catcher, field: &Field) -> bool {
    !drop.resolved && in_catch_window(drop, catcher, field) && overlaps_horizontally(drop, catcher)
}

/// The drop's top edge has passed the bottom of the field
pub fn is_missed(drop: &FallingDrop, field: &Field) -> bool {
    !drop.resolved && drop.pos.y > field.height
}
