//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time/ticks (host frame timestamps to virtual clock deltas)
//! - Storage (LocalStorage on web)

#[cfg(target_arch = "wasm32")]
pub mod storage;

use crate::consts::MAX_FRAME_MS;

/// Nominal frame time used for the first frame
pub const NOMINAL_FRAME_MS: u64 = 16;

/// Converts host frame timestamps (ms, e.g. `requestAnimationFrame` time)
/// into clamped deltas for the simulation
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta since the previous frame
    pub fn delta_ms(&mut self, time: f64) -> u64 {
        let dt = match self.last_time {
            Some(last) if time >= last => (time - last).round() as u64,
            // First frame, or the host clock went backwards
            _ => NOMINAL_FRAME_MS,
        };
        self.last_time = Some(time);
        dt.min(MAX_FRAME_MS)
    }

    /// Forget the previous timestamp (after a pause or tab switch)
    pub fn reset(&mut self) {
        self.last_time = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_deltas() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta_ms(1000.0), NOMINAL_FRAME_MS);
        assert_eq!(clock.delta_ms(1016.6), 17);
        assert_eq!(clock.delta_ms(5000.0), MAX_FRAME_MS);
        assert_eq!(clock.delta_ms(4000.0), NOMINAL_FRAME_MS);

        clock.reset();
        assert_eq!(clock.delta_ms(9000.0), NOMINAL_FRAME_MS);
    }
}
