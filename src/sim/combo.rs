//! Combo / streak state machine
//!
//! Idle (combo 0) -> Building (combo >= 1). Successful catches build the combo;
//! a pollutant, a missed collectible, or [`COMBO_TIMEOUT_MS`] without a catch
//! drops it back to Idle. Timeouts are plain timestamp comparisons against the
//! session's virtual clock.

use crate::consts::COMBO_TIMEOUT_MS;

/// Display tier for a combo value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ComboTier {
    None,
    Nice,
    Great,
    Unstoppable,
}

impl ComboTier {
    pub fn for_combo(combo: u32) -> Self {
        match combo {
            0..=1 => ComboTier::None,
            2..=3 => ComboTier::Nice,
            4..=6 => ComboTier::Great,
            _ => ComboTier::Unstoppable,
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            ComboTier::None => None,
            ComboTier::Nice => Some("Nice combo!"),
            ComboTier::Great => Some("Great combo!"),
            ComboTier::Unstoppable => Some("Unstoppable!"),
        }
    }

    /// Visual intensity (0-1)
    pub fn intensity(&self) -> f32 {
        match self {
            ComboTier::None => 0.0,
            ComboTier::Nice => 0.4,
            ComboTier::Great => 0.7,
            ComboTier::Unstoppable => 1.0,
        }
    }
}

/// Consecutive-catch tracking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComboTracker {
    pub combo: u32,
    /// Parallel counter; resets on the same paths as the combo
    pub streak: u32,
    /// Highest combo reached this round
    pub best_combo: u32,
    /// Virtual time of the last catch event
    pub last_event_ms: Option<u64>,
}

impl ComboTracker {
    /// Register a water/golden catch. Returns the combo bonus earned.
    ///
    /// Every catch that leaves the combo at 2 or more pays `combo - 1`.
    pub fn on_catch(&mut self, now_ms: u64) -> u32 {
        self.combo += 1;
        self.streak += 1;
        self.best_combo = self.best_combo.max(self.combo);
        self.last_event_ms = Some(now_ms);
        if self.combo >= 2 { self.combo - 1 } else { 0 }
    }

    /// Register a pollutant catch. Returns true if a running combo was broken.
    pub fn on_pollutant(&mut self) -> bool {
        let broke = self.combo > 0;
        self.combo = 0;
        self.streak = 0;
        broke
    }

    /// Register a missed water/golden drop. Returns true if a combo was broken.
    pub fn on_miss(&mut self) -> bool {
        let broke = self.combo > 0;
        self.combo = 0;
        self.streak = 0;
        broke
    }

    /// Reset the combo if no catch happened within the timeout.
    /// Returns true if it decayed on this call.
    pub fn expire(&mut self, now_ms: u64) -> bool {
        if self.combo == 0 {
            return false;
        }
        match self.last_event_ms {
            Some(last) if now_ms.saturating_sub(last) >= COMBO_TIMEOUT_MS => {
                self.combo = 0;
                self.streak = 0;
                true
            }
            _ => false,
        }
    }

    pub fn tier(&self) -> ComboTier {
        ComboTier::for_combo(self.combo)
    }

    pub fn is_idle(&self) -> bool {
        self.combo == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bonus_compounds() {
        let mut combo = ComboTracker::default();
        assert_eq!(combo.on_catch(0), 0);
        assert_eq!(combo.on_catch(100), 1);
        assert_eq!(combo.on_catch(200), 2);
        assert_eq!(combo.on_catch(300), 3);
        assert_eq!(combo.combo, 4);
        assert_eq!(combo.streak, 4);
        assert_eq!(combo.best_combo, 4);
    }

    #[test]
    fn test_pollutant_resets() {
        let mut combo = ComboTracker::default();
        for t in 0..4 {
            combo.on_catch(t * 100);
        }
        assert!(combo.on_pollutant());
        assert!(combo.is_idle());
        assert_eq!(combo.streak, 0);
        assert_eq!(combo.best_combo, 4);
        assert!(!combo.on_pollutant(), "already idle");
    }

    #[test]
    fn test_miss_resets() {
        let mut combo = ComboTracker::default();
        combo.on_catch(0);
        combo.on_catch(10);
        assert!(combo.on_miss());
        assert_eq!(combo.combo, 0);
        assert_eq!(combo.streak, 0);
    }

    #[test]
    fn test_timeout_resets() {
        let mut combo = ComboTracker::default();
        combo.on_catch(1000);
        combo.on_catch(2000);

        assert!(!combo.expire(2000 + COMBO_TIMEOUT_MS - 1));
        assert_eq!(combo.combo, 2);

        assert!(combo.expire(2000 + COMBO_TIMEOUT_MS));
        assert_eq!(combo.combo, 0);
        assert_eq!(combo.streak, 0);
        assert!(!combo.expire(10_000));
    }

    #[test]
    fn test_pollutant_leaves_timeout_clock() {
        let mut combo = ComboTracker::default();
        combo.on_catch(1000);
        combo.on_pollutant();
        assert_eq!(combo.last_event_ms, Some(1000));

        combo.on_catch(5000);
        assert!(!combo.expire(5000 + COMBO_TIMEOUT_MS - 1));
        assert!(combo.expire(5000 + COMBO_TIMEOUT_MS));
        assert_eq!(combo.streak, 0);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(ComboTier::for_combo(0), ComboTier::None);
        assert_eq!(ComboTier::for_combo(1), ComboTier::None);
        assert_eq!(ComboTier::for_combo(3), ComboTier::Nice);
        assert_eq!(ComboTier::for_combo(4), ComboTier::Great);
        assert_eq!(ComboTier::for_combo(12), ComboTier::Unstoppable);
        assert!(ComboTier::Great.intensity() > ComboTier::Nice.intensity());
        assert_eq!(ComboTier::None.message(), None);
    }
}
