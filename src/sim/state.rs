//! Game state and core simulation types
//!
//! Everything a single round mutates lives in [`GameSession`]; nothing is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::combo::ComboTracker;
use crate::consts::*;
use crate::settings::{Difficulty, DifficultyProfile};

/// Falling object types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropKind {
    Water,
    Pollutant,
    Golden,
}

impl DropKind {
    /// Water and golden drops are worth catching; missing them breaks the combo
    pub fn is_collectible(&self) -> bool {
        !matches!(self, DropKind::Pollutant)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DropKind::Water => "water",
            DropKind::Pollutant => "pollutant",
            DropKind::Golden => "golden",
        }
    }
}

/// A falling object
#[derive(Debug, Clone, PartialEq)]
pub struct FallingDrop {
    pub id: u32,
    pub kind: DropKind,
    /// Top-left corner; x is fixed at spawn
    pub pos: Vec2,
    /// Pixels per tick
    pub fall_speed: f32,
    /// Caught or missed. Set once, never cleared.
    pub resolved: bool,
}

impl FallingDrop {
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + DROP_WIDTH
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + DROP_HEIGHT
    }

    /// Advance one tick
    pub fn fall(&mut self) {
        self.pos.y += self.fall_speed;
    }
}

/// Play field dimensions as reported by the display surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

impl Field {
    /// Fields narrower than the catcher are widened so spawn and clamp ranges stay valid
    pub fn new(width: f32, height: f32) -> Self {
        let width = if width.is_finite() { width } else { FIELD_WIDTH };
        let height = if height.is_finite() { height } else { FIELD_HEIGHT };
        Self {
            width: width.max(CATCHER_WIDTH),
            height: height.max(CATCHER_HEIGHT),
        }
    }
}

/// The player's bucket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Catcher {
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Catcher {
    fn default() -> Self {
        Self {
            x: (FIELD_WIDTH - CATCHER_WIDTH) / 2.0,
            width: CATCHER_WIDTH,
            height: CATCHER_HEIGHT,
        }
    }
}

impl Catcher {
    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Largest legal left edge
    pub fn max_x(&self, field: &Field) -> f32 {
        (field.width - self.width).max(0.0)
    }

    /// Move the left edge to `x`, clamped to the field
    pub fn set_position(&mut self, x: f32, field: &Field) {
        let x = if x.is_nan() { self.x } else { x };
        self.x = x.clamp(0.0, self.max_x(field));
    }

    /// Centre the bucket under a field-relative pointer x
    pub fn follow_pointer(&mut self, pointer_x: f32, field: &Field) {
        self.set_position(pointer_x - self.width / 2.0, field);
    }

    /// Discrete key step; negative steps move left
    pub fn nudge(&mut self, steps: i32, field: &Field) {
        self.set_position(self.x + steps as f32 * CATCHER_NUDGE, field);
    }

    pub fn center(&mut self, field: &Field) {
        self.set_position(self.max_x(field) / 2.0, field);
    }
}

/// A periodic schedule on the virtual clock (the `setInterval` of the sim)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub interval_ms: u64,
    next_due_ms: u64,
    active: bool,
}

impl Schedule {
    /// An inactive schedule
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            next_due_ms: 0,
            active: false,
        }
    }

    /// First fire is one full interval after `now_ms`
    pub fn start(&mut self, now_ms: u64) {
        self.next_due_ms = now_ms + self.interval_ms;
        self.active = true;
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of fires due at `now_ms`. Cancelled schedules never fire.
    pub fn poll(&mut self, now_ms: u64) -> u32 {
        if !self.active {
            return 0;
        }
        let mut fires = 0;
        while now_ms >= self.next_due_ms {
            fires += 1;
            self.next_due_ms += self.interval_ms;
        }
        fires
    }
}

/// Why the combo went back to zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboBreak {
    Pollutant,
    Missed,
    Timeout,
}

/// Notifications for the display and audio surfaces, drained once per frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A drop entered the field
    Spawned { id: u32, kind: DropKind, x: f32 },
    /// A drop was caught; `delta` is the net score change including bonus
    Caught {
        id: u32,
        kind: DropKind,
        delta: i32,
        combo: u32,
    },
    /// A drop fell past the bottom
    Missed { id: u32, kind: DropKind },
    /// Combo reset from a non-zero value
    ComboBroken { reason: ComboBreak },
    /// One second elapsed
    ClockTick { remaining: u32 },
    /// Timer ran out
    TimeUp,
    /// Remaining drops purged at round end
    Cleared { ids: Vec<u32> },
}

/// Transient catch feedback text
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub text: String,
    pub positive: bool,
    pub expires_at_ms: u64,
}

/// Per-round catch counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundStats {
    pub water_caught: u32,
    pub golden_caught: u32,
    pub pollutants_caught: u32,
    pub drops_missed: u32,
    pub drops_spawned: u32,
}

/// State of one round
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Round seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub difficulty: Difficulty,
    pub profile: DifficultyProfile,
    pub field: Field,
    pub catcher: Catcher,
    /// Active drops (ordered by id)
    pub drops: Vec<FallingDrop>,
    pub score: u32,
    pub time_remaining: u32,
    pub active: bool,
    pub combo: ComboTracker,
    /// Virtual clock
    pub now_ms: u64,
    pub spawn_schedule: Schedule,
    pub clock_schedule: Schedule,
    pub feedback: Option<Feedback>,
    pub stats: RoundStats,
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameSession {
    /// Create an inactive session with the catcher re-centred
    pub fn new(seed: u64, difficulty: Difficulty, field: Field, mut catcher: Catcher) -> Self {
        let profile = difficulty.profile();
        catcher.center(&field);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            difficulty,
            profile,
            field,
            catcher,
            drops: Vec::new(),
            score: 0,
            time_remaining: profile.duration_secs,
            active: false,
            combo: ComboTracker::default(),
            now_ms: 0,
            spawn_schedule: Schedule::new(profile.spawn_interval_ms),
            clock_schedule: Schedule::new(CLOCK_INTERVAL_MS),
            feedback: None,
            stats: RoundStats::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Activate and start both periodic schedules
    pub fn begin(&mut self) {
        self.active = true;
        self.spawn_schedule.start(self.now_ms);
        self.clock_schedule.start(self.now_ms);
    }

    pub fn cancel_schedules(&mut self) {
        self.spawn_schedule.cancel();
        self.clock_schedule.cancel();
    }

    /// Deactivate, cancel schedules, then purge every drop
    pub fn shut_down(&mut self) {
        self.cancel_schedules();
        self.active = false;
        if !self.drops.is_empty() {
            let ids = self.drops.iter().map(|d| d.id).collect();
            self.drops.clear();
            self.events.push(GameEvent::Cleared { ids });
        }
    }

    /// Allocate a new drop ID
    pub fn next_drop_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a drop to the active set, returning its id
    pub fn insert_drop(&mut self, kind: DropKind, pos: Vec2, fall_speed: f32) -> u32 {
        let id = self.next_drop_id();
        self.drops.push(FallingDrop {
            id,
            kind,
            pos,
            fall_speed,
            resolved: false,
        });
        self.stats.drops_spawned += 1;
        self.events.push(GameEvent::Spawned { id, kind, x: pos.x });
        id
    }

    pub fn drop_by_id(&self, id: u32) -> Option<&FallingDrop> {
        self.drops.iter().find(|d| d.id == id)
    }

    /// Update field dimensions, keeping the catcher in bounds
    pub fn resize(&mut self, field: Field) {
        self.field = field;
        let x = self.catcher.x;
        self.catcher.set_position(x, &field);
    }

    /// Show feedback text until `FEEDBACK_DURATION_MS` from now
    pub fn show_feedback(&mut self, text: String, positive: bool) {
        self.feedback = Some(Feedback {
            text,
            positive,
            expires_at_ms: self.now_ms + FEEDBACK_DURATION_MS,
        });
    }

    /// Feedback text currently visible, if any
    pub fn feedback_text(&self) -> Option<&str> {
        self.feedback
            .as_ref()
            .filter(|f| self.now_ms < f.expires_at_ms)
            .map(|f| f.text.as_str())
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catcher_clamps() {
        let field = Field::default();
        let mut catcher = Catcher::default();

        catcher.set_position(-50.0, &field);
        assert_eq!(catcher.x, 0.0);

        catcher.set_position(10_000.0, &field);
        assert_eq!(catcher.x, FIELD_WIDTH - CATCHER_WIDTH);

        catcher.set_position(f32::NAN, &field);
        assert_eq!(catcher.x, FIELD_WIDTH - CATCHER_WIDTH);
    }

    proptest::proptest! {
        #[test]
        fn prop_catcher_always_in_bounds(
            x in proptest::num::f32::ANY,
            width in 0.0f32..2000.0,
            steps in -50i32..50,
        ) {
            let field = Field::new(width, FIELD_HEIGHT);
            let mut catcher = Catcher::default();
            catcher.set_position(x, &field);
            proptest::prop_assert!(catcher.x >= 0.0 && catcher.x <= field.width - catcher.width);
            catcher.nudge(steps, &field);
            proptest::prop_assert!(catcher.x >= 0.0 && catcher.x <= field.width - catcher.width);
        }
    }

    #[test]
    fn test_catcher_pointer_and_nudge() {
        let field = Field::default();
        let mut catcher = Catcher::default();

        catcher.follow_pointer(100.0, &field);
        assert_eq!(catcher.x, 60.0);

        catcher.nudge(-1, &field);
        assert_eq!(catcher.x, 36.0);
        catcher.nudge(-3, &field);
        assert_eq!(catcher.x, 0.0);
        catcher.nudge(2, &field);
        assert_eq!(catcher.x, 48.0);
    }

    #[test]
    fn test_catcher_center() {
        let field = Field::new(400.0, 600.0);
        let mut catcher = Catcher::default();
        catcher.center(&field);
        assert_eq!(catcher.x, 160.0);
    }

    #[test]
    fn test_narrow_field_is_widened() {
        let field = Field::new(10.0, 5.0);
        assert_eq!(field.width, CATCHER_WIDTH);
        assert_eq!(field.height, CATCHER_HEIGHT);
    }

    #[test]
    fn test_schedule_fires_per_interval() {
        let mut schedule = Schedule::new(700);
        assert_eq!(schedule.poll(5000), 0, "inactive schedule never fires");

        schedule.start(0);
        assert_eq!(schedule.poll(699), 0);
        assert_eq!(schedule.poll(700), 1);
        assert_eq!(schedule.poll(1399), 0);
        assert_eq!(schedule.poll(2800), 3);

        schedule.cancel();
        assert_eq!(schedule.poll(10_000), 0);
    }

    #[test]
    fn test_feedback_expires() {
        let mut session = GameSession::new(1, Difficulty::Normal, Field::default(), Catcher::default());
        session.show_feedback("Great! +1".into(), true);
        assert_eq!(session.feedback_text(), Some("Great! +1"));

        session.now_ms += FEEDBACK_DURATION_MS - 1;
        assert!(session.feedback_text().is_some());
        session.now_ms += 1;
        assert_eq!(session.feedback_text(), None);
    }

    #[test]
    fn test_shut_down_purges_and_cancels() {
        let mut session = GameSession::new(1, Difficulty::Normal, Field::default(), Catcher::default());
        session.begin();
        let a = session.insert_drop(DropKind::Water, Vec2::new(0.0, 0.0), 2.0);
        let b = session.insert_drop(DropKind::Pollutant, Vec2::new(50.0, 0.0), 2.0);
        session.drain_events();

        session.shut_down();
        assert!(!session.active);
        assert!(session.drops.is_empty());
        assert!(!session.spawn_schedule.is_active());
        assert!(!session.clock_schedule.is_active());
        assert_eq!(session.drain_events(), vec![GameEvent::Cleared { ids: vec![a, b] }]);
    }
}
