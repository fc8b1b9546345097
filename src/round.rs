//! Round lifecycle: Ready -> Active -> Ended -> Ready
//!
//! The controller owns the current [`GameSession`], the persisted high score
//! and the difficulty selection. It is the only writer of the high score.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::highscores::HighScoreRecord;
use crate::persistence::KeyValueStore;
use crate::settings::Difficulty;
use crate::sim::{Catcher, Field, GameSession, RoundStats, TickInput, tick};

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Title screen, nothing played yet
    Ready,
    /// Round in progress
    Active,
    /// Round over, summary showing
    Ended,
}

/// Illegal lifecycle transition. Always a controller bug, never player input.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RoundError {
    #[error("cannot start a round while one is active")]
    AlreadyActive,
    #[error("cannot end a round that is not active")]
    NotActive,
}

/// Closing messages shown with the final score
pub const MISSION_MESSAGES: &[&str] = &[
    "771 million people lack access to clean water. Every drop counts!",
    "Clean water gives kids more time in school and less time hauling water.",
    "Women and girls spend 200 million hours every day collecting water.",
    "Access to clean water can improve health, education and income.",
    "A well can serve a whole community for decades.",
    "Thanks for playing! Together we can bring clean water to everyone.",
];

/// End-of-round result
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    pub difficulty: Difficulty,
    pub final_score: u32,
    pub new_high_score: bool,
    /// High score after this round
    pub high_score: u32,
    pub best_combo: u32,
    pub stats: RoundStats,
    pub mission: &'static str,
}

impl RoundSummary {
    /// Game-over banner text
    pub fn message(&self) -> String {
        if self.new_high_score {
            format!("Game Over! Final Score: {} 🎉 New High Score!", self.final_score)
        } else {
            format!(
                "Game Over! Final Score: {} | High Score: {}",
                self.final_score, self.high_score
            )
        }
    }
}

/// Owns one game instance from title screen to title screen
pub struct RoundController<S: KeyValueStore> {
    store: S,
    phase: RoundPhase,
    difficulty: Difficulty,
    field: Field,
    high_score: HighScoreRecord,
    session: GameSession,
    rng: Pcg32,
    last_summary: Option<RoundSummary>,
}

impl<S: KeyValueStore> RoundController<S> {
    /// Create a controller, reading the high score once from `store`
    pub fn new(store: S, seed: u64) -> Self {
        let high_score = HighScoreRecord::load(&store);
        let field = Field::default();
        let difficulty = Difficulty::default();
        Self {
            store,
            phase: RoundPhase::Ready,
            difficulty,
            field,
            high_score,
            session: GameSession::new(seed, difficulty, field, Catcher::default()),
            rng: Pcg32::seed_from_u64(seed),
            last_summary: None,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == RoundPhase::Active
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.value
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn last_summary(&self) -> Option<&RoundSummary> {
        self.last_summary.as_ref()
    }

    /// Change the difficulty for the next round. Ignored while a round is active.
    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.is_active() {
            log::debug!("Difficulty locked during a round");
            return false;
        }
        self.difficulty = difficulty;
        true
    }

    /// Report new field dimensions from the display surface
    pub fn set_field(&mut self, width: f32, height: f32) {
        self.field = Field::new(width, height);
        self.session.resize(self.field);
    }

    /// Place the bucket's left edge, clamped to the field
    pub fn set_bucket_position(&mut self, x: f32) {
        let field = self.session.field;
        self.session.catcher.set_position(x, &field);
    }

    /// Begin a new round at `difficulty`
    pub fn start_round(&mut self, difficulty: Difficulty) -> Result<(), RoundError> {
        if self.is_active() {
            log::error!("start_round called while a round is active");
            return Err(RoundError::AlreadyActive);
        }

        self.difficulty = difficulty;
        let seed = self.rng.random::<u64>();
        let catcher = self.session.catcher;
        self.session = GameSession::new(seed, difficulty, self.field, catcher);
        self.session.begin();
        self.phase = RoundPhase::Active;
        self.last_summary = None;

        log::info!(
            "Round started: {} ({}s, seed {})",
            difficulty.as_str(),
            self.session.time_remaining,
            seed
        );
        Ok(())
    }

    /// Finish the active round and persist a new high score if earned
    pub fn end_round(&mut self) -> Result<RoundSummary, RoundError> {
        if !self.is_active() {
            log::error!("end_round called with no active round");
            return Err(RoundError::NotActive);
        }
        Ok(self.finish())
    }

    fn finish(&mut self) -> RoundSummary {
        self.session.shut_down();
        self.phase = RoundPhase::Ended;

        let score = self.session.score;
        let new_high_score = self.high_score.submit(score, &mut self.store);
        let mission = MISSION_MESSAGES[self.rng.random_range(0..MISSION_MESSAGES.len())];

        let summary = RoundSummary {
            difficulty: self.difficulty,
            final_score: score,
            new_high_score,
            high_score: self.high_score.value,
            best_combo: self.session.combo.best_combo,
            stats: self.session.stats,
            mission,
        };
        log::info!("{}", summary.message());
        self.last_summary = Some(summary.clone());
        summary
    }

    /// Return from the summary to the title state
    pub fn reset(&mut self) -> bool {
        if self.phase != RoundPhase::Ended {
            return false;
        }
        self.phase = RoundPhase::Ready;
        true
    }

    /// Run one frame. Returns the summary if the round ended during it.
    pub fn advance(&mut self, input: &TickInput, dt_ms: u64) -> Option<RoundSummary> {
        if !self.is_active() {
            return None;
        }
        let outcome = tick(&mut self.session, input, dt_ms);
        if outcome.time_up {
            Some(self.finish())
        } else {
            None
        }
    }
}
