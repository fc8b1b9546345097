use drop_catcher::consts::*;
use drop_catcher::highscores::HighScoreRecord;
use drop_catcher::persistence::{KeyValueStore, MemoryStore, StoreError};
use drop_catcher::sim::{DropKind, GameEvent, TickInput, catch_by_id};
use drop_catcher::{Difficulty, RoundController, RoundPhase};
use glam::Vec2;

fn controller_with_high_score(value: i64) -> RoundController<MemoryStore> {
    let mut store = MemoryStore::new();
    store.set(HighScoreRecord::STORAGE_KEY, value).unwrap();
    RoundController::new(store, 77)
}

/// Drop a collectible straight into the bucket and let the tick catch it
fn drop_into_bucket(rc: &mut RoundController<MemoryStore>, kind: DropKind) -> u32 {
    let session = rc.session_mut();
    let x = session.catcher.x;
    let y = session.field.height - DROP_HEIGHT - 1.0;
    session.insert_drop(kind, Vec2::new(x, y), 0.5)
}

#[test]
fn normal_round_three_water_catches() {
    let mut rc = controller_with_high_score(0);
    rc.start_round(Difficulty::Normal).unwrap();
    assert_eq!(rc.session().time_remaining, 30);
    assert_eq!(rc.session().profile.spawn_interval_ms, 700);

    for _ in 0..3 {
        drop_into_bucket(&mut rc, DropKind::Water);
        rc.advance(&TickInput::default(), 16);
    }

    let session = rc.session();
    assert_eq!(session.combo.combo, 3);
    // 3 base points plus (2-1) + (3-1) combo bonus
    assert_eq!(session.score, 6);
}

#[test]
fn pollutant_after_combo_of_four() {
    let mut rc = controller_with_high_score(0);
    rc.start_round(Difficulty::Normal).unwrap();
    for _ in 0..4 {
        drop_into_bucket(&mut rc, DropKind::Water);
        rc.advance(&TickInput::default(), 16);
    }
    let before = rc.session().score;
    assert_eq!(rc.session().combo.combo, 4);

    drop_into_bucket(&mut rc, DropKind::Pollutant);
    rc.advance(&TickInput::default(), 16);

    let session = rc.session();
    assert_eq!(session.combo.combo, 0);
    assert_eq!(session.combo.streak, 0);
    assert_eq!(session.score, before - 2);
}

#[test]
fn combo_resets_on_idle_timeout() {
    let mut rc = controller_with_high_score(0);
    rc.start_round(Difficulty::Easy).unwrap();
    drop_into_bucket(&mut rc, DropKind::Water);
    rc.advance(&TickInput::default(), 16);
    assert_eq!(rc.session().combo.combo, 1);

    // Move the bucket aside so spawned drops are missed, not caught
    rc.set_bucket_position(0.0);
    let mut elapsed = 0;
    while elapsed < COMBO_TIMEOUT_MS {
        rc.advance(&TickInput::default(), 50);
        elapsed += 50;
    }
    assert_eq!(rc.session().combo.combo, 0);
}

#[test]
fn streak_resets_with_combo_on_idle_timeout() {
    let mut rc = controller_with_high_score(0);
    rc.start_round(Difficulty::Normal).unwrap();
    for _ in 0..2 {
        let session = rc.session_mut();
        let id = session.insert_drop(DropKind::Water, Vec2::new(0.0, 0.0), 0.5);
        catch_by_id(session, id).unwrap();
    }
    assert_eq!(rc.session().combo.combo, 2);
    assert_eq!(rc.session().combo.streak, 2);

    for _ in 0..18 {
        rc.advance(&TickInput::default(), 100);
    }
    let combo = rc.session().combo;
    assert_eq!(combo.combo, 0);
    assert_eq!(combo.streak, combo.combo);
}

#[test]
fn new_high_score_is_persisted_once() {
    let mut rc = controller_with_high_score(10);
    assert_eq!(rc.high_score(), 10);

    rc.start_round(Difficulty::Normal).unwrap();
    rc.session_mut().score = 12;
    let summary = rc.end_round().unwrap();
    assert!(summary.new_high_score);
    assert_eq!(summary.final_score, 12);
    assert_eq!(rc.store().get(HighScoreRecord::STORAGE_KEY), Ok(Some(12)));

    rc.start_round(Difficulty::Normal).unwrap();
    rc.session_mut().score = 5;
    let summary = rc.end_round().unwrap();
    assert!(!summary.new_high_score);
    assert_eq!(summary.high_score, 12);
    assert_eq!(rc.store().get(HighScoreRecord::STORAGE_KEY), Ok(Some(12)));
}

#[test]
fn round_ends_when_clock_runs_out() {
    let mut rc = controller_with_high_score(0);
    rc.start_round(Difficulty::Hard).unwrap();

    let mut frames = 0;
    let summary = loop {
        frames += 1;
        if let Some(summary) = rc.advance(&TickInput::default(), 100) {
            break summary;
        }
        assert!(frames < 10_000);
    };
    assert_eq!(frames, 220);
    assert_eq!(rc.phase(), RoundPhase::Ended);
    assert_eq!(summary.difficulty, Difficulty::Hard);
    assert!(!summary.mission.is_empty());
    assert_eq!(rc.last_summary(), Some(&summary));

    let session = rc.session();
    assert!(session.drops.is_empty());
    assert!(!session.active);
    assert_eq!(session.time_remaining, 0);
    assert!(session.events.contains(&GameEvent::TimeUp));

    // Late frames must not touch the finished round
    let score = session.score;
    assert!(rc.advance(&TickInput::default(), 100).is_none());
    assert_eq!(rc.session().score, score);
    assert_eq!(rc.session().now_ms, 22_000);
}

#[test]
fn ended_round_purges_drops_and_ignores_clicks() {
    let mut rc = controller_with_high_score(0);
    rc.start_round(Difficulty::Normal).unwrap();
    let id = rc
        .session_mut()
        .insert_drop(DropKind::Water, Vec2::new(10.0, 10.0), 2.0);
    rc.end_round().unwrap();

    assert!(rc.session().drops.is_empty());
    assert!(catch_by_id(rc.session_mut(), id).is_none());
    assert_eq!(rc.session().score, 0);
}

#[test]
fn click_catch_bypasses_window() {
    let mut rc = controller_with_high_score(0);
    rc.start_round(Difficulty::Normal).unwrap();
    let id = rc
        .session_mut()
        .insert_drop(DropKind::Golden, Vec2::new(200.0, 20.0), 2.0);
    let input = TickInput {
        clicked: vec![id],
        ..Default::default()
    };
    rc.advance(&input, 16);
    rc.advance(&input, 16);
    assert_eq!(rc.session().score, 5);
    assert!(rc.session().drop_by_id(id).is_none());
}

#[test]
fn difficulty_change_locked_during_round() {
    let mut rc = controller_with_high_score(0);
    rc.start_round(Difficulty::Normal).unwrap();
    assert!(!rc.select_difficulty(Difficulty::Hard));
    assert_eq!(rc.difficulty(), Difficulty::Normal);
    assert_eq!(rc.session().profile, Difficulty::Normal.profile());
}

/// Store that can be read but rejects writes
struct ReadOnlyStore(MemoryStore);

impl KeyValueStore for ReadOnlyStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.0.get_item(key)
    }

    fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Write("read-only".into()))
    }
}

#[test]
fn failed_high_score_write_is_not_fatal() {
    let mut rc = RoundController::new(ReadOnlyStore(MemoryStore::new()), 1);
    rc.start_round(Difficulty::Easy).unwrap();
    rc.session_mut().score = 3;
    let summary = rc.end_round().unwrap();
    assert!(summary.new_high_score);
    assert_eq!(rc.high_score(), 3);
    assert_eq!(rc.store().get(HighScoreRecord::STORAGE_KEY), Ok(None));
}
