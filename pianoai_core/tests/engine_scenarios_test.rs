use pianoai_core::{EngineConfig, GameEngine, Judgement, NoteStatus, Phase, ScoreState};
use song_schema::{Difficulty, Note, Song};

fn song(notes: &[(&str, f64)], duration: f64) -> Song {
    Song {
        id: "scenario".to_string(),
        title: "Scenario".to_string(),
        artist: "Test".to_string(),
        difficulty: Difficulty::Medium,
        duration,
        notes: notes
            .iter()
            .map(|&(n, t)| Note { note: n.to_string(), time: t, duration: 0.25 })
            .collect(),
    }
}

/// Engine already in `Playing` with the wall clock anchored at 0, so wall
/// time equals session time.
fn playing_engine(notes: &[(&str, f64)], duration: f64) -> GameEngine {
    let config = EngineConfig::builder().countdown_start(0).build().unwrap();
    let mut engine = GameEngine::new(song(notes, duration), config).unwrap();
    engine.start();
    engine.tick(0.0);
    assert_eq!(engine.phase(), Phase::Playing);
    engine
}

#[test]
fn scenario_a_exact_hit_is_perfect() {
    let mut engine = playing_engine(&[("C4", 2.0)], 4.0);
    engine.tick(2.0);

    let hit = engine.handle_note_on("C4").expect("should hit");
    assert_eq!(hit.judgement, Judgement::Perfect);
    assert_eq!(hit.timestamp, 2.0);

    let score = engine.score();
    assert!(score.points > 0);
    assert_eq!(score.combo, 1);
    assert_eq!(score.perfect, 1);
    assert_eq!(engine.note_states()[0].status, NoteStatus::Perfect);
    assert_eq!(engine.last_hit().map(|h| h.judgement), Some(Judgement::Perfect));
}

#[test]
fn scenario_b_unplayed_note_is_missed() {
    let mut engine = playing_engine(&[("C4", 2.0)], 4.0);

    engine.tick(2.1);
    assert_eq!(engine.note_states()[0].status, NoteStatus::Upcoming);

    engine.tick(2.0 + 0.15 + 0.05);
    assert_eq!(engine.note_states()[0].status, NoteStatus::Missed);
    assert_eq!(engine.score().misses, 1);
    assert_eq!(engine.score().combo, 0);
    assert_eq!(engine.accuracy(), 0);
    assert!(engine.last_hit().is_none());
}

#[test]
fn scenario_c_nearest_of_same_pitch_resolves() {
    let mut engine = playing_engine(&[("C4", 1.0), ("C4", 1.05)], 4.0);
    engine.tick(1.02);

    let hit = engine.handle_note_on("C4").expect("should hit");
    assert_eq!(hit.note_index, 0);
    assert_eq!(engine.note_states()[0].status, NoteStatus::Perfect);
    assert_eq!(engine.note_states()[1].status, NoteStatus::Upcoming);
}

#[test]
fn scenario_d_absent_pitch_changes_nothing() {
    let mut engine = playing_engine(&[("C4", 1.0)], 4.0);
    engine.tick(1.0);

    assert!(engine.handle_note_on("F#5").is_none());
    assert_eq!(*engine.score(), ScoreState::default());
    assert!(engine.last_hit().is_none());
    assert_eq!(engine.note_states()[0].status, NoteStatus::Upcoming);
}

#[test]
fn scenario_e_full_song_all_perfect() {
    let pitches = ["C4", "D4", "E4", "F4", "G4", "A4", "B4", "C5"];
    let notes: Vec<(&str, f64)> = pitches
        .iter()
        .enumerate()
        .map(|(i, p)| (*p, 1.0 + i as f64 * 0.5))
        .collect();
    let mut engine = playing_engine(&notes, 6.0);

    for &(pitch, time) in &notes {
        engine.tick(time);
        let hit = engine.handle_note_on(pitch).expect("should hit");
        assert_eq!(hit.judgement, Judgement::Perfect);
    }
    engine.tick(6.0);

    assert_eq!(engine.phase(), Phase::Finished);
    assert_eq!(engine.accuracy(), 100);
    assert_eq!(engine.score().misses, 0);
    assert_eq!(engine.score().max_combo, notes.len() as u32);

    let result = engine.result();
    assert_eq!(result.total_notes, 8);
    assert_eq!(result.unresolved, 0);
    assert_eq!(result.stars, 5);
    assert!(result.full_combo);
}

#[test]
fn countdown_blocks_input_and_clock() {
    let mut engine = GameEngine::with_default_config(song(&[("C4", 0.0)], 4.0));
    engine.start();
    engine.tick(0.0);
    assert_eq!(engine.phase(), Phase::Countdown);
    assert_eq!(engine.countdown(), 3);

    engine.tick(1.0);
    assert_eq!(engine.countdown(), 2);
    assert!(engine.handle_note_on("C4").is_none());
    assert_eq!(engine.elapsed_time(), 0.0);

    engine.tick(2.0);
    engine.tick(3.0);
    assert_eq!(engine.phase(), Phase::Playing);
    assert_eq!(engine.elapsed_time(), 0.0);

    // Note at 0.0 is now hittable.
    assert_eq!(
        engine.handle_note_on("C4").map(|h| h.judgement),
        Some(Judgement::Perfect)
    );

    engine.tick(5.0);
    assert_eq!(engine.elapsed_time(), 2.0);
}

#[test]
fn finished_session_ignores_ticks_and_presses() {
    let mut engine = playing_engine(&[("C4", 1.0), ("D4", 2.9)], 3.0);
    engine.tick(3.5);
    assert_eq!(engine.phase(), Phase::Finished);
    let frozen = engine.snapshot();

    engine.tick(10.0);
    assert!(engine.handle_note_on("D4").is_none());
    assert_eq!(engine.snapshot(), frozen);
}

#[test]
fn note_near_end_can_stay_unresolved() {
    let mut engine = playing_engine(&[("C4", 2.95)], 3.0);
    engine.tick(3.0);
    assert_eq!(engine.phase(), Phase::Finished);
    assert_eq!(engine.note_states()[0].status, NoteStatus::Upcoming);

    let result = engine.result();
    assert_eq!(result.unresolved, 1);
    assert_eq!(result.accuracy, 0);
    assert!(!result.full_combo);
}

#[test]
fn empty_song_finishes_at_time_zero() {
    let mut engine = GameEngine::with_default_config(song(&[], 0.0));
    engine.start();
    for wall in [0.0, 1.0, 2.0, 3.0] {
        engine.tick(wall);
    }
    assert_eq!(engine.phase(), Phase::Finished);
    assert_eq!(engine.elapsed_time(), 0.0);
    assert!(engine.note_states().is_empty());
    assert_eq!(engine.accuracy(), 0);
    assert_eq!(engine.progress(), 0.0);
}

#[test]
fn song_without_notes_ignores_declared_duration() {
    let mut engine = GameEngine::with_default_config(song(&[], 30.0));
    engine.start();
    for wall in [0.0, 1.0, 2.0, 3.0] {
        engine.tick(wall);
    }
    assert_eq!(engine.phase(), Phase::Finished);
    assert_eq!(engine.elapsed_time(), 0.0);
    assert_eq!(engine.result().stars, 1);
}

#[test]
fn zero_delta_tick_is_idempotent() {
    let mut engine = playing_engine(&[("C4", 0.5), ("D4", 1.0), ("E4", 3.0)], 4.0);
    engine.tick(0.5);
    engine.handle_note_on("C4");
    engine.tick(1.5);

    let before = engine.snapshot();
    engine.tick(1.5);
    engine.tick(1.5);
    assert_eq!(engine.snapshot(), before);
}

#[test]
fn stray_press_is_not_penalised() {
    let mut engine = playing_engine(&[("C4", 1.0)], 4.0);
    engine.tick(0.5);

    // Pitch exists but nothing is inside the window yet.
    assert!(engine.handle_note_on("C4").is_none());
    assert_eq!(*engine.score(), ScoreState::default());

    engine.tick(1.0);
    assert!(engine.handle_note_on("C4").is_some());
    assert!(engine.handle_note_on("C4").is_none());
    assert_eq!(engine.score().perfect, 1);
}

#[test]
fn combo_resets_only_on_miss() {
    let mut engine = playing_engine(
        &[("C4", 1.0), ("D4", 1.5), ("E4", 2.0), ("F4", 2.5)],
        4.0,
    );
    engine.tick(1.0);
    engine.handle_note_on("C4");
    engine.tick(1.58);
    engine.handle_note_on("D4");
    assert_eq!(engine.score().combo, 2);
    assert_eq!(engine.score().good, 1);

    // E4 expires.
    engine.tick(2.4);
    assert_eq!(engine.score().combo, 0);
    assert_eq!(engine.score().max_combo, 2);
    assert_eq!(engine.score().misses, 1);

    engine.tick(2.5);
    engine.handle_note_on("F4");
    assert_eq!(engine.score().combo, 1);
    assert_eq!(engine.score().max_combo, 2);
    assert_eq!(engine.accuracy(), 75);
}

#[test]
fn points_reward_tighter_timing() {
    let mut tight = playing_engine(&[("C4", 1.0)], 2.0);
    tight.tick(1.0);
    tight.handle_note_on("C4");

    let mut loose = playing_engine(&[("C4", 1.0)], 2.0);
    loose.tick(1.125);
    loose.handle_note_on("C4");

    assert_eq!(loose.last_hit().map(|h| h.judgement), Some(Judgement::Ok));
    assert!(tight.score().points > loose.score().points);
}

#[test]
fn restart_rebuilds_session_state() {
    let mut engine = playing_engine(&[("C4", 1.0), ("D4", 2.0)], 3.0);
    engine.tick(1.0);
    engine.handle_note_on("C4");
    engine.tick(2.5);
    assert_eq!(engine.score().misses, 1);

    engine.start();
    assert_eq!(*engine.score(), ScoreState::default());
    assert!(engine.last_hit().is_none());
    assert_eq!(engine.elapsed_time(), 0.0);
    assert!(engine
        .note_states()
        .iter()
        .all(|s| s.status == NoteStatus::Upcoming));
}

#[test]
fn queued_input_is_applied_in_order() {
    use pianoai_core::input::InputQueue;

    let mut engine = playing_engine(&[("C4", 1.0), ("E4", 1.0), ("G4", 1.0)], 2.0);
    engine.tick(1.0);

    let queue = InputQueue::new();
    queue.note_on("C4");
    queue.note_on("B2");
    queue.note_on("E4");
    queue.note_on("G4");

    assert_eq!(engine.drain_input(&queue), 3);
    assert!(queue.is_empty());
    assert_eq!(engine.score().combo, 3);
    assert_eq!(engine.last_hit().map(|h| h.note_index), Some(2));
}
