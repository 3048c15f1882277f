use pianoai_core::{EngineEvent, GameEngine, NoteStatus, Phase};
use song_schema::{Difficulty, Note, Song};

fn two_note_song() -> Song {
    Song {
        id: "events".to_string(),
        title: "Events".to_string(),
        artist: "Test".to_string(),
        difficulty: Difficulty::Easy,
        duration: 2.0,
        notes: vec![
            Note { note: "C4".to_string(), time: 1.0, duration: 0.5 },
            Note { note: "D4".to_string(), time: 1.5, duration: 0.5 },
        ],
    }
}

#[test]
fn events_follow_the_session_lifecycle() {
    let mut engine = GameEngine::with_default_config(two_note_song());
    let rx = engine.subscribe();

    engine.start();
    for wall in [0.0, 1.0, 2.0, 3.0, 4.0] {
        engine.tick(wall);
    }
    engine.handle_note_on("C4");
    engine.tick(5.0);

    let events: Vec<EngineEvent> = rx.try_iter().collect();
    let kinds: Vec<String> = events
        .iter()
        .map(|e| match e {
            EngineEvent::Started => "started".to_string(),
            EngineEvent::CountdownTick { remaining } => format!("count {}", remaining),
            EngineEvent::PhaseChanged { phase } => format!("phase {:?}", phase),
            EngineEvent::NoteResolved { index, status, .. } => {
                format!("note {} {:?}", index, status)
            }
        })
        .collect();

    assert_eq!(
        kinds,
        vec![
            "started",
            "count 2",
            "count 1",
            "count 0",
            "phase Playing",
            "note 0 Perfect",
            "note 1 Missed",
            "phase Finished",
        ]
    );
}

#[test]
fn resolved_events_carry_running_score() {
    let mut engine = GameEngine::with_default_config(two_note_song());
    let rx = engine.subscribe();
    engine.start();
    for wall in [0.0, 1.0, 2.0, 3.0, 4.0] {
        engine.tick(wall);
    }
    engine.handle_note_on("C4");
    engine.tick(5.0);

    let scores: Vec<_> = rx
        .try_iter()
        .filter_map(|e| match e {
            EngineEvent::NoteResolved { score, .. } => Some(score),
            _ => None,
        })
        .collect();
    assert_eq!(scores.len(), 2);
    assert_eq!(scores[0].combo, 1);
    assert_eq!(scores[1].combo, 0);
    assert_eq!(scores[1].misses, 1);
    assert_eq!(scores[1].max_combo, 1);
    assert_eq!(scores[1], *engine.score());
}

#[test]
fn dropped_subscriber_does_not_block_others() {
    let mut engine = GameEngine::with_default_config(two_note_song());
    let dropped = engine.subscribe();
    let kept = engine.subscribe();
    drop(dropped);

    engine.start();
    engine.tick(0.0);
    engine.tick(1.0);

    let events: Vec<EngineEvent> = kept.try_iter().collect();
    assert_eq!(
        events,
        vec![
            EngineEvent::Started,
            EngineEvent::CountdownTick { remaining: 2 },
        ]
    );
}

#[test]
fn zero_countdown_announces_playing_on_start() {
    let config = pianoai_core::EngineConfig::builder()
        .countdown_start(0)
        .build()
        .unwrap();
    let mut engine = GameEngine::new(two_note_song(), config).unwrap();
    let rx = engine.subscribe();
    engine.start();

    let events: Vec<EngineEvent> = rx.try_iter().collect();
    assert_eq!(
        events,
        vec![
            EngineEvent::Started,
            EngineEvent::PhaseChanged { phase: Phase::Playing },
        ]
    );
}

#[test]
fn snapshot_matches_accessors() {
    let mut engine = GameEngine::with_default_config(two_note_song());
    engine.start();
    for wall in [0.0, 1.0, 2.0, 3.0, 4.0] {
        engine.tick(wall);
    }
    engine.handle_note_on("C4");

    let snap = engine.snapshot();
    assert_eq!(snap.phase, Phase::Playing);
    assert_eq!(snap.countdown, 0);
    assert_eq!(snap.elapsed_time, 1.0);
    assert_eq!(snap.duration, 2.0);
    assert_eq!(snap.note_states[0].status, NoteStatus::Perfect);
    assert_eq!(snap.note_states[1].status, NoteStatus::Upcoming);
    assert_eq!(snap.accuracy, 100);
    assert_eq!(snap.last_hit.map(|h| h.seq), Some(1));

    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["phase"], "playing");
    assert_eq!(json["note_states"][0]["status"], "perfect");
}
