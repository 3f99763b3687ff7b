//! End-to-end session tests.
//!
//! These drive the engine exactly the way a host does: 50 ms ticks against
//! the current tick token, rebasing the elapsed clock whenever a phase
//! transition mints a fresh token.

use hiit_core::{
    Cue, Event, MemoryPrefs, Mode, Phase, RecordingEmitter, TimerEngine, TimerState,
};

fn recording_engine() -> (TimerEngine, RecordingEmitter) {
    let emitter = RecordingEmitter::default();
    let engine = TimerEngine::new(Box::new(MemoryPrefs::default()), Box::new(emitter.clone()));
    (engine, emitter)
}

/// Drive 50 ms ticks until the engine returns to Idle, collecting every
/// transition event along the way.
fn run_to_completion(engine: &mut TimerEngine) -> Vec<Event> {
    let mut events = Vec::new();
    let mut phases = 0u32;
    while engine.state() == TimerState::Running {
        let token = engine.tick_token();
        let mut elapsed = 0u64;
        loop {
            elapsed += 50;
            events.extend(engine.on_tick(token, elapsed));
            if engine.state() != TimerState::Running || engine.tick_token() != token {
                break;
            }
            assert!(elapsed < 4_000_000, "phase never completed");
        }
        phases += 1;
        assert!(phases < 1_000, "session never completed");
    }
    events
}

#[test]
fn routine_without_rest_runs_work_work_work_idle() {
    let (mut engine, _) = recording_engine();
    engine.set_work_seconds(60);
    engine.set_rest_seconds(0);
    engine.set_total_sets(3);

    let started = engine.start().unwrap();
    assert!(matches!(started, Event::Started { set: 1, phase: Phase::Work, .. }));

    let events = run_to_completion(&mut engine);
    let summary: Vec<_> = events
        .iter()
        .map(|e| match e {
            Event::PhaseStarted { phase, set, .. } => (*phase, *set),
            Event::Completed { .. } => (Phase::Work, 0),
            other => panic!("unexpected event: {other:?}"),
        })
        .collect();
    assert_eq!(
        summary,
        vec![(Phase::Work, 2), (Phase::Work, 3), (Phase::Work, 0)]
    );
    assert_eq!(engine.state(), TimerState::Idle);
}

#[test]
fn routine_with_rest_alternates_phases() {
    let (mut engine, emitter) = recording_engine();
    engine.set_work_seconds(60);
    engine.set_rest_seconds(30);
    engine.set_total_sets(2);
    engine.start();

    let events = run_to_completion(&mut engine);
    let summary: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            Event::PhaseStarted { phase, set, .. } => Some((*phase, *set)),
            _ => None,
        })
        .collect();
    assert_eq!(summary, vec![(Phase::Rest, 1), (Phase::Work, 2)]);
    assert!(matches!(events.last(), Some(Event::Completed { .. })));

    // Three phase-start cues (work, rest, work), a warning window in each
    // phase, one final cue.
    let cues = emitter.cues();
    assert_eq!(cues.first(), Some(&Cue::MinuteOrPhaseStart { phase: Phase::Work }));
    assert_eq!(cues.last(), Some(&Cue::Final));
    let starts = cues
        .iter()
        .filter(|c| matches!(c, Cue::MinuteOrPhaseStart { .. }))
        .count();
    let warnings = cues
        .iter()
        .filter(|c| matches!(c, Cue::WarningProgressive { .. }))
        .count();
    assert_eq!(starts, 3);
    assert_eq!(warnings, 3 * 10);
    assert!(cues.contains(&Cue::MinuteOrPhaseStart { phase: Phase::Rest }));
}

#[test]
fn burpees_cue_timeline_over_three_minutes() {
    let (mut engine, emitter) = recording_engine();
    engine.set_mode(Mode::DeathByBurpees);
    engine.set_total_minutes(3);
    engine.start();

    let events = run_to_completion(&mut engine);
    assert!(matches!(
        events.as_slice(),
        [Event::Completed { mode: Mode::DeathByBurpees, .. }]
    ));

    // Start tone, then per minute window: warnings counting 10..1 into the
    // boundary, a minute cue at 60 s and 120 s, and the final cue at 180 s
    // in place of a third minute cue.
    let mut expected = vec![Cue::MinuteOrPhaseStart { phase: Phase::Work }];
    for window in 0..3 {
        for s in (1..=10).rev() {
            expected.push(Cue::WarningProgressive { seconds_to_boundary: s });
        }
        if window < 2 {
            expected.push(Cue::MinuteOrPhaseStart { phase: Phase::Work });
        }
    }
    expected.push(Cue::Final);
    assert_eq!(emitter.cues(), expected);
}

#[test]
fn burpee_count_at_two_minutes_five_seconds_is_three() {
    let (mut engine, _) = recording_engine();
    engine.set_mode(Mode::DeathByBurpees);
    engine.set_total_minutes(3);
    engine.start();
    let token = engine.tick_token();
    engine.on_tick(token, 125_000);
    assert_eq!(engine.snapshot().burpee_count(), Some(3));
    assert_eq!(engine.snapshot().display(), "00:55");
}

#[test]
fn stop_from_running_and_paused_yields_idle_baseline() {
    for pause_first in [false, true] {
        let (mut engine, _) = recording_engine();
        engine.set_work_seconds(60);
        engine.start();
        let token = engine.tick_token();
        engine.on_tick(token, 20_000);
        if pause_first {
            engine.pause();
        }
        engine.stop();
        let snap = engine.snapshot();
        assert_eq!(snap.state, TimerState::Idle);
        assert_eq!(snap.current_set, 1);
        assert_eq!(snap.phase, Phase::Work);
        assert_eq!(snap.remaining_ms, 0);
    }
}

#[test]
fn pause_mid_rest_resumes_into_the_same_rest() {
    let (mut engine, _) = recording_engine();
    engine.set_work_seconds(10);
    engine.set_rest_seconds(30);
    engine.set_total_sets(2);
    engine.start();

    // Finish the first work phase.
    let token = engine.tick_token();
    let events = engine.on_tick(token, 10_000);
    assert!(matches!(
        events.as_slice(),
        [Event::PhaseStarted { phase: Phase::Rest, .. }]
    ));

    // Partway into rest, pause and resume.
    let token = engine.tick_token();
    engine.on_tick(token, 12_000);
    engine.pause();
    engine.start();
    let snap = engine.snapshot();
    assert_eq!(snap.phase, Phase::Rest);
    assert_eq!(snap.current_set, 1);
    assert_eq!(snap.remaining_ms, 18_000);
    assert_eq!(snap.total_ms, 30_000);

    // And the session still completes normally.
    let events = run_to_completion(&mut engine);
    assert!(matches!(events.last(), Some(Event::Completed { .. })));
}
