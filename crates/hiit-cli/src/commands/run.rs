//! Session runner.
//!
//! The CLI process is the tick source: a 50 ms sleep loop feeds the engine
//! elapsed time from a monotonic clock, rebased whenever the engine mints
//! a fresh tick token (phase transitions and resumes).

use std::io::Write;
use std::time::{Duration, Instant};

use hiit_core::{
    Cue, CueEmitter, Mode, Phase, TimerEngine, TimerSnapshot, TimerState, TomlPrefs,
};

const TICK_MS: u64 = 50;

/// Rings the terminal bell for every cue. Write errors are swallowed --
/// a broken terminal must never stall the tick loop.
struct TermEmitter;

impl CueEmitter for TermEmitter {
    fn emit(&self, cue: Cue) {
        let mut err = std::io::stderr();
        let _ = match cue {
            Cue::WarningProgressive { .. } => write!(err, "\x07"),
            Cue::MinuteOrPhaseStart { .. } | Cue::Final => write!(err, "\x07\x07"),
        };
        let _ = err.flush();
    }
}

pub fn routine(
    work: Option<u32>,
    rest: Option<u32>,
    sets: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine(Mode::Routine)?;
    if let Some(secs) = work {
        engine.set_work_seconds(secs);
        if engine.config().work_secs() != secs {
            eprintln!("ignoring out-of-range work duration: {secs}");
        }
    }
    if let Some(secs) = rest {
        engine.set_rest_seconds(secs);
        if engine.config().rest_secs() != secs {
            eprintln!("ignoring out-of-range rest duration: {secs}");
        }
    }
    if let Some(n) = sets {
        engine.set_total_sets(n);
        if engine.config().total_sets() != n {
            eprintln!("ignoring out-of-range set count: {n}");
        }
    }
    run_session(engine)
}

pub fn burpees(minutes: Option<u32>) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine(Mode::DeathByBurpees)?;
    if let Some(m) = minutes {
        engine.set_total_minutes(m);
        if engine.config().total_minutes() != m {
            eprintln!("ignoring out-of-range minutes: {m}");
        }
    }
    run_session(engine)
}

fn open_engine(mode: Mode) -> Result<TimerEngine, Box<dyn std::error::Error>> {
    // An unreadable preferences file should not keep a workout from
    // running; the session falls back to defaults.
    let prefs = TomlPrefs::open_or_default();
    let mut engine = TimerEngine::new(Box::new(prefs), Box::new(TermEmitter));
    engine.set_mode(mode);
    Ok(engine)
}

fn run_session(mut engine: TimerEngine) -> Result<(), Box<dyn std::error::Error>> {
    let Some(started) = engine.start() else {
        return Ok(());
    };
    println!("{}", serde_json::to_string(&started)?);

    let mut token = engine.tick_token();
    let mut phase_clock = Instant::now();
    let mut out = std::io::stdout();

    while engine.state() != TimerState::Idle {
        std::thread::sleep(Duration::from_millis(TICK_MS));
        let elapsed = phase_clock.elapsed().as_millis() as u64;
        let events = engine.on_tick(token, elapsed);

        if !events.is_empty() {
            println!();
            for event in &events {
                println!("{}", serde_json::to_string(event)?);
            }
        }
        draw_status(&mut out, &engine.snapshot())?;

        let current = engine.tick_token();
        if current != token {
            token = current;
            phase_clock = Instant::now();
        }
    }
    println!();
    Ok(())
}

fn draw_status(out: &mut impl Write, snap: &TimerSnapshot) -> std::io::Result<()> {
    match snap.mode {
        Mode::Routine => write!(
            out,
            "\r{} {}  set {}/{}   ",
            phase_label(snap.phase),
            snap.display(),
            snap.current_set,
            snap.total_sets,
        )?,
        Mode::DeathByBurpees => write!(
            out,
            "\r{}  burpees this minute: {}   ",
            snap.display(),
            snap.burpee_count().unwrap_or(1),
        )?,
    }
    out.flush()
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Work => "WORK",
        Phase::Rest => "REST",
    }
}
