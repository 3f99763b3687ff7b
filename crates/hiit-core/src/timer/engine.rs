//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It does not use
//! internal threads or clocks -- the caller owns the periodic tick source
//! and calls `on_tick()` with the elapsed time of the current subscription.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running; Running | Paused -> Idle
//! ```
//!
//! ## Tick subscriptions
//!
//! Every countdown segment gets a fresh [`TickToken`]. Pausing, stopping,
//! and phase completion all invalidate the current token, so a tick
//! scheduled before cancellation but delivered after is provably inert.
//! The caller re-reads `tick_token()` after any transition and rebases its
//! elapsed clock when the token changed.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(Box::new(prefs), Box::new(emitter));
//! engine.start();
//! // In a loop, every <= 50 ms:
//! engine.on_tick(token, elapsed_ms); // Returns transition events
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::config::{Mode, Phase, TimerConfig};
use super::cue::Cue;
use crate::emitter::CueEmitter;
use crate::events::Event;
use crate::prefs::{PrefKey, PreferenceStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Opaque handle to the current tick subscription.
///
/// Obtained from [`TimerEngine::tick_token`] and passed back on every tick;
/// a token minted before the latest transition no longer matches and the
/// tick is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken(u64);

/// Resume state captured by `pause()` and consumed by the next `start()`.
#[derive(Debug, Clone, Copy)]
struct PausedState {
    phase: Phase,
    set: u32,
    total_ms: u64,
    remaining_ms: u64,
}

/// Immutable view of the engine published on every tick and transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub mode: Mode,
    pub phase: Phase,
    pub current_set: u32,
    pub total_sets: u32,
    pub remaining_ms: u64,
    pub total_ms: u64,
}

impl TimerSnapshot {
    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        if self.total_ms == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_ms as f64 / self.total_ms as f64)
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format_mm_ss(self.remaining_ms)
    }

    /// Burpees owed this minute: `floor(elapsed / 60) + 1`.
    /// `None` outside DeathByBurpees mode.
    pub fn burpee_count(&self) -> Option<u32> {
        match self.mode {
            Mode::DeathByBurpees => {
                let elapsed_ms = self.total_ms.saturating_sub(self.remaining_ms);
                Some((elapsed_ms / 60_000) as u32 + 1)
            }
            Mode::Routine => None,
        }
    }
}

/// Format milliseconds as zero-padded `MM:SS`.
pub fn format_mm_ss(ms: u64) -> String {
    format!("{:02}:{:02}", ms / 60_000, (ms / 1000) % 60)
}

/// Core timer engine.
///
/// Owns the configuration, all countdown state, and the cue-trigger
/// decisions. External collaborators sit behind the [`PreferenceStore`]
/// and [`CueEmitter`] traits; readers observe published snapshots only.
pub struct TimerEngine {
    config: TimerConfig,
    prefs: Box<dyn PreferenceStore>,
    emitter: Box<dyn CueEmitter>,
    state: TimerState,
    /// Mode of the active session, captured from config at start.
    mode: Mode,
    phase: Phase,
    current_set: u32,
    /// Total length of the current phase; fixed until the next transition.
    total_ms: u64,
    /// Countdown base for the current tick subscription. Equal to
    /// `total_ms` at phase start, to the captured remainder after resume.
    tick_base_ms: u64,
    remaining_ms: u64,
    /// Whole-seconds value of the previous tick; cue rules run only when
    /// it changes, so tick jitter never double-fires a boundary.
    last_whole_secs: Option<u64>,
    /// Generation counter backing `TickToken`.
    generation: u64,
    paused: Option<PausedState>,
}

impl TimerEngine {
    /// Create an engine with configuration loaded from `prefs`.
    ///
    /// Starts Idle in Routine mode with nothing counting down.
    pub fn new(prefs: Box<dyn PreferenceStore>, emitter: Box<dyn CueEmitter>) -> Self {
        let config = TimerConfig::from_prefs(Mode::Routine, prefs.as_ref());
        let mode = config.mode();
        Self {
            config,
            prefs,
            emitter,
            state: TimerState::Idle,
            mode,
            phase: Phase::Work,
            current_set: 1,
            total_ms: 0,
            tick_base_ms: 0,
            remaining_ms: 0,
            last_whole_secs: None,
            generation: 0,
            paused: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Token for the current tick subscription. Ticks carrying an older
    /// token are dropped.
    pub fn tick_token(&self) -> TickToken {
        TickToken(self.generation)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state,
            mode: self.mode,
            phase: self.phase,
            current_set: self.current_set,
            total_sets: self.config.total_sets(),
            remaining_ms: self.remaining_ms,
            total_ms: self.total_ms,
        }
    }

    // ── Configuration ────────────────────────────────────────────────
    //
    // Out-of-range values are silently rejected and the prior valid value
    // retained. Accepted values persist immediately. An already-running
    // phase keeps its computed total; updates take effect from the next
    // phase start.

    pub fn set_mode(&mut self, mode: Mode) {
        self.config.set_mode(mode);
        if self.state == TimerState::Idle {
            self.mode = mode;
        }
    }

    pub fn set_work_seconds(&mut self, secs: u32) {
        if self.config.set_work_secs(secs) {
            self.prefs
                .set_int(PrefKey::WorkDurationSeconds, i64::from(secs));
        }
    }

    pub fn set_rest_seconds(&mut self, secs: u32) {
        if self.config.set_rest_secs(secs) {
            self.prefs
                .set_int(PrefKey::RestDurationSeconds, i64::from(secs));
        }
    }

    pub fn set_total_sets(&mut self, sets: u32) {
        if self.config.set_total_sets(sets) {
            self.prefs.set_int(PrefKey::TotalSets, i64::from(sets));
        }
    }

    pub fn set_total_minutes(&mut self, minutes: u32) {
        if self.config.set_total_minutes(minutes) {
            self.prefs
                .set_int(PrefKey::LastDurationMinutes, i64::from(minutes));
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start from Idle, or resume from Paused. No-op while Running.
    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle => {
                self.mode = self.config.mode();
                self.phase = Phase::Work;
                self.current_set = 1;
                self.begin_phase(self.mode.initial_phase_ms(&self.config));
                self.state = TimerState::Running;
                self.emitter.emit(Cue::MinuteOrPhaseStart { phase: Phase::Work });
                Some(Event::Started {
                    mode: self.mode,
                    phase: self.phase,
                    set: self.current_set,
                    duration_secs: self.total_ms / 1000,
                    at: Utc::now(),
                })
            }
            TimerState::Paused => {
                let p = self.paused.take()?;
                self.phase = p.phase;
                self.current_set = p.set;
                self.total_ms = p.total_ms;
                self.tick_base_ms = p.remaining_ms;
                self.remaining_ms = p.remaining_ms;
                self.last_whole_secs = None;
                self.generation += 1;
                self.state = TimerState::Running;
                // Resuming does not re-emit the phase-start cue.
                Some(Event::Resumed {
                    remaining_ms: self.remaining_ms,
                    at: Utc::now(),
                })
            }
            TimerState::Running => None,
        }
    }

    /// Capture remaining time, phase, and set; stop the countdown.
    /// No-op unless Running.
    pub fn pause(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.paused = Some(PausedState {
            phase: self.phase,
            set: self.current_set,
            total_ms: self.total_ms,
            remaining_ms: self.remaining_ms,
        });
        self.generation += 1;
        self.state = TimerState::Paused;
        Some(Event::Paused {
            remaining_ms: self.remaining_ms,
            at: Utc::now(),
        })
    }

    /// Cancel the countdown and return to Idle. No-op while Idle.
    pub fn stop(&mut self) -> Option<Event> {
        if self.state == TimerState::Idle {
            return None;
        }
        self.cancel_to_idle();
        Some(Event::Stopped { at: Utc::now() })
    }

    /// Stop, then preload the configured phase duration without starting.
    pub fn reset(&mut self) -> Option<Event> {
        self.cancel_to_idle();
        self.mode = self.config.mode();
        let total = self.mode.initial_phase_ms(&self.config);
        self.total_ms = total;
        self.tick_base_ms = total;
        self.remaining_ms = total;
        Some(Event::Reset {
            remaining_ms: self.remaining_ms,
            at: Utc::now(),
        })
    }

    /// Feed one tick of the current subscription; call at >= 20 Hz while
    /// Running. `elapsed_ms` is time elapsed since the subscription began
    /// (phase start or resume). Stale tokens and non-Running states are
    /// inert. Returns the transition events produced by this tick,
    /// including any chained phase starts.
    pub fn on_tick(&mut self, token: TickToken, elapsed_ms: u64) -> Vec<Event> {
        if self.state != TimerState::Running || token.0 != self.generation {
            return Vec::new();
        }
        self.remaining_ms = self.tick_base_ms.saturating_sub(elapsed_ms);
        let whole_secs = self.remaining_ms / 1000;
        let crossed = self.last_whole_secs != Some(whole_secs);
        self.last_whole_secs = Some(whole_secs);

        if self.remaining_ms == 0 {
            // The final boundary gets the completion cue, never a
            // warning/minute cue.
            return self.complete_phase();
        }
        if crossed && whole_secs > 0 {
            if let Some(cue) = self.mode.cue_at_boundary(self.total_ms / 1000, whole_secs) {
                self.emitter.emit(cue);
            }
        }
        Vec::new()
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Arm a countdown of `total` ms under a fresh tick token.
    fn begin_phase(&mut self, total: u64) {
        self.total_ms = total;
        self.tick_base_ms = total;
        self.remaining_ms = total;
        self.last_whole_secs = None;
        self.generation += 1;
    }

    /// Invalidate ticks and restore the Idle resting state.
    fn cancel_to_idle(&mut self) {
        self.generation += 1;
        self.state = TimerState::Idle;
        self.phase = Phase::Work;
        self.current_set = 1;
        self.total_ms = 0;
        self.tick_base_ms = 0;
        self.remaining_ms = 0;
        self.last_whole_secs = None;
        self.paused = None;
    }

    /// Phase-completion procedure. Chains the next phase within the same
    /// tick so observers never see a stale 0/0 between phases.
    fn complete_phase(&mut self) -> Vec<Event> {
        match self.mode {
            Mode::DeathByBurpees => self.complete_timer(),
            Mode::Routine => match self.phase {
                Phase::Work => {
                    if self.current_set >= self.config.total_sets() {
                        self.complete_timer()
                    } else if self.config.rest_secs() > 0 {
                        self.chain_phase(Phase::Rest, self.current_set)
                    } else {
                        // No rest configured: straight into the next set.
                        self.chain_phase(Phase::Work, self.current_set + 1)
                    }
                }
                Phase::Rest => self.chain_phase(Phase::Work, self.current_set + 1),
            },
        }
    }

    fn chain_phase(&mut self, phase: Phase, set: u32) -> Vec<Event> {
        self.phase = phase;
        self.current_set = set;
        let total = match phase {
            Phase::Work => u64::from(self.config.work_secs()) * 1000,
            Phase::Rest => u64::from(self.config.rest_secs()) * 1000,
        };
        self.begin_phase(total);
        self.emitter.emit(Cue::MinuteOrPhaseStart { phase });
        vec![Event::PhaseStarted {
            phase,
            set,
            duration_secs: total / 1000,
            at: Utc::now(),
        }]
    }

    fn complete_timer(&mut self) -> Vec<Event> {
        let mode = self.mode;
        self.emitter.emit(Cue::Final);
        self.cancel_to_idle();
        vec![Event::Completed {
            mode,
            at: Utc::now(),
        }]
    }
}
