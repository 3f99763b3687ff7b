//! Cue scheduling rules.
//!
//! The engine evaluates these rules exactly once per whole-second boundary
//! while running. Which rule applies is a function of the session [`Mode`],
//! selected once at start -- there is no per-tick mode branching anywhere
//! else in the engine.
//!
//! - Routine: a progressive warning fires while 1..=10 seconds remain in
//!   the current phase.
//! - DeathByBurpees: a minute-boundary cue fires as each 60-second window
//!   completes, with the same progressive warning over the window's last
//!   ten seconds.
//!
//! Natural completion of the whole timer emits [`Cue::Final`] instead; the
//! engine never calls into this module for the zero-seconds boundary.

use serde::{Deserialize, Serialize};

use super::config::{Mode, Phase};

/// A cue request handed to the host's [`CueEmitter`](crate::CueEmitter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cue {
    /// Short beep that sharpens as the boundary approaches;
    /// `seconds_to_boundary` is in 1..=10.
    WarningProgressive { seconds_to_boundary: u8 },
    /// Long tone marking a completed minute window or the start of a phase.
    /// The phase lets emitters render distinct work-start vs rest-start
    /// tones.
    MinuteOrPhaseStart { phase: Phase },
    /// Distinct resolution tone on natural completion of the whole timer.
    Final,
}

/// Synthesis parameters for [`Cue::WarningProgressive`].
///
/// Any monotonic progression toward the boundary satisfies the contract;
/// these values reproduce the original tone ramp (400 Hz 100 ms quiet beeps
/// rising to 1 kHz 50 ms loud ones). Emitters that synthesize audio can use
/// them directly; others may ignore them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarningParams {
    pub frequency_hz: f64,
    pub duration_ms: u32,
    pub amplitude: f32,
}

impl Cue {
    /// Warning synthesis parameters; `None` for non-warning cues.
    pub fn warning_params(&self) -> Option<WarningParams> {
        match self {
            Cue::WarningProgressive { seconds_to_boundary } => {
                // 10s out => 0.0, 1s out => 1.0
                let progress = 1.0 - (f64::from(*seconds_to_boundary) - 1.0) / 9.0;
                Some(WarningParams {
                    frequency_hz: 400.0 + 600.0 * progress,
                    duration_ms: (100.0 - 50.0 * progress) as u32,
                    amplitude: (0.5 + 0.4 * progress) as f32,
                })
            }
            _ => None,
        }
    }
}

impl Mode {
    /// Cue to emit when the countdown crosses into `secs_remaining` whole
    /// seconds, given `total_secs` for the current phase.
    ///
    /// Never called with `secs_remaining == 0`: that boundary belongs to
    /// the completion procedure, which emits [`Cue::Final`] on its own.
    pub(super) fn cue_at_boundary(self, total_secs: u64, secs_remaining: u64) -> Option<Cue> {
        debug_assert!(secs_remaining > 0);
        match self {
            Mode::Routine => {
                if (1..=10).contains(&secs_remaining) {
                    Some(Cue::WarningProgressive {
                        seconds_to_boundary: secs_remaining as u8,
                    })
                } else {
                    None
                }
            }
            Mode::DeathByBurpees => {
                let elapsed = total_secs - secs_remaining;
                let m = elapsed % 60;
                if m == 0 && elapsed > 0 {
                    Some(Cue::MinuteOrPhaseStart { phase: Phase::Work })
                } else if (50..=59).contains(&m) {
                    Some(Cue::WarningProgressive {
                        seconds_to_boundary: (60 - m) as u8,
                    })
                } else {
                    None
                }
            }
        }
    }
}
