//! # hiit Core Library
//!
//! This library provides the core logic for the hiit interval training timer.
//! It implements a CLI-first philosophy where every operation is available
//! through the standalone `hiit` binary; any GUI would be a thin layer over
//! the same core library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven state machine that requires the caller
//!   to feed it elapsed time at >= 20 Hz while running
//! - **Cue scheduling**: maps whole-second boundaries within the current
//!   phase to audible/haptic cue requests, exactly once per boundary
//! - **Preferences**: TOML-based last-used-values storage
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: core timer state machine and cue scheduler
//! - [`TimerConfig`]: validated work/rest/sets/minutes configuration
//! - [`CueEmitter`]: trait for the host's audio/haptic collaborator
//! - [`PreferenceStore`]: trait for last-used-values persistence

pub mod emitter;
pub mod error;
pub mod events;
pub mod prefs;
pub mod timer;

pub use emitter::{CueEmitter, NullEmitter, RecordingEmitter};
pub use error::PrefsError;
pub use events::Event;
pub use prefs::{MemoryPrefs, PrefKey, PreferenceStore, TomlPrefs};
pub use timer::{
    format_mm_ss, Cue, Mode, Phase, TickToken, TimerConfig, TimerEngine, TimerSnapshot,
    TimerState, WarningParams,
};
