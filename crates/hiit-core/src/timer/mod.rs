mod config;
mod cue;
mod engine;

pub use config::{Mode, Phase, TimerConfig};
pub use cue::{Cue, WarningParams};
pub use engine::{format_mm_ss, TickToken, TimerEngine, TimerSnapshot, TimerState};
