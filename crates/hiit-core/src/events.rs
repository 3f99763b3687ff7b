use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Mode, Phase};

/// Every state transition in the engine produces an Event.
/// Hosts print or forward them; cue requests travel separately through
/// [`CueEmitter`](crate::CueEmitter).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    Started {
        mode: Mode,
        phase: Phase,
        set: u32,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    Paused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    Resumed {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    Stopped {
        at: DateTime<Utc>,
    },
    Reset {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    /// A phase completed and the next one began within the same tick.
    PhaseStarted {
        phase: Phase,
        set: u32,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// The whole timer ran to natural completion.
    Completed {
        mode: Mode,
        at: DateTime<Utc>,
    },
}
