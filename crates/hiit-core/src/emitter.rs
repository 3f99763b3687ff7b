//! Cue emission boundary.
//!
//! The engine requests cues; turning them into sound and vibration is the
//! host's job. Emission is fire-and-forget: implementations must return
//! promptly and never surface failures to the tick path -- a dead speaker
//! degrades to silence, never to a stalled countdown.

use std::sync::{Arc, Mutex};

use crate::timer::Cue;

/// Collaborator that renders cues as audio/haptic feedback.
pub trait CueEmitter {
    /// Request a cue. Must not block and must not fail upward; emitters
    /// swallow device errors internally.
    fn emit(&self, cue: Cue);
}

/// Emitter that drops every cue. Useful for headless runs.
pub struct NullEmitter;

impl CueEmitter for NullEmitter {
    fn emit(&self, _cue: Cue) {}
}

/// Emitter that records every cue in order. The handle is cheaply
/// cloneable, so a test can keep one end while the engine owns the other.
#[derive(Clone, Default)]
pub struct RecordingEmitter {
    cues: Arc<Mutex<Vec<Cue>>>,
}

impl RecordingEmitter {
    /// All cues emitted so far, in emission order.
    pub fn cues(&self) -> Vec<Cue> {
        self.cues.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl CueEmitter for RecordingEmitter {
    fn emit(&self, cue: Cue) {
        self.cues.lock().unwrap_or_else(|e| e.into_inner()).push(cue);
    }
}
