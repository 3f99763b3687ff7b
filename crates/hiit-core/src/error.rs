//! Error types for hiit-core.
//!
//! The engine itself never fails: invalid operations and out-of-range
//! configuration values are no-ops, and cue emission never reports failure
//! to the tick path. Errors only arise at the preference storage boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Preference storage errors.
#[derive(Error, Debug)]
pub enum PrefsError {
    /// Failed to read the preferences file
    #[error("failed to read preferences from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the preferences file
    #[error("failed to write preferences to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Preferences file exists but is not valid TOML
    #[error("failed to parse preferences: {0}")]
    Parse(#[from] toml::de::Error),

    /// Preferences could not be serialized
    #[error("failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type alias for PrefsError
pub type Result<T, E = PrefsError> = std::result::Result<T, E>;
