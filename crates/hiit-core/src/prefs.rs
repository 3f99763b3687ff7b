//! Last-used-values storage.
//!
//! The engine persists each accepted configuration update immediately, the
//! way the original app wrote every change through to SharedPreferences.
//! Storage failures never reach the engine: persistence is best-effort and
//! a missing or unreadable file just yields defaults.
//!
//! The file-backed store keeps its data as TOML at
//! `~/.config/hiit/prefs.toml`.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{PrefsError, Result};

/// Keys understood by every [`PreferenceStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefKey {
    /// DeathByBurpees countdown length in minutes.
    LastDurationMinutes,
    /// Routine work phase length in seconds.
    WorkDurationSeconds,
    /// Routine rest phase length in seconds.
    RestDurationSeconds,
    /// Routine set count.
    TotalSets,
}

impl PrefKey {
    pub fn as_str(self) -> &'static str {
        match self {
            PrefKey::LastDurationMinutes => "last_duration_minutes",
            PrefKey::WorkDurationSeconds => "work_duration_seconds",
            PrefKey::RestDurationSeconds => "rest_duration_seconds",
            PrefKey::TotalSets => "total_sets",
        }
    }

    /// Value used when a store has nothing for this key.
    pub fn default_value(self) -> i64 {
        match self {
            PrefKey::LastDurationMinutes => 5,
            PrefKey::WorkDurationSeconds => 60,
            PrefKey::RestDurationSeconds => 180,
            PrefKey::TotalSets => 8,
        }
    }

    /// Parse a key from its stored name.
    pub fn from_str_key(s: &str) -> Option<Self> {
        match s {
            "last_duration_minutes" => Some(PrefKey::LastDurationMinutes),
            "work_duration_seconds" => Some(PrefKey::WorkDurationSeconds),
            "rest_duration_seconds" => Some(PrefKey::RestDurationSeconds),
            "total_sets" => Some(PrefKey::TotalSets),
            _ => None,
        }
    }
}

/// Persists and retrieves last-used numeric settings.
pub trait PreferenceStore {
    /// Stored value for `key`, or `default` when absent.
    fn get_int(&self, key: PrefKey, default: i64) -> i64;
    /// Store a value. Best-effort; failures are swallowed.
    fn set_int(&mut self, key: PrefKey, value: i64);
}

/// In-memory store for tests and hosts without a config directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPrefs {
    values: HashMap<PrefKey, i64>,
}

impl PreferenceStore for MemoryPrefs {
    fn get_int(&self, key: PrefKey, default: i64) -> i64 {
        self.values.get(&key).copied().unwrap_or(default)
    }

    fn set_int(&mut self, key: PrefKey, value: i64) {
        self.values.insert(key, value);
    }
}

/// On-disk representation of the preferences file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PrefsFile {
    #[serde(default)]
    last_duration_minutes: Option<i64>,
    #[serde(default)]
    work_duration_seconds: Option<i64>,
    #[serde(default)]
    rest_duration_seconds: Option<i64>,
    #[serde(default)]
    total_sets: Option<i64>,
}

impl PrefsFile {
    fn get(&self, key: PrefKey) -> Option<i64> {
        match key {
            PrefKey::LastDurationMinutes => self.last_duration_minutes,
            PrefKey::WorkDurationSeconds => self.work_duration_seconds,
            PrefKey::RestDurationSeconds => self.rest_duration_seconds,
            PrefKey::TotalSets => self.total_sets,
        }
    }

    fn set(&mut self, key: PrefKey, value: i64) {
        let slot = match key {
            PrefKey::LastDurationMinutes => &mut self.last_duration_minutes,
            PrefKey::WorkDurationSeconds => &mut self.work_duration_seconds,
            PrefKey::RestDurationSeconds => &mut self.rest_duration_seconds,
            PrefKey::TotalSets => &mut self.total_sets,
        };
        *slot = Some(value);
    }
}

/// TOML-file-backed preference store.
pub struct TomlPrefs {
    path: PathBuf,
    values: PrefsFile,
}

impl TomlPrefs {
    /// Returns `~/.config/hiit[-dev]/` based on HIIT_ENV.
    ///
    /// Set HIIT_ENV=dev to use a development data directory.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created.
    pub fn data_dir() -> Result<PathBuf> {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");

        let env = std::env::var("HIIT_ENV").unwrap_or_else(|_| "production".to_string());

        let dir = if env == "dev" {
            base_dir.join("hiit-dev")
        } else {
            base_dir.join("hiit")
        };

        std::fs::create_dir_all(&dir).map_err(|source| PrefsError::Write {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    /// Open the store at its default location, reading any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be created or the
    /// file exists but is not valid TOML.
    pub fn open() -> Result<Self> {
        Self::open_at(Self::data_dir()?.join("prefs.toml"))
    }

    /// Open a store backed by an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open_at(path: PathBuf) -> Result<Self> {
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PrefsFile::default(),
            Err(source) => return Err(PrefsError::Read { path, source }),
        };
        Ok(Self { path, values })
    }

    /// Open the default store, falling back to an empty in-memory state on
    /// any error. This is a convenience method that never fails.
    pub fn open_or_default() -> Self {
        Self::open().unwrap_or_else(|_| Self {
            path: PathBuf::from("prefs.toml"),
            values: PrefsFile::default(),
        })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        let content = toml::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, content).map_err(|source| PrefsError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStore for TomlPrefs {
    fn get_int(&self, key: PrefKey, default: i64) -> i64 {
        self.values.get(key).unwrap_or(default)
    }

    fn set_int(&mut self, key: PrefKey, value: i64) {
        self.values.set(key, value);
        // Persistence is fire-and-forget, like the original's
        // SharedPreferences.apply().
        let _ = self.save();
    }
}
