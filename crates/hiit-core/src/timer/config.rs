use serde::{Deserialize, Serialize};

use crate::prefs::{PrefKey, PreferenceStore};

/// Timer mode, fixed for the duration of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Configurable work/rest cycle over a number of sets.
    Routine,
    /// Single continuous countdown with per-minute cues.
    DeathByBurpees,
}

/// Countdown phase. Rest only occurs in Routine mode; DeathByBurpees runs
/// one continuous Work phase subdivided into 60-second windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Rest,
}

pub(crate) const WORK_SECS_RANGE: std::ops::RangeInclusive<u32> = 5..=3600;
pub(crate) const REST_SECS_RANGE: std::ops::RangeInclusive<u32> = 0..=3600;
pub(crate) const TOTAL_SETS_RANGE: std::ops::RangeInclusive<u32> = 1..=99;
pub(crate) const TOTAL_MINUTES_RANGE: std::ops::RangeInclusive<u32> = 1..=999;

/// Validated timer configuration.
///
/// Setters reject out-of-range values and keep the prior valid value, so a
/// `TimerConfig` is valid at all times. Fields are read through getters;
/// mutation goes through [`TimerEngine`](super::TimerEngine) so every
/// accepted update is persisted immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    mode: Mode,
    /// Work phase length in seconds (Routine).
    work_secs: u32,
    /// Rest phase length in seconds (Routine); 0 skips Rest entirely.
    rest_secs: u32,
    /// Number of Work(+Rest) repetitions (Routine).
    total_sets: u32,
    /// Total countdown length in minutes (DeathByBurpees).
    total_minutes: u32,
}

impl TimerConfig {
    /// Build a configuration from stored preferences.
    ///
    /// A hand-edited store may hold out-of-range values; those fall back to
    /// the key's default so the invariant "always valid" holds from birth.
    pub fn from_prefs(mode: Mode, prefs: &dyn PreferenceStore) -> Self {
        let load = |key: PrefKey, range: &std::ops::RangeInclusive<u32>| -> u32 {
            let raw = prefs.get_int(key, key.default_value());
            u32::try_from(raw)
                .ok()
                .filter(|v| range.contains(v))
                .unwrap_or(key.default_value() as u32)
        };
        Self {
            mode,
            work_secs: load(PrefKey::WorkDurationSeconds, &WORK_SECS_RANGE),
            rest_secs: load(PrefKey::RestDurationSeconds, &REST_SECS_RANGE),
            total_sets: load(PrefKey::TotalSets, &TOTAL_SETS_RANGE),
            total_minutes: load(PrefKey::LastDurationMinutes, &TOTAL_MINUTES_RANGE),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn work_secs(&self) -> u32 {
        self.work_secs
    }

    pub fn rest_secs(&self) -> u32 {
        self.rest_secs
    }

    pub fn total_sets(&self) -> u32 {
        self.total_sets
    }

    pub fn total_minutes(&self) -> u32 {
        self.total_minutes
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Each setter returns whether the value was accepted; rejected values
    /// leave the prior valid value in place.
    pub(crate) fn set_work_secs(&mut self, secs: u32) -> bool {
        Self::update(&mut self.work_secs, secs, WORK_SECS_RANGE)
    }

    pub(crate) fn set_rest_secs(&mut self, secs: u32) -> bool {
        Self::update(&mut self.rest_secs, secs, REST_SECS_RANGE)
    }

    pub(crate) fn set_total_sets(&mut self, sets: u32) -> bool {
        Self::update(&mut self.total_sets, sets, TOTAL_SETS_RANGE)
    }

    pub(crate) fn set_total_minutes(&mut self, minutes: u32) -> bool {
        Self::update(&mut self.total_minutes, minutes, TOTAL_MINUTES_RANGE)
    }

    fn update(field: &mut u32, value: u32, range: std::ops::RangeInclusive<u32>) -> bool {
        if range.contains(&value) {
            *field = value;
            true
        } else {
            false
        }
    }
}

impl Mode {
    /// Duration in milliseconds of the first phase for this mode.
    pub fn initial_phase_ms(self, config: &TimerConfig) -> u64 {
        match self {
            Mode::Routine => u64::from(config.work_secs) * 1000,
            Mode::DeathByBurpees => u64::from(config.total_minutes) * 60_000,
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Routine,
            work_secs: PrefKey::WorkDurationSeconds.default_value() as u32,
            rest_secs: PrefKey::RestDurationSeconds.default_value() as u32,
            total_sets: PrefKey::TotalSets.default_value() as u32,
            total_minutes: PrefKey::LastDurationMinutes.default_value() as u32,
        }
    }
}
