use clap::Subcommand;
use hiit_core::{NullEmitter, PrefKey, TimerEngine, TomlPrefs};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print stored preferences as JSON
    Show,
    /// Set a stored preference
    Set {
        /// Preference key (work_duration_seconds, rest_duration_seconds,
        /// total_sets, last_duration_minutes)
        key: String,
        /// New value
        value: i64,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let prefs = TomlPrefs::open()?;
            let engine = TimerEngine::new(Box::new(prefs), Box::new(NullEmitter));
            println!("{}", serde_json::to_string_pretty(engine.config())?);
        }
        ConfigAction::Set { key, value } => {
            let Some(pref_key) = PrefKey::from_str_key(&key) else {
                eprintln!("unknown key: {key}");
                std::process::exit(1);
            };
            let prefs = TomlPrefs::open()?;
            let mut engine = TimerEngine::new(Box::new(prefs), Box::new(NullEmitter));
            // Negative or oversized values saturate past every valid range
            // and get rejected by the engine's setters.
            let v = u32::try_from(value).unwrap_or(u32::MAX);
            match pref_key {
                PrefKey::WorkDurationSeconds => engine.set_work_seconds(v),
                PrefKey::RestDurationSeconds => engine.set_rest_seconds(v),
                PrefKey::TotalSets => engine.set_total_sets(v),
                PrefKey::LastDurationMinutes => engine.set_total_minutes(v),
            }
            let applied = match pref_key {
                PrefKey::WorkDurationSeconds => engine.config().work_secs(),
                PrefKey::RestDurationSeconds => engine.config().rest_secs(),
                PrefKey::TotalSets => engine.config().total_sets(),
                PrefKey::LastDurationMinutes => engine.config().total_minutes(),
            };
            if applied == v {
                println!("ok");
            } else {
                eprintln!("value out of range for {key}: {value}");
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
