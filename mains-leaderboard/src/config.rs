use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{dashboard::Features, AppError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub port: u16,
    #[serde(deserialize_with = "at_least_one")]
    pub shiny_odds: u32,
    pub volume: f32,
    pub game: String,
    pub static_dir: PathBuf,
    pub species_file: Option<PathBuf>,
    /// CSV log to seed an empty database from.
    pub legacy_csv: Option<PathBuf>,
    pub session_ttl_minutes: u64,
    pub show_bst: bool,
    pub details_modal: bool,
    pub since_last_toggle: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Mains Leaderboard".into(),
            port: 8080,
            shiny_odds: 8192,
            volume: 0.5,
            game: "crystal".into(),
            static_dir: PathBuf::from("static"),
            species_file: None,
            legacy_csv: Some(PathBuf::from("pokemon_usage.csv")),
            session_ttl_minutes: 12 * 60,
            show_bst: true,
            details_modal: true,
            since_last_toggle: true,
        }
    }
}

impl Config {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_minutes.max(1) * 60)
    }

    pub fn features(&self) -> Features {
        Features {
            show_bst: self.show_bst,
            details_modal: self.details_modal,
            since_last_toggle: self.since_last_toggle,
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume.clamp(0.0, 1.0)
    }
}

/// Odds are "one in N", so anything below 1 means 1.
fn at_least_one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let odds = i64::deserialize(deserializer)?;
    Ok(odds.clamp(1, u32::MAX as i64) as u32)
}

/// Loads the config file, filling in (and writing back) any missing keys.
///
/// An empty or malformed file is not fatal: the defaults are used and a
/// warning is logged.
pub fn load(path: &Path) -> Result<Config, AppError> {
    let mut stored = read_stored(path);

    let defaults = match serde_json::to_value(Config::default())? {
        Value::Object(defaults) => defaults,
        _ => Map::new(),
    };

    let mut updated = false;
    for (key, value) in defaults {
        if !stored.contains_key(&key) {
            stored.insert(key, value);
            updated = true;
        }
    }

    let config = match serde_json::from_value::<Config>(Value::Object(stored.clone())) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{} has invalid values: {e}. Using default configuration.", path.display());
            return Ok(Config::default());
        }
    };

    if updated {
        std::fs::write(path, serde_json::to_string_pretty(&stored)?)?;
        tracing::info!("Wrote missing configuration keys to {}", path.display());
    }

    Ok(config)
}

fn read_stored(path: &Path) -> Map<String, Value> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Map::new(),
        Err(e) => {
            tracing::warn!("Error reading {}: {e}. Using default configuration.", path.display());
            return Map::new();
        }
    };

    if content.trim().is_empty() {
        tracing::warn!("{} is empty. Using default configuration.", path.display());
        return Map::new();
    }

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            tracing::warn!("{} is not a JSON object. Using default configuration.", path.display());
            Map::new()
        }
        Err(e) => {
            tracing::warn!("{} contains invalid JSON: {e}. Using default configuration.", path.display());
            Map::new()
        }
    }
}
