//! Optional TOML configuration.
//!
//! Looked up at `TASKLET_CONFIG`, falling back to
//! `~/.config/tasklet/config.toml` on Linux. Every field has a default, so a
//! missing file or a missing section is never an error.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::Filter;

/// Storage key the task list lives under.
pub const DEFAULT_STORAGE_KEY: &str = "todos";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where and under which key tasks are persisted.
    pub storage: StorageConfig,
    /// Terminal UI behaviour.
    pub ui: UiConfig,
}

/// Persistent store settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage file path. `None` uses the platform data directory.
    ///
    /// The `TASKLET_DB` environment variable overrides this value.
    pub path: Option<PathBuf>,
    /// Key holding the serialized task list inside the storage file.
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Terminal UI settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    /// Filter selected when the UI starts.
    pub default_filter: Filter,
    /// Number of frames a deleted row keeps animating before it disappears.
    pub exit_frames: u8,
    /// Frame interval in milliseconds.
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_filter: Filter::All,
            exit_frames: 6,
            tick_ms: 50,
        }
    }
}

impl Config {
    /// Parses a configuration document.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Loads the configuration file, falling back to defaults when it is
    /// absent or unreadable.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Config::default();
        }
        let contents = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read config, using defaults");
                return Config::default();
            }
        };
        Config::from_toml_str(&contents).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Malformed config, using defaults");
            Config::default()
        })
    }

    /// Resolves the storage file path.
    ///
    /// The path is determined in the following order:
    /// 1. `TASKLET_DB` environment variable.
    /// 2. `storage.path` from the config file.
    /// 3. `~/.local/share/tasklet/storage.json` (on Linux).
    /// 4. `./storage.json` (fallback).
    pub fn storage_path(&self) -> PathBuf {
        if let Ok(p) = std::env::var("TASKLET_DB") {
            return PathBuf::from(p);
        }
        if let Some(p) = &self.storage.path {
            return p.clone();
        }
        let mut p = data_dir();
        p.push("storage.json");
        p
    }
}

/// Returns the path of the configuration file.
pub fn config_path() -> PathBuf {
    std::env::var("TASKLET_CONFIG").map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("tasklet");
        p.push("config.toml");
        p
    })
}

/// Returns the application data directory, `./` when none can be found.
pub fn data_dir() -> PathBuf {
    match dirs::data_local_dir() {
        Some(mut p) => {
            p.push("tasklet");
            p
        }
        None => PathBuf::from("."),
    }
}
