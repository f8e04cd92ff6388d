//! Application configuration.
//!
//! Loaded from `config.toml` in the platform data directory. Missing files
//! and missing sections fall back to defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Duel track settings
    #[serde(default)]
    pub duel: DuelSettings,
    /// Leaderboard settings
    #[serde(default)]
    pub leaderboard: LeaderboardSettings,
    /// Ride settings
    #[serde(default)]
    pub ride: RideSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            duel: DuelSettings::default(),
            leaderboard: LeaderboardSettings::default(),
            ride: RideSettings::default(),
        }
    }
}

impl AppConfig {
    /// Path of the ride database.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("splitride.db")
    }
}

/// Duel track settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelSettings {
    /// Gap per offset step in milliseconds
    pub step_ms: f64,
    /// Pixels per offset step
    pub step_px: f64,
    /// Shortest segment duration used for interpolation
    pub min_segment_ms: f64,
    /// Segment duration when the pacing line has no time
    pub default_segment_ms: f64,
    /// Track inset on both ends in pixels
    pub track_padding_px: f64,
}

impl Default for DuelSettings {
    fn default() -> Self {
        Self {
            step_ms: 5000.0,
            step_px: 10.0,
            min_segment_ms: 15_000.0,
            default_segment_ms: 60_000.0,
            track_padding_px: 14.0,
        }
    }
}

/// Leaderboard display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardSettings {
    /// Entries per checkpoint board
    pub segment_top_n: usize,
    /// Entries on the history board
    pub history_limit: usize,
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            segment_top_n: 5,
            history_limit: 60,
        }
    }
}

/// Ride settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RideSettings {
    /// Prefix of the suggested runner name ("Attempt 18.10.2026")
    pub default_runner_name_prefix: String,
    /// Width of the terminal duel track in characters
    pub track_width: usize,
}

impl Default for RideSettings {
    fn default() -> Self {
        Self {
            default_runner_name_prefix: "Attempt".to_string(),
            track_width: 60,
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "splitride", "SplitRide")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load application configuration from file.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&get_config_path(), get_data_dir())
}

/// Load configuration from an explicit path.
pub fn load_config_from(path: &PathBuf, data_dir: PathBuf) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig {
            data_dir,
            ..Default::default()
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.data_dir = data_dir;

    Ok(config)
}

/// Save application configuration to file.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path())
}

/// Save configuration to an explicit path.
pub fn save_config_to(config: &AppConfig, path: &PathBuf) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
