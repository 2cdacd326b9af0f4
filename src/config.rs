//! Persistent settings
//!
//! Settings live in a YAML file under the user's configuration directory.
//! Every section falls back to its defaults, so a partial file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const APP_DIR: &str = "filament-swc";
const CONFIG_FILE: &str = "config.yaml";
const LOG_FILE: &str = "filament_swc_export.log";

/// Errors raised while loading or applying settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid log level '{0}'")]
    InvalidLevel(String),

    #[error("Could not open log file {}: {reason}", .path.display())]
    LogFile { path: PathBuf, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Default location of the settings file
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR).join(CONFIG_FILE))
}

fn default_log_path() -> PathBuf {
    dirs::home_dir().unwrap_or_default().join(LOG_FILE)
}

/// Log destinations and levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Append-mode log file
    pub path: PathBuf,
    pub file_level: String,
    /// Overridden by `RUST_LOG` when set
    pub console_level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            path: default_log_path(),
            file_level: "debug".to_string(),
            console_level: "info".to_string(),
        }
    }
}

impl LogSettings {
    pub fn file_filter(&self) -> ConfigResult<LevelFilter> {
        parse_level(&self.file_level)
    }

    pub fn console_filter(&self) -> ConfigResult<LevelFilter> {
        parse_level(&self.console_level)
    }
}

fn parse_level(level: &str) -> ConfigResult<LevelFilter> {
    level
        .parse::<LevelFilter>()
        .map_err(|_| ConfigError::InvalidLevel(level.to_string()))
}

/// Single-file export options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Write one SWC per filament next to the combined file
    pub write_individual: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            write_individual: true,
        }
    }
}

/// Batch discovery and host polling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Input file extensions, without the dot
    pub extensions: Vec<String>,
    pub dataset_timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            extensions: vec!["ims".to_string(), "imsr".to_string()],
            dataset_timeout_secs: 120,
            poll_interval_ms: 500,
        }
    }
}

impl BatchSettings {
    pub fn dataset_timeout(&self) -> Duration {
        Duration::from_secs(self.dataset_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// All persistent settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log: LogSettings,
    pub export: ExportSettings,
    pub batch: BatchSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `path` or the default location, returning defaults
    /// when the file is missing or unreadable
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(config_path) else {
            return Self::default();
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load settings from {}, using defaults: {}", path.display(), e);
            Self::default()
        })
    }

    /// Write settings as YAML, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn validate(&self) -> ConfigResult<()> {
        self.log.file_filter()?;
        self.log.console_filter()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::default();
        assert!(settings.log.path.ends_with(LOG_FILE));
        assert_eq!(settings.log.file_filter().unwrap(), LevelFilter::DEBUG);
        assert_eq!(settings.log.console_filter().unwrap(), LevelFilter::INFO);
        assert!(settings.export.write_individual);
        assert_eq!(settings.batch.extensions, vec!["ims", "imsr"]);
        assert_eq!(settings.batch.dataset_timeout(), Duration::from_secs(120));
        assert_eq!(settings.batch.poll_interval(), Duration::from_millis(500));
    }

    #[test]
    fn partial_file_fills_missing_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "batch:\n  dataset_timeout_secs: 5\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.batch.dataset_timeout_secs, 5);
        assert_eq!(settings.batch.poll_interval_ms, 500);
        assert_eq!(settings.export, ExportSettings::default());
    }

    #[test]
    fn invalid_level_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "log:\n  console_level: loud\n").unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLevel(level) if level == "loud"));
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "export: [not, a, map").unwrap();

        assert!(matches!(Settings::load(&path), Err(ConfigError::Yaml(_))));
        assert_eq!(Settings::load_or_default(Some(&path)), Settings::default());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let mut settings = Settings::default();
        settings.export.write_individual = false;
        settings.batch.extensions = vec!["json".to_string()];
        settings.log.file_level = "trace".to_string();

        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }
}
