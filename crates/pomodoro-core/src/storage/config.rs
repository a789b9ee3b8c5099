//! TOML-based startup configuration.
//!
//! Seeds the defaults a session starts with:
//! - Work and break durations
//! - Notification and alert-sound preferences
//! - The background (lofi) track
//!
//! The file lives at `~/.config/pomodoro-desk/config.toml`. It is only ever
//! read; durations changed while a session runs are not written back.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::config_dir;
use crate::error::{ConfigError, Result};
use crate::session::{SessionConfig, DEFAULT_BREAK_SECS, DEFAULT_WORK_SECS};

/// Session durations, in minutes like the custom-timer dialog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSection {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u64,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u64,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub sound: bool,
    /// Path to the WAV played on every mode change.
    /// If unset, a system sound is used when one can be found.
    #[serde(default)]
    pub alarm_sound: Option<String>,
    #[serde(default = "default_50")]
    pub alarm_volume: u32,
}

/// Background track configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LofiConfig {
    #[serde(default)]
    pub track: Option<String>,
    #[serde(default = "default_50")]
    pub volume: u32,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub lofi: LofiConfig,
}

fn default_work_minutes() -> u64 {
    DEFAULT_WORK_SECS / 60
}
fn default_break_minutes() -> u64 {
    DEFAULT_BREAK_SECS / 60
}
fn default_true() -> bool {
    true
}
fn default_50() -> u32 {
    50
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            break_minutes: default_break_minutes(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: true,
            alarm_sound: None,
            alarm_volume: 50,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Default location of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from the default location, or defaults if there is no file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, or defaults if there is no file there.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                tracing::debug!(path = %path.display(), "loaded config");
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Starting durations, validated the same way `configure` validates.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::InvalidDuration`] for out-of-range minutes.
    pub fn session_config(&self) -> Result<SessionConfig> {
        SessionConfig::new(
            self.session.work_minutes.saturating_mul(60),
            self.session.break_minutes.saturating_mul(60),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.session.work_minutes, 25);
        assert_eq!(parsed.notifications.alarm_volume, 50);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg.session.work_minutes, 25);
        assert_eq!(cfg.session.break_minutes, 5);
        assert!(cfg.lofi.track.is_none());
        // Loading never creates the file.
        assert!(!dir.path().join("config.toml").exists());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[session]\nwork_minutes = 50\n\n[lofi]\ntrack = \"lofi.wav\"").unwrap();

        let cfg = Config::load_from(file.path()).unwrap();
        assert_eq!(cfg.session.work_minutes, 50);
        assert_eq!(cfg.session.break_minutes, 5);
        assert_eq!(cfg.lofi.track.as_deref(), Some("lofi.wav"));
        assert!(cfg.notifications.enabled);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[session\nwork_minutes = ").unwrap();
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed(_)));
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("session.work_minutes").as_deref(), Some("25"));
        assert_eq!(cfg.get("notifications.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("lofi.track").as_deref(), Some("null"));
        assert!(cfg.get("session.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn session_config_converts_minutes() {
        let cfg = Config::default();
        let session = cfg.session_config().unwrap();
        assert_eq!(session.work_secs(), 1500);
        assert_eq!(session.break_secs(), 300);

        let mut bad = Config::default();
        bad.session.break_minutes = 0;
        assert!(bad.session_config().is_err());
    }
}
