mod config;

pub use config::{Config, LofiConfig, NotificationsConfig, SessionSection};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/pomodoro-desk[-dev]/` based on POMODORO_ENV.
///
/// Set POMODORO_ENV=dev to use the development config directory. The
/// directory is not created; the app never writes to it.
///
/// # Errors
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .ok_or(ConfigError::NoConfigDir)?
        .join(".config");

    let env = std::env::var("POMODORO_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomodoro-desk-dev")
    } else {
        base_dir.join("pomodoro-desk")
    };

    Ok(dir)
}
