//! Core error types for pomodoro-core.
//!
//! The countdown commands are total functions and never fail; errors only
//! come from validating session durations and from loading configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomodoro-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A work or break duration outside the accepted range
    #[error("Invalid {field} duration '{value}': {message}")]
    InvalidDuration {
        field: DurationField,
        value: String,
        message: String,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Which session duration failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationField {
    Work,
    Break,
}

impl std::fmt::Display for DurationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DurationField::Work => f.write_str("work"),
            DurationField::Break => f.write_str("break"),
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Could not locate the configuration directory
    #[error("Cannot determine configuration directory")]
    NoConfigDir,
}

impl CoreError {
    pub(crate) fn invalid_duration(
        field: DurationField,
        value: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        CoreError::InvalidDuration {
            field,
            value: value.to_string(),
            message: message.into(),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
