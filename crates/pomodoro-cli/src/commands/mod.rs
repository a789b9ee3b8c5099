pub mod clock;
pub mod config;
pub mod run;

use pomodoro_core::{Config, ConfigError};
use std::path::Path;

/// Load `--config` if given, else the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(p) => Config::load_from(p),
        None => Config::load(),
    }
}
