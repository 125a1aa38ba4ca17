mod config;

pub use config::{Config, DemoAccountConfig, DispenserConfig, PreferencesConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/healthbuddy[-dev]/` based on HEALTHBUDDY_ENV.
///
/// Set HEALTHBUDDY_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HEALTHBUDDY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("healthbuddy-dev")
    } else {
        base_dir.join("healthbuddy")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}
