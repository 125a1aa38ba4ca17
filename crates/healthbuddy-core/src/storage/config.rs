//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Dispenser on/off switch and its simulated delays
//! - Settings screen toggles (Google Fit, notifications, dark mode)
//! - The demo login account
//!
//! Configuration is stored at `~/.config/healthbuddy/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::auth::{Credentials, DemoAuthenticator};
use crate::dispenser::DispenserTimings;
use crate::error::ConfigError;

/// Dispenser configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispenserConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_scan_delay_ms")]
    pub scan_delay_ms: u64,
    #[serde(default = "default_dispense_delay_ms")]
    pub dispense_delay_ms: u64,
    /// Fixed seed for supplement selection (random when unset).
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Settings screen toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesConfig {
    #[serde(default = "default_true")]
    pub google_fit_enabled: bool,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    #[serde(default)]
    pub dark_mode: bool,
}

/// Account accepted by the demo login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoAccountConfig {
    #[serde(default = "default_email")]
    pub email: String,
    #[serde(default = "default_password")]
    pub password: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/healthbuddy/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dispenser: DispenserConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
    #[serde(default)]
    pub demo_account: DemoAccountConfig,
}

// Default functions
fn default_true() -> bool {
    true
}
fn default_scan_delay_ms() -> u64 {
    DispenserTimings::DEFAULT_SCAN_DELAY_MS
}
fn default_dispense_delay_ms() -> u64 {
    DispenserTimings::DEFAULT_DISPENSE_DELAY_MS
}
fn default_email() -> String {
    DemoAuthenticator::DEFAULT_EMAIL.into()
}
fn default_password() -> String {
    DemoAuthenticator::DEFAULT_PASSWORD.into()
}

impl Default for DispenserConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scan_delay_ms: default_scan_delay_ms(),
            dispense_delay_ms: default_dispense_delay_ms(),
            seed: None,
        }
    }
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            google_fit_enabled: true,
            notifications_enabled: true,
            dark_mode: false,
        }
    }
}

impl Default for DemoAccountConfig {
    fn default() -> Self {
        Self {
            email: default_email(),
            password: default_password(),
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

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                // `null` clears optional fields; required ones fail deserialization in `set`.
                if value == "null" && !existing.is_string() {
                    obj.insert(part.to_string(), serde_json::Value::Null);
                    return Ok(());
                }

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    // Optional fields: accept JSON literals, fall back to a string.
                    serde_json::Value::Null => serde_json::from_str(value)
                        .unwrap_or_else(|_| serde_json::Value::String(value.into())),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, or defaults if no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, or defaults if it does not exist. Nothing is written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
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

    /// Set a config value by key in memory. Call [`save`](Self::save) to persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// into the field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }

    pub fn timings(&self) -> DispenserTimings {
        DispenserTimings::from_millis(
            self.dispenser.scan_delay_ms,
            self.dispenser.dispense_delay_ms,
        )
    }

    pub fn demo_credentials(&self) -> Credentials {
        Credentials::new(&self.demo_account.email, &self.demo_account.password)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert!(parsed.dispenser.enabled);
        assert_eq!(parsed.dispenser.scan_delay_ms, 2000);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[preferences]\ndark_mode = true\n").unwrap();
        assert!(cfg.preferences.dark_mode);
        assert!(cfg.preferences.google_fit_enabled);
        assert_eq!(cfg.dispenser.dispense_delay_ms, 3000);
        assert_eq!(cfg.demo_account.email, "test@buddy.com");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("dispenser.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("dispenser.scan_delay_ms").as_deref(), Some("2000"));
        assert_eq!(cfg.get("demo_account.email").as_deref(), Some("test@buddy.com"));
        assert!(cfg.get("dispenser.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_typed_fields() {
        let mut cfg = Config::default();
        cfg.set("preferences.dark_mode", "true").unwrap();
        cfg.set("dispenser.dispense_delay_ms", "10").unwrap();
        cfg.set("demo_account.password", "hunter2").unwrap();
        cfg.set("dispenser.seed", "42").unwrap();

        assert!(cfg.preferences.dark_mode);
        assert_eq!(cfg.timings().dispense_delay, std::time::Duration::from_millis(10));
        assert_eq!(cfg.demo_credentials().password, "hunter2");
        assert_eq!(cfg.dispenser.seed, Some(42));
    }

    #[test]
    fn set_null_clears_optional_seed() {
        let mut cfg = Config::default();
        cfg.set("dispenser.seed", "42").unwrap();
        cfg.set("dispenser.seed", "null").unwrap();
        assert_eq!(cfg.dispenser.seed, None);
        assert_eq!(cfg.get("dispenser.seed").as_deref(), Some("null"));

        cfg.set("dispenser.seed", "7").unwrap();
        assert_eq!(cfg.dispenser.seed, Some(7));
    }

    #[test]
    fn set_null_rejected_for_required_fields() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("dispenser.enabled", "null"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.set("dispenser.scan_delay_ms", "null").is_err());
        assert_eq!(cfg, Config::default());

        // Strings take the text as-is.
        cfg.set("demo_account.password", "null").unwrap();
        assert_eq!(cfg.demo_account.password, "null");
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("preferences.nonexistent_key", "value"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(cfg.set("", "value").is_err());
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("preferences.dark_mode", "not_a_bool"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.set("dispenser.scan_delay_ms", "soon").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
        assert!(!path.exists());

        let mut cfg = Config::default();
        cfg.set("dispenser.enabled", "false").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(!loaded.dispenser.enabled);
    }

    #[test]
    fn load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "dispenser = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
