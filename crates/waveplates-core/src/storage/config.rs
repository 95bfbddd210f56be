//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Defaults offered when adding a tracker (capacity and regeneration rate)
//! - The spend/gain amounts shown as delta buttons
//! - Display refresh interval
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};

/// Defaults for new trackers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u32,
    #[serde(default = "default_minutes_per_unit")]
    pub minutes_per_unit: u32,
}

/// Amounts offered as one-step spend/gain actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltasConfig {
    #[serde(default = "default_delta_steps")]
    pub spend: Vec<u32>,
    #[serde(default = "default_delta_steps")]
    pub gain: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub deltas: DeltasConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

// Default functions
fn default_max_capacity() -> u32 {
    240
}
fn default_minutes_per_unit() -> u32 {
    6
}
fn default_delta_steps() -> Vec<u32> {
    vec![10, 20, 30, 40, 50, 60]
}
fn default_refresh_interval_secs() -> u64 {
    1
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
            minutes_per_unit: default_minutes_per_unit(),
        }
    }
}

impl Default for DeltasConfig {
    fn default() -> Self {
        Self {
            spend: default_delta_steps(),
            gain: default_delta_steps(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
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
        if key.is_empty() {
            return Err(unknown());
        }

        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                ),
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?,
                serde_json::Value::Array(_) => parse_list(value).map_err(invalid)?,
                serde_json::Value::Object(_) => return Err(invalid("not a leaf key".to_string())),
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or create the file with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, writing defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Reject values the stamina arithmetic cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |key: &str, value: u64| {
            if value == 0 {
                Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "must be at least 1".to_string(),
                })
            } else {
                Ok(())
            }
        };
        positive("defaults.max_capacity", u64::from(self.defaults.max_capacity))?;
        positive("defaults.minutes_per_unit", u64::from(self.defaults.minutes_per_unit))?;
        positive("display.refresh_interval_secs", self.display.refresh_interval_secs)?;
        for (key, steps) in [("deltas.spend", &self.deltas.spend), ("deltas.gain", &self.deltas.gain)] {
            if steps.iter().any(|&n| n == 0) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "amounts must be at least 1".to_string(),
                });
            }
        }
        Ok(())
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

    /// Set a config value by key without saving. Returns error if the key is
    /// unknown or the resulting config is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

/// Parse `10,20,30` or `[10, 20, 30]` into a JSON array of numbers.
fn parse_list(value: &str) -> Result<serde_json::Value, String> {
    let inner = value.trim().trim_start_matches('[').trim_end_matches(']');
    let numbers = inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .map(|n| serde_json::Value::Number(n.into()))
                .map_err(|_| format!("cannot parse '{s}' as a whole number"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(serde_json::Value::Array(numbers))
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
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.defaults.max_capacity, 240);
        assert_eq!(cfg.defaults.minutes_per_unit, 6);
        assert_eq!(cfg.deltas.spend, vec![10, 20, 30, 40, 50, 60]);
        assert_eq!(cfg.deltas.gain, vec![10, 20, 30, 40, 50, 60]);
        assert_eq!(cfg.display.refresh_interval_secs, 1);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[defaults]\nmax_capacity = 200\n").unwrap();
        assert_eq!(parsed.defaults.max_capacity, 200);
        assert_eq!(parsed.defaults.minutes_per_unit, 6);
        assert_eq!(parsed.display.refresh_interval_secs, 1);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("defaults.max_capacity").as_deref(), Some("240"));
        assert_eq!(cfg.get("deltas.spend").as_deref(), Some("[10,20,30,40,50,60]"));
        assert!(cfg.get("defaults.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("defaults.minutes_per_unit", "8").unwrap();
        assert_eq!(cfg.defaults.minutes_per_unit, 8);
    }

    #[test]
    fn set_updates_list() {
        let mut cfg = Config::default();
        cfg.set("deltas.gain", "1, 5,40").unwrap();
        assert_eq!(cfg.deltas.gain, vec![1, 5, 40]);
        cfg.set("deltas.spend", "[20,40]").unwrap();
        assert_eq!(cfg.deltas.spend, vec![20, 40]);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("defaults.nonexistent_key", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("defaults", "1"), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn set_rejects_invalid_values() {
        let mut cfg = Config::default();
        assert!(cfg.set("defaults.max_capacity", "lots").is_err());
        assert!(cfg.set("defaults.max_capacity", "0").is_err());
        assert!(cfg.set("deltas.spend", "10,zero").is_err());
        assert!(cfg.set("deltas.spend", "0,10").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_from_creates_default_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("defaults.max_capacity", "200").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().defaults.max_capacity, 200);
    }

    #[test]
    fn load_from_rejects_garbage() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "defaults = 3").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
