//! TOML-based application configuration.
//!
//! Stores the scheduler defaults used when the caller gives no explicit
//! options: travel buffers, horizon length, minimum block, daily study cap
//! and the packing heuristics.
//!
//! Configuration is stored at `~/.config/studyplan/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};
use crate::scheduler::SchedulerOptions;

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/studyplan/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scheduler: SchedulerOptions,
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

    fn set_json_value_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<()> {
        let unknown = || CoreError::from(ConfigError::UnknownKey(key.to_string()));
        let invalid = |message: String| {
            CoreError::from(ConfigError::InvalidValue {
                key: key.to_string(),
                message,
            })
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) => {
                        return Err(invalid("cannot replace a whole section".to_string()))
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting scheduler options are out of range.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.scheduler.validate()?;
        *self = updated;
        Ok(())
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
    }

    #[test]
    fn empty_file_yields_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.scheduler.days_to_schedule, 7);
        assert_eq!(parsed.scheduler.tuning.min_break_minutes, 15);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("scheduler.days_to_schedule").as_deref(), Some("7"));
        assert_eq!(cfg.get("scheduler.tuning.max_consecutive_tasks").as_deref(), Some("2"));
        assert_eq!(cfg.get("scheduler.max_daily_study_hours").as_deref(), Some("5.0"));
        assert!(cfg.get("scheduler.missing_key").is_none());
        assert!(cfg.get("scheduler").is_none());
    }

    #[test]
    fn set_updates_nested_numbers() {
        let mut cfg = Config::default();
        cfg.set("scheduler.travel_time_before_minutes", "45").unwrap();
        cfg.set("scheduler.max_daily_study_hours", "3.5").unwrap();
        cfg.set("scheduler.tuning.min_break_minutes", "10").unwrap();

        assert_eq!(cfg.scheduler.travel_time_before_minutes, 45);
        assert_eq!(cfg.scheduler.max_daily_study_hours, 3.5);
        assert_eq!(cfg.scheduler.tuning.min_break_minutes, 10);
    }

    #[test]
    fn set_rejects_unknown_and_invalid() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("scheduler.nope", "1"),
            Err(CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(cfg.set("scheduler.days_to_schedule", "soon").is_err());
        assert!(cfg.set("scheduler.days_to_schedule", "0").is_err());
        assert!(cfg.set("scheduler.tuning", "1").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_and_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.set("scheduler.days_to_schedule", "14").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.scheduler.days_to_schedule, 14);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scheduler]\ndays_to_schedule = \"many\"\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::ParseFailed(_)))
        ));
    }
}
