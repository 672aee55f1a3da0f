//! TOML-based application configuration.
//!
//! Holds the timer defaults a fresh work session starts from: phase
//! durations, titles and the progress indicator symbols. The long break set
//! here is only the fallback; once the user picks one it lives in the kv store.
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};
use crate::timer::TimerConfiguration;

/// Timer defaults. Durations are in minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSection {
    #[serde(default = "default_focus_duration")]
    pub focus_duration: u32,
    #[serde(default = "default_short_break")]
    pub short_break: u32,
    #[serde(default = "default_long_break")]
    pub long_break: u32,
    #[serde(default = "default_work_title")]
    pub work_title: String,
    #[serde(default = "default_break_title")]
    pub break_title: String,
    #[serde(default = "default_complete_symbol")]
    pub complete_symbol: String,
    #[serde(default = "default_incomplete_symbol")]
    pub incomplete_symbol: String,
    #[serde(default = "default_cursor_symbol")]
    pub cursor_symbol: String,
    #[serde(default = "default_slot_symbol")]
    pub slot_symbol: String,
    #[serde(default = "default_slots")]
    pub slots: usize,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerSection,
}

fn default_focus_duration() -> u32 {
    25
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}
fn default_work_title() -> String {
    TimerConfiguration::default().work_title
}
fn default_break_title() -> String {
    TimerConfiguration::default().break_title
}
fn default_complete_symbol() -> String {
    TimerConfiguration::default().complete_symbol
}
fn default_incomplete_symbol() -> String {
    TimerConfiguration::default().incomplete_symbol
}
fn default_cursor_symbol() -> String {
    TimerConfiguration::default().cursor_symbol
}
fn default_slot_symbol() -> String {
    TimerConfiguration::default().slot_symbol
}
fn default_slots() -> usize {
    TimerConfiguration::default().slots
}

impl Default for TimerSection {
    fn default() -> Self {
        Self {
            focus_duration: default_focus_duration(),
            short_break: default_short_break(),
            long_break: default_long_break(),
            work_title: default_work_title(),
            break_title: default_break_title(),
            complete_symbol: default_complete_symbol(),
            incomplete_symbol: default_incomplete_symbol(),
            cursor_symbol: default_cursor_symbol(),
            slot_symbol: default_slot_symbol(),
            slots: default_slots(),
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
        key.split('.').try_fold(root, |current, part| current.get(part))
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::InvalidValue {
            key: key.to_string(),
            message: "unknown config key".into(),
        };
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let parent = match parent_path {
            Some(path) => path
                .split('.')
                .try_fold(&mut *root, |current, part| current.get_mut(part))
                .ok_or_else(unknown)?,
            None => root,
        };
        let obj = parent.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Number(_) => value
                .parse::<u64>()
                .map(|n| serde_json::Value::Number(n.into()))
                .map_err(|e| invalid(format!("cannot parse '{value}' as number: {e}")))?,
            serde_json::Value::Bool(_) => value
                .parse::<bool>()
                .map(serde_json::Value::Bool)
                .map_err(|e| invalid(e.to_string()))?,
            serde_json::Value::String(_) => serde_json::Value::String(value.to_string()),
            _ => return Err(invalid("only leaf values can be set".into())),
        };
        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults if no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                CoreError::from(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to the data directory.
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

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("using default config: {e}");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key, e.g. `timer.long_break`.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match Self::get_json_value_by_path(&json, key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not write to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse as
    /// the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Ok(())
    }

    /// Timer defaults for a fresh work session, with durations in seconds.
    pub fn timer_configuration(&self) -> TimerConfiguration {
        let t = &self.timer;
        TimerConfiguration {
            main_time: i64::from(t.focus_duration) * 60,
            short_break_time: i64::from(t.short_break) * 60,
            long_break_time: i64::from(t.long_break) * 60,
            work_title: t.work_title.clone(),
            break_title: t.break_title.clone(),
            complete_symbol: t.complete_symbol.clone(),
            incomplete_symbol: t.incomplete_symbol.clone(),
            cursor_symbol: t.cursor_symbol.clone(),
            slot_symbol: t.slot_symbol.clone(),
            slots: t.slots,
        }
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
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[timer]\nlong_break = 20\n").unwrap();
        assert_eq!(parsed.timer.long_break, 20);
        assert_eq!(parsed.timer.focus_duration, 25);
        assert_eq!(parsed.timer.slots, 8);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.focus_duration").as_deref(), Some("25"));
        assert_eq!(cfg.get("timer.work_title").as_deref(), Some("Work"));
        assert!(cfg.get("timer.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_number_and_string() {
        let mut cfg = Config::default();
        cfg.set("timer.short_break", "7").unwrap();
        cfg.set("timer.break_title", "Rest").unwrap();
        assert_eq!(cfg.timer.short_break, 7);
        assert_eq!(cfg.timer.break_title, "Rest");
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(cfg.set("timer.nonexistent_key", "1").is_err());
        assert!(cfg.set("nope.focus_duration", "1").is_err());
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("timer.focus_duration", "soon").is_err());
        assert_eq!(cfg.timer.focus_duration, 25);
    }

    #[test]
    fn set_rejects_section_key() {
        let mut cfg = Config::default();
        assert!(cfg.set("timer", "x").is_err());
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn load_from_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timer = [[[").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn timer_configuration_converts_minutes_to_seconds() {
        let mut cfg = Config::default();
        cfg.set("timer.long_break", "20").unwrap();
        let timer = cfg.timer_configuration();
        assert_eq!(timer.main_time, 25 * 60);
        assert_eq!(timer.short_break_time, 5 * 60);
        assert_eq!(timer.long_break_time, 20 * 60);
    }
}
