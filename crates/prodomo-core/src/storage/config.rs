//! TOML-based application configuration.
//!
//! Holds the numeric durations the timer consumes, the long-break
//! cadence, notification/sound toggles, and a color-scheme map that is
//! passed through untouched to the display layer.
//!
//! Configuration is stored at `~/.config/prodomo/config.toml`. A running
//! session works from a snapshot; edits take effect for sessions started
//! afterwards.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::timer::Phase;

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/prodomo/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Work phase length in minutes.
    #[serde(default = "default_work_duration")]
    pub work_duration: u32,
    /// Short break length in minutes.
    #[serde(default = "default_short_break_duration")]
    pub short_break_duration: u32,
    /// Long break length in minutes.
    #[serde(default = "default_long_break_duration")]
    pub long_break_duration: u32,
    /// Every Nth break is promoted to a long break.
    #[serde(default = "default_sessions_before_long_break")]
    pub sessions_before_long_break: u32,
    #[serde(default = "default_true")]
    pub enable_notifications: bool,
    #[serde(default = "default_true")]
    pub enable_sound: bool,
    /// Display-layer color names keyed by UI element. Pass-through.
    #[serde(default = "default_color_scheme")]
    pub colors: BTreeMap<String, String>,
}

fn default_work_duration() -> u32 {
    25
}
fn default_short_break_duration() -> u32 {
    5
}
fn default_long_break_duration() -> u32 {
    15
}
fn default_sessions_before_long_break() -> u32 {
    4
}
fn default_true() -> bool {
    true
}
fn default_color_scheme() -> BTreeMap<String, String> {
    [
        ("work", "green"),
        ("short_break", "blue"),
        ("long_break", "cyan"),
        ("menu", "yellow"),
        ("error", "red"),
        ("success", "green"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_duration: default_work_duration(),
            short_break_duration: default_short_break_duration(),
            long_break_duration: default_long_break_duration(),
            sessions_before_long_break: default_sessions_before_long_break(),
            enable_notifications: true,
            enable_sound: true,
            colors: default_color_scheme(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or write out and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning the default on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Configured duration for a phase, in minutes.
    pub fn duration_min(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_duration,
            Phase::ShortBreak => self.short_break_duration,
            Phase::LongBreak => self.long_break_duration,
        }
    }

    /// Configured duration for a phase, in seconds.
    pub fn duration_secs(&self, phase: Phase) -> u64 {
        u64::from(self.duration_min(phase)) * 60
    }

    /// Get a config value as a display string by key name.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "work_duration" => Some(self.work_duration.to_string()),
            "short_break_duration" => Some(self.short_break_duration.to_string()),
            "long_break_duration" => Some(self.long_break_duration.to_string()),
            "sessions_before_long_break" => Some(self.sessions_before_long_break.to_string()),
            "enable_notifications" => Some(self.enable_notifications.to_string()),
            "enable_sound" => Some(self.enable_sound.to_string()),
            _ => key
                .strip_prefix("colors.")
                .and_then(|name| self.colors.get(name).cloned()),
        }
    }

    /// Set a config value by key name. Durations and the long-break
    /// cadence must parse as integers greater than zero; on rejection
    /// the prior value is retained.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown keys or unparseable values.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "work_duration" => self.work_duration = parse_duration(key, value)?,
            "short_break_duration" => self.short_break_duration = parse_duration(key, value)?,
            "long_break_duration" => self.long_break_duration = parse_duration(key, value)?,
            "sessions_before_long_break" => {
                self.sessions_before_long_break = parse_duration(key, value)?
            }
            "enable_notifications" => self.enable_notifications = parse_bool(key, value)?,
            "enable_sound" => self.enable_sound = parse_bool(key, value)?,
            _ => {
                if let Some(name) = key.strip_prefix("colors.") {
                    self.colors.insert(name.to_string(), value.to_string());
                } else {
                    return Err(ConfigError::UnknownKey(key.to_string()));
                }
            }
        }
        Ok(())
    }
}

fn parse_duration(key: &str, value: &str) -> Result<u32, ConfigError> {
    let parsed: u32 = value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("'{value}' is not a valid number"),
    })?;
    if parsed == 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "must be greater than 0".to_string(),
        });
    }
    Ok(parsed)
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("'{value}' is not a valid boolean"),
    })
}
