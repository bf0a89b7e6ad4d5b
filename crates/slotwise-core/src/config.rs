//! TOML-based engine configuration.
//!
//! Covers slot granularity, Pomodoro durations, scoring weights, and the
//! working-hours policy. Every field has a serde default so a partial
//! file (or an empty one) loads cleanly.

use std::path::Path;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::availability::WorkingHoursPolicy;
use crate::error::ConfigError;
use crate::priority::PriorityWeights;
use crate::scheduler::Rescheduler;
use crate::timer::PomodoroConfig;

/// One working-hours entry covering a set of weekdays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// 0 = Monday .. 6 = Sunday.
    pub days: Vec<u8>,
    /// HH:mm wall-clock time.
    pub start: String,
    /// HH:mm wall-clock time.
    pub end: String,
}

/// Engine configuration, serialized to/from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Slot size in minutes.
    #[serde(default = "default_granularity")]
    pub granularity_min: i64,
    #[serde(default)]
    pub timer: PomodoroConfig,
    #[serde(default)]
    pub weights: PriorityWeights,
    #[serde(default = "default_working_hours")]
    pub working_hours: Vec<WindowConfig>,
}

fn default_granularity() -> i64 {
    30
}

fn default_working_hours() -> Vec<WindowConfig> {
    vec![WindowConfig {
        days: vec![0, 1, 2, 3, 4],
        start: "09:00".to_string(),
        end: "17:00".to_string(),
    }]
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            granularity_min: default_granularity(),
            timer: PomodoroConfig::default(),
            weights: PriorityWeights::default(),
            working_hours: default_working_hours(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = self.to_toml_string()?;
        std::fs::write(path, raw).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.granularity_min <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "granularity_min".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.timer.work_min == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timer.work_min".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.timer.break_min == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timer.break_min".to_string(),
                message: "must be positive".to_string(),
            });
        }
        // Inverted windows surface here, not on the first scheduling pass.
        self.policy()?
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                key: "working_hours".to_string(),
                message: e.to_string(),
            })
    }

    /// Build the working-hours policy from the configured windows.
    pub fn policy(&self) -> Result<WorkingHoursPolicy, ConfigError> {
        let mut policy = WorkingHoursPolicy::new();
        for window in &self.working_hours {
            let start = parse_hm(&window.start)?;
            let end = parse_hm(&window.end)?;
            for day in &window.days {
                let weekday = match day {
                    0 => chrono::Weekday::Mon,
                    1 => chrono::Weekday::Tue,
                    2 => chrono::Weekday::Wed,
                    3 => chrono::Weekday::Thu,
                    4 => chrono::Weekday::Fri,
                    5 => chrono::Weekday::Sat,
                    6 => chrono::Weekday::Sun,
                    other => {
                        return Err(ConfigError::InvalidValue {
                            key: "working_hours.days".to_string(),
                            message: format!("{other} is not a weekday index (0-6)"),
                        })
                    }
                };
                policy = policy.with_day(weekday, start, end);
            }
        }
        Ok(policy)
    }

    /// Build a rescheduler wired from this configuration.
    pub fn rescheduler(&self) -> Result<Rescheduler, ConfigError> {
        self.validate()?;
        Ok(Rescheduler::new(self.policy()?, self.granularity_min).with_weights(self.weights))
    }
}

fn parse_hm(raw: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(raw, "%H:%M").map_err(|_| ConfigError::ParseFailed(format!(
        "'{raw}' is not a HH:mm time"
    )))
}
