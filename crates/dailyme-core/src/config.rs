//! TOML-based insight configuration.
//!
//! Holds every weight and threshold the analyzers use:
//! - Adherence score weights, streak penalty and label cut-offs
//! - Risk bands (shared by risk tier, recommendations and approximate trend)
//! - Weekly trend window and change threshold
//! - Mood correlation window
//! - Default time of day for tasks without a usable schedule
//!
//! Every field has a default, so an empty file (or no file) yields the
//! stock clinical thresholds.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result, ValidationError};
use crate::model::time::{hour_of_normalized, DEFAULT_TIME};

/// Shortest trend window: the first and last three days must not overlap.
pub const MIN_TREND_WINDOW_DAYS: u32 = 7;

/// Adherence score configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_completion_weight")]
    pub completion_weight: f64,
    #[serde(default = "default_consistency_weight")]
    pub consistency_weight: f64,
    #[serde(default = "default_critical_weight")]
    pub critical_weight: f64,
    /// Points removed per consecutive missed history task.
    #[serde(default = "default_streak_step")]
    pub streak_step: u32,
    /// Upper bound of the streak penalty.
    #[serde(default = "default_streak_cap")]
    pub streak_cap: u32,
    /// How many of the most recent history tasks are inspected.
    #[serde(default = "default_streak_window")]
    pub streak_window: usize,
    /// Time consistency assumed when no task has a usable time.
    #[serde(default = "default_neutral_consistency")]
    pub neutral_consistency: f64,
    #[serde(default = "default_excellent_min")]
    pub excellent_min: u32,
    #[serde(default = "default_good_min")]
    pub good_min: u32,
    #[serde(default = "default_streak_warning_min")]
    pub streak_warning_min: u32,
    #[serde(default = "default_critical_warning_above")]
    pub critical_warning_above: f64,
    #[serde(default = "default_scatter_warning_below")]
    pub scatter_warning_below: f64,
}

/// Risk band configuration, in completion percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Completion below this is HIGH risk.
    #[serde(default = "default_high_below")]
    pub high_below: u32,
    /// Completion below this (and not HIGH) is MEDIUM risk.
    #[serde(default = "default_medium_below")]
    pub medium_below: u32,
}

/// Weekly trend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendConfig {
    #[serde(default = "default_trend_window_days")]
    pub window_days: u32,
    /// Percentage points between the first-three-day and last-three-day means that count as change.
    #[serde(default = "default_change_threshold")]
    pub change_threshold: f64,
    /// Missed history tasks needed to trigger the feasibility recommendation.
    #[serde(default = "default_missed_warning_min")]
    pub missed_warning_min: usize,
}

/// Mood correlation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodConfig {
    #[serde(default = "default_mood_window_days")]
    pub window_days: u32,
    #[serde(default = "default_min_entries")]
    pub min_entries: usize,
}

/// Time-of-day configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeConfig {
    /// Assumed time for tasks without a recognizable `scheduledTime`.
    #[serde(default = "default_time")]
    pub default_time: String,
    /// Best-window rate at which the hint suggests scheduling important tasks there.
    #[serde(default = "default_strong_window_min")]
    pub strong_window_min: u32,
}

/// Insight engine configuration.
///
/// Serialized to/from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightsConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub trend: TrendConfig,
    #[serde(default)]
    pub mood: MoodConfig,
    #[serde(default)]
    pub time: TimeConfig,
}

// Default functions
fn default_completion_weight() -> f64 {
    0.55
}
fn default_consistency_weight() -> f64 {
    0.20
}
fn default_critical_weight() -> f64 {
    0.25
}
fn default_streak_step() -> u32 {
    5
}
fn default_streak_cap() -> u32 {
    15
}
fn default_streak_window() -> usize {
    7
}
fn default_neutral_consistency() -> f64 {
    0.5
}
fn default_excellent_min() -> u32 {
    80
}
fn default_good_min() -> u32 {
    55
}
fn default_streak_warning_min() -> u32 {
    2
}
fn default_critical_warning_above() -> f64 {
    0.25
}
fn default_scatter_warning_below() -> f64 {
    0.45
}
fn default_high_below() -> u32 {
    40
}
fn default_medium_below() -> u32 {
    70
}
fn default_trend_window_days() -> u32 {
    7
}
fn default_change_threshold() -> f64 {
    8.0
}
fn default_missed_warning_min() -> usize {
    3
}
fn default_mood_window_days() -> u32 {
    14
}
fn default_min_entries() -> usize {
    2
}
fn default_time() -> String {
    DEFAULT_TIME.into()
}
fn default_strong_window_min() -> u32 {
    70
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            completion_weight: default_completion_weight(),
            consistency_weight: default_consistency_weight(),
            critical_weight: default_critical_weight(),
            streak_step: default_streak_step(),
            streak_cap: default_streak_cap(),
            streak_window: default_streak_window(),
            neutral_consistency: default_neutral_consistency(),
            excellent_min: default_excellent_min(),
            good_min: default_good_min(),
            streak_warning_min: default_streak_warning_min(),
            critical_warning_above: default_critical_warning_above(),
            scatter_warning_below: default_scatter_warning_below(),
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            high_below: 40,
            medium_below: 70,
        }
    }
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            window_days: 7,
            change_threshold: 8.0,
            missed_warning_min: 3,
        }
    }
}

impl Default for MoodConfig {
    fn default() -> Self {
        Self {
            window_days: 14,
            min_entries: 2,
        }
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            default_time: default_time(),
            strong_window_min: 70,
        }
    }
}

impl InsightsConfig {
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
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Parse a TOML document; missing sections and keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML, has mistyped
    /// values, or fails [`InsightsConfig::validate`].
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let cfg: InsightsConfig = toml::from_str(content).map_err(ConfigError::from)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from `path`, or return the defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no insights config, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to `path` as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Check that weights, bands and windows are coherent.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let s = &self.scoring;
        for (field, value) in [
            ("scoring.completion_weight", s.completion_weight),
            ("scoring.consistency_weight", s.consistency_weight),
            ("scoring.critical_weight", s.critical_weight),
            ("scoring.neutral_consistency", s.neutral_consistency),
            ("scoring.critical_warning_above", s.critical_warning_above),
            ("scoring.scatter_warning_below", s.scatter_warning_below),
        ] {
            check_range(field, value, 0.0, 1.0)?;
        }
        check_range("scoring.excellent_min", s.excellent_min as f64, 0.0, 100.0)?;
        check_range("scoring.good_min", s.good_min as f64, 0.0, s.excellent_min as f64)?;
        check_range("scoring.streak_step", s.streak_step as f64, 0.0, 100.0)?;
        check_range("scoring.streak_cap", s.streak_cap as f64, 0.0, 100.0)?;
        if s.streak_window == 0 {
            return Err(invalid("scoring.streak_window", "must be at least 1"));
        }

        check_range("risk.medium_below", self.risk.medium_below as f64, 0.0, 100.0)?;
        check_range(
            "risk.high_below",
            self.risk.high_below as f64,
            0.0,
            self.risk.medium_below as f64,
        )?;

        if self.trend.window_days < MIN_TREND_WINDOW_DAYS {
            return Err(invalid(
                "trend.window_days",
                "must cover at least 7 days so the compared first and last three days do not overlap",
            ));
        }
        if self.trend.change_threshold < 0.0 {
            return Err(invalid("trend.change_threshold", "must not be negative"));
        }

        if self.mood.window_days == 0 {
            return Err(invalid("mood.window_days", "must be at least 1"));
        }

        check_range("time.strong_window_min", self.time.strong_window_min as f64, 0.0, 100.0)?;
        if hour_of_normalized(&self.time.default_time).is_none() {
            return Err(invalid("time.default_time", "must be a 24-hour HH:mm time"));
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

    /// Set a config value by dot-separated key, in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result fails validation. On error `self` is left unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: InsightsConfig = serde_json::from_value(json).map_err(|e| {
            ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if value.is_nan() || value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn invalid(field: &str, message: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
}
