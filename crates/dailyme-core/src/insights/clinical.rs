//! Doctor-facing analysis: weekly trend, risk tier and recommendations.
//!
//! The weekly trend compares the mean completion rate of the first three
//! days with that of the last three days of the series (7 days by default). When the task pool carries no date at all, the
//! trend is approximated from the most recent history items and flagged as
//! such, so the two methods are never confused.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::date_key::DateKey;
use super::distribution::ActivitySummary;
use super::percent;
use crate::config::{InsightsConfig, RiskConfig, TrendConfig, MIN_TREND_WINDOW_DAYS};
use crate::model::Task;

/// Hint attached to every approximate trend.
pub const APPROXIMATE_TREND_HINT: &str = "Approx trend (no task date field).";

/// Direction of the weekly trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

impl TrendDirection {
    pub fn text(self) -> &'static str {
        match self {
            TrendDirection::Improving => "Improving",
            TrendDirection::Declining => "Declining",
            TrendDirection::Stable => "Stable",
        }
    }
}

/// How the trend series was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendMethod {
    /// One point per calendar day from task dates.
    Daily,
    /// One point per recent history task; no task date was available.
    Approximate,
}

/// One point of the trend series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Short weekday (`"Mon"`) for daily points, `"D1"`.. for approximate ones
    pub label: String,
    pub date: Option<NaiveDate>,
    pub total: u32,
    pub completed: u32,
    /// Rounded completion percentage, 0 for an empty day
    pub completion_rate: u32,
}

/// Weekly completion trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendResult {
    pub direction: TrendDirection,
    pub hint: String,
    pub method: TrendMethod,
    /// Oldest first
    pub daily_series: Vec<TrendPoint>,
}

impl TrendResult {
    pub fn text(&self) -> &'static str {
        self.direction.text()
    }

    /// Completion rates of the series, oldest first.
    pub fn rates(&self) -> Vec<u32> {
        self.daily_series.iter().map(|p| p.completion_rate).collect()
    }
}

/// Risk tier derived from active completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            RiskLevel::High => "Low adherence — consider intervention.",
            RiskLevel::Medium => "Moderate adherence — monitor closely.",
            RiskLevel::Low => "Good adherence — reinforce consistency.",
        }
    }

    /// Presentation tone for the risk badge.
    pub fn tone(self) -> &'static str {
        match self {
            RiskLevel::High => "high",
            RiskLevel::Medium => "mid",
            RiskLevel::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub hint: String,
}

/// Analyzer for the clinician dashboard.
#[derive(Debug, Clone)]
pub struct ClinicalTrendAnalyzer {
    pub risk: RiskConfig,
    pub trend: TrendConfig,
}

impl Default for ClinicalTrendAnalyzer {
    fn default() -> Self {
        Self::from_config(&InsightsConfig::default())
    }
}

impl ClinicalTrendAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &InsightsConfig) -> Self {
        Self {
            risk: config.risk.clone(),
            trend: config.trend.clone(),
        }
    }

    /// Completion trend over the days ending on `today`.
    ///
    /// `history` is in chronological order, oldest first.
    pub fn weekly_trend(&self, active: &[Task], history: &[Task], today: NaiveDate) -> TrendResult {
        match DateKey::resolve(active.iter().chain(history)) {
            date_key @ DateKey::Field(_) => self.daily_trend(date_key, active, history, today),
            DateKey::NoDateKey => {
                let completed = active.iter().filter(|t| t.completed).count() as u32;
                let active_rate = percent(completed, active.len() as u32);
                self.approximate_trend(history, active_rate)
            }
        }
    }

    /// Trend window in days, never shorter than [`MIN_TREND_WINDOW_DAYS`]
    /// even when the config was built by hand and not validated.
    fn window(&self) -> usize {
        self.trend.window_days.max(MIN_TREND_WINDOW_DAYS) as usize
    }

    fn daily_trend(
        &self,
        date_key: DateKey,
        active: &[Task],
        history: &[Task],
        today: NaiveDate,
    ) -> TrendResult {
        let window = self.window();
        let mut totals = vec![0u32; window];
        let mut done = vec![0u32; window];

        for task in active.iter().chain(history) {
            let Some(day) = date_key.day_of(task) else {
                continue;
            };
            let diff = (today - day).num_days();
            if diff < 0 || diff >= window as i64 {
                continue;
            }
            let idx = window - 1 - diff as usize;
            totals[idx] += 1;
            if task.completed {
                done[idx] += 1;
            }
        }

        let daily_series: Vec<TrendPoint> = (0..window)
            .map(|idx| {
                let date = today - Duration::days((window - 1 - idx) as i64);
                TrendPoint {
                    label: date.format("%a").to_string(),
                    date: Some(date),
                    total: totals[idx],
                    completed: done[idx],
                    completion_rate: percent(done[idx], totals[idx]),
                }
            })
            .collect();

        let rates: Vec<u32> = daily_series.iter().map(|p| p.completion_rate).collect();
        let first_avg = mean(&rates[..3]);
        let last_avg = mean(&rates[window - 3..]);
        let diff = last_avg - first_avg;

        let (direction, hint) = if diff > self.trend.change_threshold {
            (TrendDirection::Improving, "Completion is increasing.")
        } else if diff < -self.trend.change_threshold {
            (TrendDirection::Declining, "Completion is decreasing.")
        } else {
            (TrendDirection::Stable, "No strong change detected.")
        };

        TrendResult {
            direction,
            hint: hint.to_string(),
            method: TrendMethod::Daily,
            daily_series,
        }
    }

    fn approximate_trend(&self, history: &[Task], active_rate: u32) -> TrendResult {
        let window = self.window();
        let recent = &history[history.len().saturating_sub(window)..];

        let daily_series: Vec<TrendPoint> = (0..window)
            .map(|idx| {
                let (total, completed) = match recent.get(idx) {
                    Some(task) => (1, u32::from(task.completed)),
                    None => (0, 0),
                };
                TrendPoint {
                    label: format!("D{}", idx + 1),
                    date: None,
                    total,
                    completed,
                    completion_rate: percent(completed, total),
                }
            })
            .collect();

        let direction = if active_rate >= self.risk.medium_below {
            TrendDirection::Improving
        } else if active_rate < self.risk.high_below {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        };

        TrendResult {
            direction,
            hint: APPROXIMATE_TREND_HINT.to_string(),
            method: TrendMethod::Approximate,
            daily_series,
        }
    }

    /// Risk tier for an active completion rate in percent.
    pub fn risk(&self, completion_rate: u32) -> RiskAssessment {
        let level = if completion_rate < self.risk.high_below {
            RiskLevel::High
        } else if completion_rate < self.risk.medium_below {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        RiskAssessment {
            level,
            hint: level.hint().to_string(),
        }
    }

    /// Rule-based recommendations; every applicable rule contributes.
    pub fn recommendations(&self, summary: &ActivitySummary) -> Vec<String> {
        let mut recs = Vec::new();
        let rate = summary.completion_rate;

        if rate < self.risk.high_below {
            recs.push(format!(
                "Completion rate is below {}%: consider simplifying tasks and adding reminders.",
                self.risk.high_below
            ));
            recs.push(
                "Recommend a short check-in to identify barriers (fatigue, mood, routine, side effects)."
                    .to_string(),
            );
        } else if rate < self.risk.medium_below {
            recs.push(
                "Completion is moderate: encourage routine-building and adjust task times if needed."
                    .to_string(),
            );
        } else {
            recs.push("Completion is strong: reinforce habits and keep tasks stable.".to_string());
        }

        if summary.missed_count as usize >= self.trend.missed_warning_min {
            recs.push(
                "Multiple missed tasks in history: review feasibility and timing with the patient."
                    .to_string(),
            );
        }

        if let Some(common) = summary.most_common_type {
            recs.push(format!(
                "Most frequent task type is {common}: focus coaching on this category."
            ));
        }

        recs.push(
            "Suggested plan: start with 1–2 “easy win” tasks daily, then progressively add tasks."
                .to_string(),
        );

        recs
    }
}

fn mean(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
}
