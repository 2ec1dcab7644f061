//! Mood vs. task completion.
//!
//! Joins tasks to the patient's mood check-in for the same calendar day,
//! over a trailing window (14 days by default), and reports the completion
//! rate of tasks on days of each mood.

use std::collections::{BTreeSet, HashMap};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::date_key::DateKey;
use super::percent;
use crate::config::InsightsConfig;
use crate::model::{Mood, MoodEntry, Task};

/// Completion on days of one mood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodCorrelationRow {
    pub mood: Mood,
    /// Rounded completion percentage (0-100)
    pub completion_rate: u32,
    /// Distinct calendar days contributing to this row
    pub sample_days: u32,
    /// Tasks contributing to this row
    pub task_count: u32,
}

/// Why the correlation has (or lacks) rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStatus {
    /// No task carries a date, so tasks cannot be joined to days.
    NoDateKey,
    /// Fewer mood check-ins than required.
    NotEnoughCheckins,
    /// Inputs suffice but no dated task falls on a check-in day in the window.
    NoOverlap,
    Computed,
}

/// Mood correlation table with its hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodCorrelation {
    /// Rows sorted by completion rate, highest first
    pub rows: Vec<MoodCorrelationRow>,
    pub status: CorrelationStatus,
    pub hint: String,
}

impl MoodCorrelation {
    fn empty(status: CorrelationStatus, hint: String) -> Self {
        Self {
            rows: Vec::new(),
            status,
            hint,
        }
    }

    pub fn best(&self) -> Option<&MoodCorrelationRow> {
        self.rows.first()
    }

    pub fn worst(&self) -> Option<&MoodCorrelationRow> {
        self.rows.last()
    }
}

/// Analyzer joining tasks to mood check-ins.
#[derive(Debug, Clone)]
pub struct MoodCorrelationAnalyzer {
    /// Trailing window length in days, today included
    pub window_days: u32,
    /// Check-ins required before correlating
    pub min_entries: usize,
}

impl Default for MoodCorrelationAnalyzer {
    fn default() -> Self {
        Self::from_config(&InsightsConfig::default())
    }
}

impl MoodCorrelationAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &InsightsConfig) -> Self {
        Self {
            window_days: config.mood.window_days,
            min_entries: config.mood.min_entries,
        }
    }

    /// First day of the window ending on `today`.
    pub fn window_start(&self, today: NaiveDate) -> NaiveDate {
        today - Duration::days(i64::from(self.window_days.saturating_sub(1)))
    }

    /// Correlate the pooled `active` and `history` tasks with `moods`.
    pub fn analyze(
        &self,
        active: &[Task],
        history: &[Task],
        moods: &[MoodEntry],
        today: NaiveDate,
    ) -> MoodCorrelation {
        let date_key = DateKey::resolve(active.iter().chain(history));

        if !date_key.is_resolved() {
            return MoodCorrelation::empty(
                CorrelationStatus::NoDateKey,
                "No task date field detected (add createdAt/taskDate/scheduledDate).".to_string(),
            );
        }
        if moods.len() < self.min_entries {
            return MoodCorrelation::empty(
                CorrelationStatus::NotEnoughCheckins,
                format!(
                    "Add at least {} mood check-ins to unlock correlations.",
                    self.min_entries
                ),
            );
        }

        let mood_by_day = mood_by_day(moods);
        let start = self.window_start(today);
        let mut by_mood: IndexMap<Mood, MoodBuilder> = IndexMap::new();

        for task in active.iter().chain(history) {
            let Some(day) = date_key.day_of(task) else {
                continue;
            };
            if day < start || day > today {
                continue;
            }
            let Some(&mood) = mood_by_day.get(&day) else {
                continue;
            };
            by_mood
                .entry(mood)
                .or_insert_with(MoodBuilder::new)
                .record(day, task.completed);
        }

        if by_mood.is_empty() {
            return MoodCorrelation::empty(
                CorrelationStatus::NoOverlap,
                format!(
                    "No overlapping days between tasks and mood check-ins (last {} days).",
                    self.window_days
                ),
            );
        }

        let mut rows: Vec<MoodCorrelationRow> = by_mood
            .into_iter()
            .map(|(mood, builder)| builder.build(mood))
            .collect();
        rows.sort_by(|a, b| b.completion_rate.cmp(&a.completion_rate));

        let hint = match (rows.first(), rows.last()) {
            (Some(best), Some(worst)) if rows.len() >= 2 => format!(
                "You perform best on {} days ({}%). Hardest is {} ({}%).",
                best.mood, best.completion_rate, worst.mood, worst.completion_rate
            ),
            _ => format!(
                "Correlation computed from your last {} days.",
                self.window_days
            ),
        };

        MoodCorrelation {
            rows,
            status: CorrelationStatus::Computed,
            hint,
        }
    }
}

/// One mood per calendar day; the most recently written entry wins, and
/// entries without a timestamp fall back to input order.
pub fn mood_by_day(moods: &[MoodEntry]) -> HashMap<NaiveDate, Mood> {
    let mut latest: HashMap<NaiveDate, (Mood, Option<NaiveDateTime>, usize)> = HashMap::new();

    for (index, entry) in moods.iter().enumerate() {
        let (Some(day), Some(mood)) = (entry.day(), entry.parsed_mood()) else {
            tracing::debug!(
                date = entry.raw_date().unwrap_or_default(),
                emotion = entry.raw_emotion().unwrap_or_default(),
                "skipping mood entry without usable day or emotion"
            );
            continue;
        };
        let recorded_at = entry.recorded_at();

        match latest.get(&day) {
            Some(&(_, prev_at, prev_index)) if (prev_at, prev_index) > (recorded_at, index) => {}
            _ => {
                latest.insert(day, (mood, recorded_at, index));
            }
        }
    }

    latest
        .into_iter()
        .map(|(day, (mood, _, _))| (day, mood))
        .collect()
}

/// Helper struct for building mood rows
struct MoodBuilder {
    total: u32,
    done: u32,
    days: BTreeSet<NaiveDate>,
}

impl MoodBuilder {
    fn new() -> Self {
        Self {
            total: 0,
            done: 0,
            days: BTreeSet::new(),
        }
    }

    fn record(&mut self, day: NaiveDate, completed: bool) {
        self.total += 1;
        if completed {
            self.done += 1;
        }
        self.days.insert(day);
    }

    fn build(self, mood: Mood) -> MoodCorrelationRow {
        MoodCorrelationRow {
            mood,
            completion_rate: percent(self.done, self.total),
            sample_days: self.days.len() as u32,
            task_count: self.total,
        }
    }
}
