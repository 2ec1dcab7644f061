//! Best and worst time of day to get things done.
//!
//! Active tasks are grouped into 2-hour windows by their scheduled time.
//! Each window gets a completion rate; the highest and lowest are reported
//! as the patient's best and worst windows. History tasks are excluded:
//! they are archived or missed, not something the patient still schedules.
//!
//! The same grouping yields the time consistency metric used by the
//! adherence score: the share of tasks falling into the busiest window.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::percent;
use crate::config::InsightsConfig;
use crate::model::time::{bucket_label, hour_of_normalized, normalize_time_or, BUCKET_HOURS};
use crate::model::Task;

/// Completion statistics of one 2-hour window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucketStat {
    /// Window label, e.g. `"08:00-10:00"`
    pub bucket: String,
    /// First hour of the window (0-22, even)
    pub start_hour: u32,
    /// Tasks scheduled in this window
    pub total_count: u32,
    /// Completed tasks scheduled in this window
    pub completed_count: u32,
    /// Rounded completion percentage (0-100)
    pub completion_rate: u32,
}

/// Best/worst window outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WindowRanking {
    Ranked {
        best: TimeBucketStat,
        worst: TimeBucketStat,
    },
    /// No active task had a usable scheduled time.
    NoTimeData,
}

/// Full time-of-day report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeWindowReport {
    /// Every non-empty window, in first-encountered order (chart series)
    pub buckets: Vec<TimeBucketStat>,
    pub ranking: WindowRanking,
    pub hint: String,
    /// Share of qualifying tasks in the busiest window (0.0 to 1.0)
    pub consistency: f64,
    /// Active tasks with a usable scheduled time
    pub qualifying_tasks: u32,
}

impl TimeWindowReport {
    pub fn best(&self) -> Option<&TimeBucketStat> {
        match &self.ranking {
            WindowRanking::Ranked { best, .. } => Some(best),
            WindowRanking::NoTimeData => None,
        }
    }

    pub fn worst(&self) -> Option<&TimeBucketStat> {
        match &self.ranking {
            WindowRanking::Ranked { worst, .. } => Some(worst),
            WindowRanking::NoTimeData => None,
        }
    }
}

/// Analyzer for time-of-day completion patterns.
#[derive(Debug, Clone)]
pub struct TimeWindowAnalyzer {
    /// Assumed time for tasks without a usable `scheduledTime`
    pub default_time: String,
    /// Best-window rate from which the hint recommends using that window
    pub strong_window_min: u32,
    /// Consistency reported when no task qualifies
    pub neutral_consistency: f64,
}

impl Default for TimeWindowAnalyzer {
    fn default() -> Self {
        Self::from_config(&InsightsConfig::default())
    }
}

impl TimeWindowAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &InsightsConfig) -> Self {
        Self {
            default_time: config.time.default_time.clone(),
            strong_window_min: config.time.strong_window_min,
            neutral_consistency: config.scoring.neutral_consistency,
        }
    }

    /// Hour of day a task is scheduled at, `None` when unusable.
    pub fn hour_of(&self, task: &Task) -> Option<u32> {
        let normalized = normalize_time_or(task.scheduled_time.as_deref(), &self.default_time);
        let hour = hour_of_normalized(&normalized);
        if hour.is_none() {
            tracing::debug!(
                time = task.scheduled_time.as_deref().unwrap_or_default(),
                "skipping task with unusable scheduled time"
            );
        }
        hour
    }

    /// Group `active` tasks into windows and rank them.
    pub fn analyze(&self, active: &[Task]) -> TimeWindowReport {
        let mut windows: IndexMap<String, BucketBuilder> = IndexMap::new();
        let mut qualifying: u32 = 0;

        for task in active {
            let Some(hour) = self.hour_of(task) else {
                continue;
            };
            qualifying += 1;
            windows
                .entry(bucket_label(hour))
                .or_insert_with(|| BucketBuilder::new(hour - hour % BUCKET_HOURS))
                .record(task.completed);
        }

        let buckets: Vec<TimeBucketStat> = windows
            .into_iter()
            .map(|(label, builder)| builder.build(label))
            .collect();

        let consistency = match buckets.iter().map(|b| b.total_count).max() {
            Some(busiest) if qualifying > 0 => busiest as f64 / qualifying as f64,
            _ => self.neutral_consistency,
        };

        let ranking = rank(&buckets);
        let hint = match &ranking {
            WindowRanking::NoTimeData => "No time data yet.".to_string(),
            WindowRanking::Ranked { best, .. } if best.completion_rate >= self.strong_window_min => {
                "Try scheduling important tasks in your best window.".to_string()
            }
            WindowRanking::Ranked { .. } => {
                "Completion is low across windows — start with 1 easy task/day.".to_string()
            }
        };

        TimeWindowReport {
            buckets,
            ranking,
            hint,
            consistency,
            qualifying_tasks: qualifying,
        }
    }

    /// Time consistency of `active` alone (0.0 to 1.0).
    pub fn consistency(&self, active: &[Task]) -> f64 {
        self.analyze(active).consistency
    }
}

/// Highest and lowest rate; ties go to the first-encountered window.
fn rank(buckets: &[TimeBucketStat]) -> WindowRanking {
    let Some(first) = buckets.first() else {
        return WindowRanking::NoTimeData;
    };

    let mut best = first;
    let mut worst = first;
    for bucket in &buckets[1..] {
        if bucket.completion_rate > best.completion_rate {
            best = bucket;
        }
        if bucket.completion_rate < worst.completion_rate {
            worst = bucket;
        }
    }

    WindowRanking::Ranked {
        best: best.clone(),
        worst: worst.clone(),
    }
}

/// Helper struct for building window stats
struct BucketBuilder {
    start_hour: u32,
    total: u32,
    done: u32,
}

impl BucketBuilder {
    fn new(start_hour: u32) -> Self {
        Self {
            start_hour,
            total: 0,
            done: 0,
        }
    }

    fn record(&mut self, completed: bool) {
        self.total += 1;
        if completed {
            self.done += 1;
        }
    }

    fn build(self, bucket: String) -> TimeBucketStat {
        TimeBucketStat {
            bucket,
            start_hour: self.start_hour,
            total_count: self.total,
            completed_count: self.done,
            completion_rate: percent(self.done, self.total),
        }
    }
}
