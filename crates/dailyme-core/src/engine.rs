//! Patient insight engine.
//!
//! [`PatientDataSource`] is the inbound seam: whatever persists tasks and mood
//! check-ins implements it. [`PatientSnapshot`] freezes one patient's records,
//! and [`InsightEngine::evaluate`] turns a snapshot into [`PatientInsights`],
//! the value object a presentation layer reads from.
//!
//! The engine keeps no state between calls. Callers decide when to refetch
//! and whether to cache the returned insights.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::InsightsConfig;
use crate::error::Result;
use crate::insights::{
    type_distribution, ActivitySummary, AdherenceScore, AdherenceScorer, ClinicalTrendAnalyzer,
    MoodCorrelation, MoodCorrelationAnalyzer, MoodCorrelationRow, RiskAssessment,
    TimeBucketStat, TimeWindowAnalyzer, TimeWindowReport, TrendResult, TypeCount,
};
use crate::model::{MoodEntry, Task};

/// Supplies one patient's records.
///
/// Implementations must return history tasks oldest first.
pub trait PatientDataSource: Send + Sync {
    /// Unique identifier (e.g. "rest", "fixture").
    fn name(&self) -> &str;

    fn fetch_active_tasks(&self, patient_id: &str) -> Result<Vec<Task>>;

    fn fetch_history_tasks(&self, patient_id: &str) -> Result<Vec<Task>>;

    fn fetch_mood_entries(&self, patient_id: &str) -> Result<Vec<MoodEntry>>;
}

/// Immutable copy of one patient's records at fetch time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSnapshot {
    pub patient_id: String,
    #[serde(default)]
    pub active: Vec<Task>,
    /// Oldest first
    #[serde(default)]
    pub history: Vec<Task>,
    #[serde(default)]
    pub moods: Vec<MoodEntry>,
}

impl PatientSnapshot {
    pub fn new(
        patient_id: impl Into<String>,
        active: Vec<Task>,
        history: Vec<Task>,
        moods: Vec<MoodEntry>,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            active,
            history,
            moods,
        }
    }

    /// Pull all three collections for `patient_id` from `source`.
    pub fn fetch(source: &dyn PatientDataSource, patient_id: &str) -> Result<Self> {
        let active = source
            .fetch_active_tasks(patient_id)
            .inspect_err(|e| warn!(source = source.name(), patient_id, "active tasks unavailable: {e}"))?;
        let history = source
            .fetch_history_tasks(patient_id)
            .inspect_err(|e| warn!(source = source.name(), patient_id, "history tasks unavailable: {e}"))?;
        let moods = source
            .fetch_mood_entries(patient_id)
            .inspect_err(|e| warn!(source = source.name(), patient_id, "mood entries unavailable: {e}"))?;

        Ok(Self::new(patient_id, active, history, moods))
    }
}

/// Runs every analyzer over a snapshot.
#[derive(Debug, Clone, Default)]
pub struct InsightEngine {
    config: InsightsConfig,
}

impl InsightEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: InsightsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InsightsConfig {
        &self.config
    }

    /// Derive everything for `snapshot` as of `today`.
    pub fn evaluate(&self, snapshot: &PatientSnapshot, today: NaiveDate) -> PatientInsights {
        let config = &self.config;
        let active = &snapshot.active;
        let history = &snapshot.history;

        let time_windows = TimeWindowAnalyzer::from_config(config).analyze(active);
        let adherence = AdherenceScorer::from_config(config).score_with_consistency(
            active,
            history,
            time_windows.consistency,
        );
        let mood_correlation =
            MoodCorrelationAnalyzer::from_config(config).analyze(active, history, &snapshot.moods, today);

        let clinical = ClinicalTrendAnalyzer::from_config(config);
        let activity_summary = ActivitySummary::from_tasks(active, history);
        let weekly_trend = clinical.weekly_trend(active, history, today);
        let risk_assessment = clinical.risk(activity_summary.completion_rate);
        let recommendations = clinical.recommendations(&activity_summary);
        let type_distribution = type_distribution(active.iter().chain(history));

        debug!(
            patient_id = %snapshot.patient_id,
            %today,
            active = active.len(),
            history = history.len(),
            moods = snapshot.moods.len(),
            score = adherence.value,
            risk = risk_assessment.level.label(),
            trend = weekly_trend.text(),
            "evaluated patient insights"
        );

        PatientInsights {
            patient_id: snapshot.patient_id.clone(),
            today,
            adherence,
            time_windows,
            mood_correlation,
            weekly_trend,
            risk_assessment,
            recommendations,
            type_distribution,
            activity_summary,
        }
    }

    /// Fetch from `source` and evaluate in one step.
    pub fn evaluate_patient(
        &self,
        source: &dyn PatientDataSource,
        patient_id: &str,
        today: NaiveDate,
    ) -> Result<PatientInsights> {
        let snapshot = PatientSnapshot::fetch(source, patient_id)?;
        Ok(self.evaluate(&snapshot, today))
    }
}

/// Everything derived for one patient on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientInsights {
    pub patient_id: String,
    pub today: NaiveDate,
    pub adherence: AdherenceScore,
    pub time_windows: TimeWindowReport,
    pub mood_correlation: MoodCorrelation,
    pub weekly_trend: TrendResult,
    pub risk_assessment: RiskAssessment,
    pub recommendations: Vec<String>,
    pub type_distribution: Vec<TypeCount>,
    pub activity_summary: ActivitySummary,
}

impl PatientInsights {
    pub fn adherence_score(&self) -> &AdherenceScore {
        &self.adherence
    }

    /// `None` when no active task has a usable time.
    pub fn best_time_window(&self) -> Option<&TimeBucketStat> {
        self.time_windows.best()
    }

    pub fn worst_time_window(&self) -> Option<&TimeBucketStat> {
        self.time_windows.worst()
    }

    pub fn time_windows(&self) -> &TimeWindowReport {
        &self.time_windows
    }

    pub fn mood_correlation(&self) -> &[MoodCorrelationRow] {
        &self.mood_correlation.rows
    }

    pub fn mood_hint(&self) -> &str {
        &self.mood_correlation.hint
    }

    pub fn weekly_trend(&self) -> &TrendResult {
        &self.weekly_trend
    }

    pub fn risk_assessment(&self) -> &RiskAssessment {
        &self.risk_assessment
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    pub fn type_distribution(&self) -> &[TypeCount] {
        &self.type_distribution
    }

    pub fn activity_summary(&self) -> &ActivitySummary {
        &self.activity_summary
    }
}
