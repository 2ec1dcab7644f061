//! Patient adherence score (0-100) with explanations.
//!
//! The score blends three signals from the active task list:
//! - **Completion**: share of active tasks marked done
//! - **Time consistency**: how concentrated the schedule is (see
//!   [`TimeWindowAnalyzer`])
//! - **Critical tasks**: share of medication/appointment tasks left undone
//!
//! and then subtracts a capped penalty for a run of missed tasks at the
//! recent end of the history list. The reasons list is built from the same
//! inputs so the patient can see why the score is what it is.

use serde::{Deserialize, Serialize};

use super::time_window::TimeWindowAnalyzer;
use crate::config::{InsightsConfig, ScoringConfig};
use crate::model::Task;

/// Score label bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreLabel {
    Excellent,
    Good,
    NeedsSupport,
}

impl ScoreLabel {
    pub fn text(self) -> &'static str {
        match self {
            ScoreLabel::Excellent => "Excellent",
            ScoreLabel::Good => "Good",
            ScoreLabel::NeedsSupport => "Needs Support",
        }
    }

    /// Presentation tone for the score badge.
    pub fn tone(self) -> &'static str {
        match self {
            ScoreLabel::Excellent => "good",
            ScoreLabel::Good => "mid",
            ScoreLabel::NeedsSupport => "bad",
        }
    }
}

/// Raw inputs of the composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdherenceFactors {
    pub active_total: u32,
    pub active_done: u32,
    /// Completed share of active tasks (0.0 to 1.0)
    pub active_rate: f64,
    /// Consecutive missed tasks at the recent end of history
    pub missed_streak: u32,
    /// Missed share of critical active tasks (0.0 to 1.0)
    pub critical_penalty: f64,
    /// Share of tasks in the busiest time window (0.0 to 1.0)
    pub time_consistency: f64,
}

/// Composite adherence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdherenceScore {
    /// Score from 0 to 100
    pub value: u32,
    pub label: ScoreLabel,
    /// Human-readable explanation, never empty
    pub reasons: Vec<String>,
    pub factors: AdherenceFactors,
}

/// Scorer for patient adherence.
#[derive(Debug, Clone)]
pub struct AdherenceScorer {
    pub scoring: ScoringConfig,
    pub time_windows: TimeWindowAnalyzer,
}

impl Default for AdherenceScorer {
    fn default() -> Self {
        Self::from_config(&InsightsConfig::default())
    }
}

impl AdherenceScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &InsightsConfig) -> Self {
        Self {
            scoring: config.scoring.clone(),
            time_windows: TimeWindowAnalyzer::from_config(config),
        }
    }

    /// Score a patient from their active and history tasks.
    ///
    /// `history` is in chronological order, oldest first.
    pub fn score(&self, active: &[Task], history: &[Task]) -> AdherenceScore {
        let consistency = self.time_windows.consistency(active);
        self.score_with_consistency(active, history, consistency)
    }

    /// Score using a time consistency computed elsewhere, e.g. by a
    /// [`TimeWindowReport`](super::TimeWindowReport) already built for the same tasks.
    pub fn score_with_consistency(
        &self,
        active: &[Task],
        history: &[Task],
        time_consistency: f64,
    ) -> AdherenceScore {
        let active_total = active.len() as u32;
        let active_done = active.iter().filter(|t| t.completed).count() as u32;
        let active_rate = if active_total > 0 {
            active_done as f64 / active_total as f64
        } else {
            0.0
        };

        let factors = AdherenceFactors {
            active_total,
            active_done,
            active_rate,
            missed_streak: self.missed_streak(history),
            critical_penalty: critical_penalty(active),
            time_consistency,
        };

        let value = self.composite(&factors);
        let label = self.label_for(value);
        let reasons = self.reasons(&factors);

        AdherenceScore {
            value,
            label,
            reasons,
            factors,
        }
    }

    /// Consecutive missed tasks, scanning the last `streak_window` history
    /// entries from the newest backwards and stopping at the first completed one.
    pub fn missed_streak(&self, history: &[Task]) -> u32 {
        history
            .iter()
            .rev()
            .take(self.scoring.streak_window)
            .take_while(|t| !t.completed)
            .count() as u32
    }

    fn composite(&self, f: &AdherenceFactors) -> u32 {
        let s = &self.scoring;
        let raw = 100.0
            * (s.completion_weight * f.active_rate
                + s.consistency_weight * f.time_consistency
                + s.critical_weight * (1.0 - f.critical_penalty));
        let penalty = f.missed_streak.saturating_mul(s.streak_step).min(s.streak_cap) as f64;
        (raw - penalty).round().clamp(0.0, 100.0) as u32
    }

    pub fn label_for(&self, value: u32) -> ScoreLabel {
        if value >= self.scoring.excellent_min {
            ScoreLabel::Excellent
        } else if value >= self.scoring.good_min {
            ScoreLabel::Good
        } else {
            ScoreLabel::NeedsSupport
        }
    }

    fn reasons(&self, f: &AdherenceFactors) -> Vec<String> {
        let s = &self.scoring;
        let mut why = vec![format!(
            "Active completion: {}% ({}/{}).",
            (f.active_rate * 100.0).round() as u32,
            f.active_done,
            f.active_total
        )];

        if f.missed_streak >= s.streak_warning_min {
            why.push(format!(
                "Missed streak detected: {} day(s) in a row.",
                f.missed_streak
            ));
        }
        if f.critical_penalty > s.critical_warning_above {
            why.push("Important tasks (Medication/Appointment) are often missed.".to_string());
        }
        if f.time_consistency < s.scatter_warning_below {
            why.push("Your task times are scattered — routine could help.".to_string());
        }
        if why.len() < 3 {
            why.push("Keep going — consistency is the key.".to_string());
        }

        why
    }
}

/// Missed share of critical tasks, 0 when there are none.
pub fn critical_penalty(tasks: &[Task]) -> f64 {
    let (total, missed) = tasks
        .iter()
        .filter(|t| t.task_type.is_critical())
        .fold((0u32, 0u32), |(total, missed), t| {
            (total + 1, missed + u32::from(!t.completed))
        });

    if total == 0 {
        0.0
    } else {
        missed as f64 / total as f64
    }
}
