//! Behavioral analytics over a patient's tasks and mood check-ins.
//!
//! Every analyzer is a pure function of its inputs: the same task and mood
//! lists (and the same `today`) always give the same result, and no analyzer
//! fails. Insufficient data is reported through an explicit status or hint.

mod adherence;
mod clinical;
mod date_key;
mod distribution;
mod mood_correlation;
mod time_window;

pub use adherence::{critical_penalty, AdherenceFactors, AdherenceScore, AdherenceScorer, ScoreLabel};
pub use clinical::{
    ClinicalTrendAnalyzer, RiskAssessment, RiskLevel, TrendDirection, TrendMethod, TrendPoint,
    TrendResult, APPROXIMATE_TREND_HINT,
};
pub use date_key::DateKey;
pub use distribution::{most_common_type, type_distribution, ActivitySummary, TypeCount};
pub use mood_correlation::{
    mood_by_day, CorrelationStatus, MoodCorrelation, MoodCorrelationAnalyzer, MoodCorrelationRow,
};
pub use time_window::{TimeBucketStat, TimeWindowAnalyzer, TimeWindowReport, WindowRanking};

/// Rounded percentage of `part` in `whole`, 0 when `whole` is 0.
pub(crate) fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64 * 100.0).round() as u32).min(100)
}

#[cfg(test)]
mod tests {
    use super::percent;

    #[test]
    fn percent_handles_empty_and_rounding() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(3, 0), 0);
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(5, 5), 100);
    }
}
