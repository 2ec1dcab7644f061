//! Integration tests for the patient insight pipeline.
//!
//! Each test drives the public API the way the task tracker does: records
//! arrive as camelCase JSON, a snapshot is evaluated for a fixed "today",
//! and the presentation getters are checked.

use chrono::NaiveDate;
use dailyme_core::insights::{CorrelationStatus, TrendMethod};
use dailyme_core::{
    AdherenceScorer, ClinicalTrendAnalyzer, DateField, InsightEngine, InsightsConfig,
    MoodCorrelationAnalyzer, MoodEntry, PatientSnapshot, RiskLevel, ScoreLabel, Task, TaskType,
    TrendDirection,
};

const ROUTINE_PATIENT: &str = include_str!("fixtures/routine_patient.json");

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn undated(done: &[bool]) -> Vec<Task> {
    done.iter()
        .map(|&d| Task::new("Daily task", TaskType::Other).done(d))
        .collect()
}

#[test]
fn test_routine_patient_full_workflow() {
    init_tracing();
    let snapshot: PatientSnapshot = serde_json::from_str(ROUTINE_PATIENT).unwrap();
    assert_eq!(snapshot.active.len(), 10);

    let insights = InsightEngine::new().evaluate(&snapshot, today());

    // 6 of 10 done, every task between 08:00 and 09:59, nothing critical
    let score = insights.adherence_score();
    assert_eq!(score.factors.time_consistency, 1.0);
    assert_eq!(score.factors.active_rate, 0.6);
    assert_eq!(score.factors.critical_penalty, 0.0);
    assert_eq!(score.factors.missed_streak, 0);
    assert_eq!(score.value, 78);
    assert_eq!(score.label, ScoreLabel::Good);
    assert_eq!(score.reasons[0], "Active completion: 60% (6/10).");

    let best = insights.best_time_window().unwrap();
    assert_eq!(best.bucket, "08:00-10:00");
    assert_eq!(best.total_count, 10);
    assert_eq!(best.completion_rate, 60);
    assert_eq!(insights.worst_time_window(), Some(best));

    // Only today carries tasks, so the last third rises above the first
    let trend = insights.weekly_trend();
    assert_eq!(trend.method, TrendMethod::Daily);
    assert_eq!(trend.direction, TrendDirection::Improving);
    assert_eq!(trend.rates(), vec![0, 0, 0, 0, 0, 0, 60]);
    assert_eq!(trend.daily_series.last().unwrap().label, "Fri");

    let rows = insights.mood_correlation();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].completion_rate, 60);
    assert_eq!(rows[0].task_count, 10);
    assert_eq!(rows[0].sample_days, 1);
    assert_eq!(insights.mood_hint(), "Correlation computed from your last 14 days.");

    assert_eq!(insights.risk_assessment().level, RiskLevel::Medium);
    assert_eq!(
        insights.recommendations(),
        &[
            "Completion is moderate: encourage routine-building and adjust task times if needed.",
            "Most frequent task type is OTHER: focus coaching on this category.",
            "Suggested plan: start with 1–2 “easy win” tasks daily, then progressively add tasks.",
        ]
    );

    let labels: Vec<&str> = insights
        .type_distribution()
        .iter()
        .map(|c| c.label.as_str())
        .collect();
    assert_eq!(labels, vec!["MEAL", "EXERCISE", "OTHER", "SOCIAL"]);
}

#[test]
fn test_recent_missed_streak_costs_fifteen_points() {
    // Oldest first: the three newest entries were missed
    let history = undated(&[true, false, true, true, false, false, false]);
    let scorer = AdherenceScorer::new();

    assert_eq!(scorer.missed_streak(&history), 3);
    let baseline = scorer.score(&[], &[]).value;
    let score = scorer.score(&[], &history);
    assert_eq!(baseline - score.value, 15);
    assert!(score
        .reasons
        .contains(&"Missed streak detected: 3 day(s) in a row.".to_string()));
}

#[test]
fn test_no_mood_entries_asks_for_checkins() {
    let active = vec![Task::new("Pills", TaskType::Medication)
        .on(DateField::CreatedAt, "2026-10-16T08:00:00Z")
        .done(true)];
    let result = MoodCorrelationAnalyzer::new().analyze(&active, &[], &[], today());

    assert!(result.rows.is_empty());
    assert_eq!(result.status, CorrelationStatus::NotEnoughCheckins);
    assert!(result.hint.starts_with("Add at least 2 mood check-ins"));
}

#[test]
fn test_undated_tasks_fall_back_everywhere() {
    init_tracing();
    let active = undated(&[true, true, false]);
    let history = undated(&[true, false]);
    let moods = vec![
        MoodEntry::new("2026-10-15", "Sad"),
        MoodEntry::new("2026-10-16", "Happy"),
    ];
    let snapshot = PatientSnapshot::new("p-2", active, history, moods);

    let insights = InsightEngine::new().evaluate(&snapshot, today());

    assert_eq!(insights.mood_correlation.status, CorrelationStatus::NoDateKey);
    assert_eq!(
        insights.mood_hint(),
        "No task date field detected (add createdAt/taskDate/scheduledDate)."
    );

    let trend = insights.weekly_trend();
    assert_eq!(trend.method, TrendMethod::Approximate);
    assert_eq!(trend.hint, "Approx trend (no task date field).");
    assert_eq!(trend.daily_series[0].label, "D1");
    assert_eq!(trend.rates(), vec![100, 0, 0, 0, 0, 0, 0]);
    // Active completion 67% sits between the risk thresholds
    assert_eq!(trend.direction, TrendDirection::Stable);
}

#[test]
fn test_risk_boundaries_are_exclusive_above() {
    let clinical = ClinicalTrendAnalyzer::new();
    assert_eq!(clinical.risk(70).level, RiskLevel::Low);
    assert_eq!(clinical.risk(69).level, RiskLevel::Medium);
    assert_eq!(clinical.risk(40).level, RiskLevel::Medium);
    assert_eq!(clinical.risk(39).level, RiskLevel::High);

    // 7 of 10 active tasks done through the whole pipeline
    let mut done = vec![true; 7];
    done.extend([false; 3]);
    let snapshot = PatientSnapshot::new("p-3", undated(&done), vec![], vec![]);
    let insights = InsightEngine::new().evaluate(&snapshot, today());
    assert_eq!(insights.activity_summary().completion_rate, 70);
    assert_eq!(insights.risk_assessment().level, RiskLevel::Low);
    assert_eq!(
        insights.risk_assessment().hint,
        "Good adherence — reinforce consistency."
    );
}

#[test]
fn test_declining_week_from_timestamps() {
    let mut history = Vec::new();
    for (day, done) in [(10, true), (11, true), (12, true), (14, false), (15, false), (16, false)] {
        history.push(
            Task::new("Walk", TaskType::Exercise)
                .on(DateField::CreatedAt, format!("2026-10-{day:02}T07:30:00Z"))
                .done(done),
        );
    }

    let trend = ClinicalTrendAnalyzer::new().weekly_trend(&[], &history, today());
    assert_eq!(trend.direction, TrendDirection::Declining);
    assert_eq!(trend.hint, "Completion is decreasing.");
    assert_eq!(trend.daily_series[3].total, 0);
}

#[test]
fn test_config_file_drives_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("insights.toml");
    std::fs::write(
        &path,
        "[risk]\nhigh_below = 50\nmedium_below = 80\n\n[mood]\nmin_entries = 5\n",
    )
    .unwrap();

    let config = InsightsConfig::load(&path).unwrap();
    let snapshot: PatientSnapshot = serde_json::from_str(ROUTINE_PATIENT).unwrap();
    let insights = InsightEngine::from_config(config).evaluate(&snapshot, today());

    assert_eq!(insights.risk_assessment().level, RiskLevel::Medium);
    assert_eq!(insights.mood_correlation.status, CorrelationStatus::NotEnoughCheckins);
    assert_eq!(
        insights.mood_hint(),
        "Add at least 5 mood check-ins to unlock correlations."
    );
}

#[test]
fn test_evaluate_is_repeatable() {
    let snapshot: PatientSnapshot = serde_json::from_str(ROUTINE_PATIENT).unwrap();
    let engine = InsightEngine::new();
    let first = engine.evaluate(&snapshot, today());
    let second = engine.evaluate(&snapshot, today());
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
