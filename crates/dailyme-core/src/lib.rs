//! # DailyMe Core Library
//!
//! Behavioral analytics for the DailyMe daily-task tracker. Given a patient's
//! active tasks, archived task history and mood check-ins, the library derives
//! an explainable adherence score, the best and worst times of day, a
//! mood-vs-completion table, and the clinician views: weekly trend, risk tier
//! and rule-based recommendations.
//!
//! ## Architecture
//!
//! - **Model**: plain task and mood records as the task service delivers them
//! - **Insights**: one pure analyzer per view; no I/O and no clock access,
//!   "today" is always passed in
//! - **Engine**: the inbound data-source trait and the snapshot-to-insights
//!   pipeline
//! - **Config**: TOML-backed thresholds and weights
//!
//! ## Key Components
//!
//! - [`InsightEngine`]: runs every analyzer over a [`PatientSnapshot`]
//! - [`PatientDataSource`]: trait for whatever stores tasks and mood entries
//! - [`InsightsConfig`]: scoring weights and clinical thresholds
//! - [`TaskQuery`]: search, filter and sort for task lists

pub mod config;
pub mod engine;
pub mod error;
pub mod insights;
pub mod model;
pub mod task_view;

pub use config::InsightsConfig;
pub use engine::{InsightEngine, PatientDataSource, PatientInsights, PatientSnapshot};
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use insights::{
    AdherenceScore, AdherenceScorer, ClinicalTrendAnalyzer, MoodCorrelationAnalyzer,
    RiskAssessment, RiskLevel, ScoreLabel, TimeBucketStat, TimeWindowAnalyzer, TrendDirection,
    TrendResult,
};
pub use model::{DateField, Mood, MoodEntry, Task, TaskType};
pub use task_view::{is_duplicate, SortMode, StatusFilter, TaskQuery};
