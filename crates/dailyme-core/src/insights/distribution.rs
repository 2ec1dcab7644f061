//! Task category counts and the activity summary shown to clinicians.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::percent;
use crate::model::{Task, TaskType};

/// Number of pooled tasks in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    pub label: String,
    pub task_type: TaskType,
    pub count: u32,
}

/// Count tasks by category, in first-encountered order.
///
/// Only categories that occur are listed; an empty pool gives an empty list.
pub fn type_distribution<'a, I>(tasks: I) -> Vec<TypeCount>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut counts: IndexMap<TaskType, u32> = IndexMap::new();
    for task in tasks {
        *counts.entry(task.task_type).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(task_type, count)| TypeCount {
            label: task_type.label().to_string(),
            task_type,
            count,
        })
        .collect()
}

/// Most frequent category; ties go to the category encountered first.
pub fn most_common_type(distribution: &[TypeCount]) -> Option<TaskType> {
    let mut best: Option<&TypeCount> = None;
    for entry in distribution {
        if best.map_or(true, |b| entry.count > b.count) {
            best = Some(entry);
        }
    }
    best.map(|b| b.task_type)
}

/// Headline numbers over the active and history lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub total_active: u32,
    pub completed_active: u32,
    /// Rounded completion percentage of active tasks (0-100)
    pub completion_rate: u32,
    /// History tasks never completed
    pub missed_count: u32,
    pub most_common_type: Option<TaskType>,
}

impl ActivitySummary {
    pub fn from_tasks(active: &[Task], history: &[Task]) -> Self {
        let total_active = active.len() as u32;
        let completed_active = active.iter().filter(|t| t.completed).count() as u32;
        let missed_count = history.iter().filter(|t| !t.completed).count() as u32;
        let distribution = type_distribution(active.iter().chain(history));

        Self {
            total_active,
            completed_active,
            completion_rate: percent(completed_active, total_active),
            missed_count,
            most_common_type: most_common_type(&distribution),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(task_type: TaskType, done: bool) -> Task {
        Task::new("t", task_type).done(done)
    }

    #[test]
    fn empty_pool_has_empty_distribution() {
        assert!(type_distribution(&Vec::<Task>::new()).is_empty());
        assert_eq!(most_common_type(&[]), None);
    }

    #[test]
    fn counts_by_type_in_encounter_order() {
        let tasks = vec![
            t(TaskType::Meal, true),
            t(TaskType::Medication, true),
            t(TaskType::Meal, false),
            t(TaskType::Other, false),
        ];
        let dist = type_distribution(&tasks);
        let pairs: Vec<_> = dist.iter().map(|c| (c.label.as_str(), c.count)).collect();
        assert_eq!(pairs, vec![("MEAL", 2), ("MEDICATION", 1), ("OTHER", 1)]);
    }

    #[test]
    fn most_common_breaks_ties_by_first_seen() {
        let tasks = vec![
            t(TaskType::Social, true),
            t(TaskType::Exercise, true),
            t(TaskType::Exercise, true),
            t(TaskType::Social, true),
        ];
        let dist = type_distribution(&tasks);
        assert_eq!(most_common_type(&dist), Some(TaskType::Social));
    }

    #[test]
    fn summary_counts_active_and_missed() {
        let active = vec![
            t(TaskType::Medication, true),
            t(TaskType::Medication, false),
            t(TaskType::Meal, true),
        ];
        let history = vec![t(TaskType::Meal, false), t(TaskType::Meal, false), t(TaskType::Meal, true)];
        let summary = ActivitySummary::from_tasks(&active, &history);

        assert_eq!(summary.total_active, 3);
        assert_eq!(summary.completed_active, 2);
        assert_eq!(summary.completion_rate, 67);
        assert_eq!(summary.missed_count, 2);
        assert_eq!(summary.most_common_type, Some(TaskType::Meal));
    }

    #[test]
    fn summary_of_nothing() {
        let summary = ActivitySummary::from_tasks(&[], &[]);
        assert_eq!(summary.completion_rate, 0);
        assert_eq!(summary.missed_count, 0);
        assert_eq!(summary.most_common_type, None);
    }
}
