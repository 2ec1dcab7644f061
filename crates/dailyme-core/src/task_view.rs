//! Task list views: search, filtering, sorting and duplicate detection.
//!
//! These operate on the same immutable task lists the insights use, so a
//! caller can render a filtered list and the analytics from one snapshot.

use serde::{Deserialize, Serialize};

use crate::model::{Task, TaskType};

/// Completion status filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusFilter {
    #[default]
    All,
    Done,
    Todo,
}

/// Sort order of a task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortMode {
    /// Keep the order the tasks came in.
    #[default]
    None,
    Time,
    Title,
    Type,
}

/// A list query as set from the task list toolbar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Matched against title and notes, ignoring case and extra whitespace
    #[serde(default)]
    pub search: String,
    /// `None` keeps every category
    #[serde(default)]
    pub task_type: Option<TaskType>,
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    pub sort: SortMode,
}

impl TaskQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn of_type(mut self, task_type: TaskType) -> Self {
        self.task_type = Some(task_type);
        self
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn sorted_by(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    /// Tasks matching the query, in the requested order.
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        let needle = normalize_key(&self.search);

        let mut list: Vec<&Task> = tasks
            .iter()
            .filter(|t| {
                needle.is_empty()
                    || normalize_key(&t.title).contains(&needle)
                    || normalize_key(t.notes.as_deref().unwrap_or_default()).contains(&needle)
            })
            .filter(|t| self.task_type.map_or(true, |wanted| t.task_type == wanted))
            .filter(|t| match self.status {
                StatusFilter::All => true,
                StatusFilter::Done => t.completed,
                StatusFilter::Todo => !t.completed,
            })
            .collect();

        match self.sort {
            SortMode::None => {}
            SortMode::Time => list.sort_by_cached_key(|t| t.normalized_time()),
            SortMode::Title => list.sort_by_cached_key(|t| normalize_key(&t.title)),
            SortMode::Type => list.sort_by_key(|t| t.task_type.label()),
        }

        list
    }
}

/// Lowercased, trimmed, with inner whitespace runs collapsed to one space.
pub fn normalize_key(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Whether `candidate` repeats an existing active task.
///
/// Two tasks are duplicates when patient, normalized title, category and
/// normalized time all match. The task sharing `candidate`'s id is ignored
/// so that saving an edit does not collide with itself.
pub fn is_duplicate(candidate: &Task, active: &[Task]) -> bool {
    let title = normalize_key(&candidate.title);
    let time = candidate.normalized_time();

    active.iter().any(|t| {
        let same_record = matches!((&candidate.id, &t.id), (Some(a), Some(b)) if a == b);
        !same_record
            && t.patient_id == candidate.patient_id
            && normalize_key(&t.title) == title
            && t.task_type == candidate.task_type
            && t.normalized_time() == time
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Task> {
        vec![
            Task::new("Evening  Walk", TaskType::Exercise).at("18:30").done(false),
            Task::new("Morning pills", TaskType::Medication).at("7:00 AM").done(true),
            Task::new("Lunch", TaskType::Meal)
                .at("12:00")
                .with_notes("low salt, walk after")
                .done(true),
            Task::new("Call daughter", TaskType::Social).at("17:00").done(false),
        ]
    }

    fn titles(list: &[&Task]) -> Vec<String> {
        list.iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let tasks = sample();
        assert_eq!(TaskQuery::new().apply(&tasks).len(), 4);
        assert_eq!(TaskQuery::new().apply(&tasks)[0].title, "Evening  Walk");
    }

    #[test]
    fn search_matches_title_and_notes() {
        let tasks = sample();
        let found = TaskQuery::new().search("  WALK ").apply(&tasks);
        assert_eq!(titles(&found), vec!["Evening  Walk", "Lunch"]);

        let found = TaskQuery::new().search("evening walk").apply(&tasks);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn filters_by_type_and_status() {
        let tasks = sample();
        let meds = TaskQuery::new().of_type(TaskType::Medication).apply(&tasks);
        assert_eq!(titles(&meds), vec!["Morning pills"]);

        let todo = TaskQuery::new().status(StatusFilter::Todo).apply(&tasks);
        assert_eq!(titles(&todo), vec!["Evening  Walk", "Call daughter"]);

        let done = TaskQuery::new().status(StatusFilter::Done).apply(&tasks);
        assert_eq!(done.len(), 2);
    }

    #[test]
    fn sorts_by_normalized_time() {
        let tasks = sample();
        let sorted = TaskQuery::new().sorted_by(SortMode::Time).apply(&tasks);
        assert_eq!(
            titles(&sorted),
            vec!["Morning pills", "Lunch", "Call daughter", "Evening  Walk"]
        );
    }

    #[test]
    fn sorts_by_title_and_type() {
        let tasks = sample();
        let by_title = TaskQuery::new().sorted_by(SortMode::Title).apply(&tasks);
        assert_eq!(by_title[0].title, "Call daughter");

        let by_type = TaskQuery::new().sorted_by(SortMode::Type).apply(&tasks);
        let types: Vec<_> = by_type.iter().map(|t| t.task_type).collect();
        assert_eq!(
            types,
            vec![TaskType::Exercise, TaskType::Meal, TaskType::Medication, TaskType::Social]
        );
    }

    #[test]
    fn normalize_key_collapses_whitespace() {
        assert_eq!(normalize_key("  Evening \t  Walk "), "evening walk");
        assert_eq!(normalize_key(""), "");
    }

    #[test]
    fn detects_duplicates_across_time_formats() {
        let active = vec![Task::new("Morning pills", TaskType::Medication)
            .with_patient("p-1")
            .with_id("1")
            .at("07:00")];
        let candidate = Task::new("morning  PILLS", TaskType::Medication)
            .with_patient("p-1")
            .at("7:00 AM");
        assert!(is_duplicate(&candidate, &active));
    }

    #[test]
    fn different_type_time_or_patient_is_not_duplicate() {
        let active = vec![Task::new("Pills", TaskType::Medication).with_patient("p-1").at("07:00")];
        let base = Task::new("Pills", TaskType::Medication).with_patient("p-1");
        assert!(!is_duplicate(&base.clone().at("08:00"), &active));
        assert!(!is_duplicate(&Task::new("Pills", TaskType::Meal).with_patient("p-1").at("07:00"), &active));
        assert!(!is_duplicate(&base.clone().with_patient("p-2").at("07:00"), &active));
    }

    #[test]
    fn editing_a_task_does_not_collide_with_itself() {
        let active = vec![Task::new("Pills", TaskType::Medication)
            .with_patient("p-1")
            .with_id("7")
            .at("07:00")];
        let edited = active[0].clone().with_notes("with water");
        assert!(!is_duplicate(&edited, &active));
    }
}
