//! Date field resolution for a pool of tasks.
//!
//! Different task service versions put the calendar date in different
//! fields. The first candidate (in [`DateField::PRIORITY`] order) populated
//! on at least one task of the pool is used for every task of that pool.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::time::parse_day;
use crate::model::{DateField, Task};

/// Outcome of resolving the date field of a task pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateKey {
    /// This field carries task dates.
    Field(DateField),
    /// No candidate field is populated on any task.
    NoDateKey,
}

impl DateKey {
    /// Resolve the date field for `tasks`.
    pub fn resolve<'a, I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
        I::IntoIter: Clone,
    {
        let tasks = tasks.into_iter();
        DateField::PRIORITY
            .into_iter()
            .find(|field| tasks.clone().any(|t| field.get(t).is_some()))
            .map(DateKey::Field)
            .unwrap_or(DateKey::NoDateKey)
    }

    pub fn field(self) -> Option<DateField> {
        match self {
            DateKey::Field(f) => Some(f),
            DateKey::NoDateKey => None,
        }
    }

    pub fn is_resolved(self) -> bool {
        matches!(self, DateKey::Field(_))
    }

    /// Calendar day of `task` under this key.
    ///
    /// `None` when the key is unresolved, the field is empty on this task,
    /// or its value does not parse.
    pub fn day_of(self, task: &Task) -> Option<NaiveDate> {
        let field = self.field()?;
        let raw = field.get(task)?;
        let day = parse_day(raw);
        if day.is_none() {
            tracing::debug!(field = %field, value = raw, "skipping task with unparseable date");
        }
        day
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskType;

    fn task() -> Task {
        Task::new("Walk", TaskType::Exercise)
    }

    #[test]
    fn empty_pool_has_no_key() {
        assert_eq!(DateKey::resolve(&Vec::<Task>::new()), DateKey::NoDateKey);
    }

    #[test]
    fn tasks_without_dates_have_no_key() {
        let pool = vec![task(), task().on(DateField::Day, "")];
        assert_eq!(DateKey::resolve(&pool), DateKey::NoDateKey);
        assert!(!DateKey::resolve(&pool).is_resolved());
    }

    #[test]
    fn priority_beats_popularity() {
        // Only one task has taskDate, but it outranks createdAt on all others.
        let pool = vec![
            task().on(DateField::CreatedAt, "2026-10-10"),
            task().on(DateField::CreatedAt, "2026-10-11"),
            task().on(DateField::TaskDate, "2026-10-12"),
        ];
        assert_eq!(DateKey::resolve(&pool), DateKey::Field(DateField::TaskDate));
    }

    #[test]
    fn lowest_priority_field_still_resolves() {
        let pool = vec![task(), task().on(DateField::UpdatedAt, "2026-10-12T10:00:00")];
        assert_eq!(DateKey::resolve(&pool), DateKey::Field(DateField::UpdatedAt));
    }

    #[test]
    fn resolves_over_chained_collections() {
        let active = vec![task()];
        let history = vec![task().on(DateField::ScheduledDate, "2026-10-01")];
        let key = DateKey::resolve(active.iter().chain(history.iter()));
        assert_eq!(key.field(), Some(DateField::ScheduledDate));
    }

    #[test]
    fn day_of_uses_resolved_field_only() {
        let key = DateKey::Field(DateField::TaskDate);
        let dated = task().on(DateField::TaskDate, "2026-10-12");
        let other = task().on(DateField::CreatedAt, "2026-10-12");
        assert_eq!(key.day_of(&dated), NaiveDate::from_ymd_opt(2026, 10, 12));
        assert_eq!(key.day_of(&other), None);
        assert_eq!(DateKey::NoDateKey.day_of(&dated), None);
    }

    #[test]
    fn day_of_skips_garbage() {
        let key = DateKey::Field(DateField::Day);
        assert_eq!(key.day_of(&task().on(DateField::Day, "monday")), None);
    }
}
