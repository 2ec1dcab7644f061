//! Daily task records.
//!
//! A [`Task`] is a single thing a patient (or their caregiver) logged for the
//! day: take a pill, eat lunch, go for a walk. Tasks arrive from the task
//! service as camelCase JSON. Which field carries the task's calendar date
//! depends on the service version, so every known candidate is kept and
//! [`DateField`] names them explicitly.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::time::normalize_time;

/// Category of a daily task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum TaskType {
    Medication,
    Meal,
    Exercise,
    Appointment,
    Social,
    #[default]
    Other,
}

impl TaskType {
    /// All categories, in the order the task form lists them.
    pub const ALL: [TaskType; 6] = [
        TaskType::Medication,
        TaskType::Meal,
        TaskType::Exercise,
        TaskType::Appointment,
        TaskType::Social,
        TaskType::Other,
    ];

    /// Wire label, e.g. `"MEDICATION"`.
    pub fn label(self) -> &'static str {
        match self {
            TaskType::Medication => "MEDICATION",
            TaskType::Meal => "MEAL",
            TaskType::Exercise => "EXERCISE",
            TaskType::Appointment => "APPOINTMENT",
            TaskType::Social => "SOCIAL",
            TaskType::Other => "OTHER",
        }
    }

    /// Parse a wire label. Unknown or blank labels fall into `Other`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "MEDICATION" => TaskType::Medication,
            "MEAL" => TaskType::Meal,
            "EXERCISE" => TaskType::Exercise,
            "APPOINTMENT" => TaskType::Appointment,
            "SOCIAL" => TaskType::Social,
            _ => TaskType::Other,
        }
    }

    /// Medication and appointments weigh more in adherence scoring.
    pub fn is_critical(self) -> bool {
        matches!(self, TaskType::Medication | TaskType::Appointment)
    }
}

impl From<String> for TaskType {
    fn from(label: String) -> Self {
        TaskType::from_label(&label)
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A daily task as delivered by the task service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque identifier; numeric ids are kept as their decimal string.
    #[serde(default, deserialize_with = "opaque_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub patient_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub task_type: TaskType,
    /// Raw time of day as entered; see [`Task::normalized_time`].
    #[serde(default)]
    pub scheduled_time: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// In the history collection `false` means the task was missed.
    #[serde(default)]
    pub completed: bool,

    #[serde(default)]
    pub task_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub scheduled_date: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Task {
    pub fn new(title: impl Into<String>, task_type: TaskType) -> Self {
        Self {
            title: title.into(),
            task_type,
            ..Self::default()
        }
    }

    pub fn with_patient(mut self, patient_id: impl Into<String>) -> Self {
        self.patient_id = patient_id.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn at(mut self, scheduled_time: impl Into<String>) -> Self {
        self.scheduled_time = Some(scheduled_time.into());
        self
    }

    pub fn on(mut self, field: DateField, value: impl Into<String>) -> Self {
        *field.slot_mut(&mut self) = Some(value.into());
        self
    }

    pub fn done(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Scheduled time as 24-hour `HH:mm`, defaulting to `08:00`.
    pub fn normalized_time(&self) -> String {
        normalize_time(self.scheduled_time.as_deref())
    }

    /// Raw value of a date field, if populated.
    pub fn date_value(&self, field: DateField) -> Option<&str> {
        field.get(self)
    }
}

/// A task field that may carry the task's calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateField {
    TaskDate,
    CreatedAt,
    Date,
    Day,
    ScheduledDate,
    UpdatedAt,
}

impl DateField {
    /// Candidates in resolution priority order.
    pub const PRIORITY: [DateField; 6] = [
        DateField::TaskDate,
        DateField::CreatedAt,
        DateField::Date,
        DateField::Day,
        DateField::ScheduledDate,
        DateField::UpdatedAt,
    ];

    /// Field name as it appears on the wire.
    pub fn name(self) -> &'static str {
        match self {
            DateField::TaskDate => "taskDate",
            DateField::CreatedAt => "createdAt",
            DateField::Date => "date",
            DateField::Day => "day",
            DateField::ScheduledDate => "scheduledDate",
            DateField::UpdatedAt => "updatedAt",
        }
    }

    /// Non-empty value of this field on `task`.
    pub fn get(self, task: &Task) -> Option<&str> {
        let value = match self {
            DateField::TaskDate => &task.task_date,
            DateField::CreatedAt => &task.created_at,
            DateField::Date => &task.date,
            DateField::Day => &task.day,
            DateField::ScheduledDate => &task.scheduled_date,
            DateField::UpdatedAt => &task.updated_at,
        };
        value.as_deref().filter(|s| !s.is_empty())
    }

    fn slot_mut(self, task: &mut Task) -> &mut Option<String> {
        match self {
            DateField::TaskDate => &mut task.task_date,
            DateField::CreatedAt => &mut task.created_at,
            DateField::Date => &mut task.date,
            DateField::Day => &mut task.day,
            DateField::ScheduledDate => &mut task.scheduled_date,
            DateField::UpdatedAt => &mut task.updated_at,
        }
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn opaque_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_type_labels_round_trip() {
        for t in TaskType::ALL {
            assert_eq!(TaskType::from_label(t.label()), t);
        }
    }

    #[test]
    fn unknown_task_type_is_other() {
        assert_eq!(TaskType::from_label("GARDENING"), TaskType::Other);
        assert_eq!(TaskType::from_label(""), TaskType::Other);
        assert_eq!(TaskType::from_label(" medication "), TaskType::Medication);
    }

    #[test]
    fn only_medication_and_appointment_are_critical() {
        let critical: Vec<_> = TaskType::ALL.into_iter().filter(|t| t.is_critical()).collect();
        assert_eq!(critical, vec![TaskType::Medication, TaskType::Appointment]);
    }

    #[test]
    fn deserializes_service_payload() {
        let json = r#"{
            "id": 42,
            "patientId": "p-1",
            "title": "Blood pressure pill",
            "taskType": "MEDICATION",
            "scheduledTime": "08:00:00",
            "completed": true,
            "createdAt": "2026-10-15T07:55:00"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id.as_deref(), Some("42"));
        assert_eq!(task.task_type, TaskType::Medication);
        assert!(task.completed);
        assert_eq!(task.normalized_time(), "08:00");
        assert_eq!(task.date_value(DateField::CreatedAt), Some("2026-10-15T07:55:00"));
        assert_eq!(task.date_value(DateField::TaskDate), None);
    }

    #[test]
    fn sparse_payload_uses_defaults() {
        let task: Task = serde_json::from_str(r#"{"title": "Walk", "taskType": "WALKING"}"#).unwrap();
        assert_eq!(task.id, None);
        assert_eq!(task.task_type, TaskType::Other);
        assert!(!task.completed);
        assert_eq!(task.normalized_time(), "08:00");
    }

    #[test]
    fn empty_date_strings_are_unpopulated() {
        let task = Task::new("Lunch", TaskType::Meal).on(DateField::Day, "");
        assert_eq!(DateField::Day.get(&task), None);
    }

    #[test]
    fn builder_sets_each_date_field() {
        for field in DateField::PRIORITY {
            let task = Task::new("x", TaskType::Other).on(field, "2026-10-16");
            assert_eq!(field.get(&task), Some("2026-10-16"));
        }
    }
}
