//! Mood check-ins.
//!
//! Patients log one "how do you feel today" entry per day. Like tasks, the
//! date and emotion fields go by different names across service versions.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::time::{parse_day, parse_timestamp};

/// Closed vocabulary of self-reported moods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    Neutral,
    Sad,
    Anxious,
    Confused,
    Angry,
    Tired,
    Excited,
    Calm,
}

impl Mood {
    pub const ALL: [Mood; 9] = [
        Mood::Happy,
        Mood::Neutral,
        Mood::Sad,
        Mood::Anxious,
        Mood::Confused,
        Mood::Angry,
        Mood::Tired,
        Mood::Excited,
        Mood::Calm,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Neutral => "Neutral",
            Mood::Sad => "Sad",
            Mood::Anxious => "Anxious",
            Mood::Confused => "Confused",
            Mood::Angry => "Angry",
            Mood::Tired => "Tired",
            Mood::Excited => "Excited",
            Mood::Calm => "Calm",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Mood::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown mood: {s}"))
    }
}

/// A mood check-in as delivered by the daily-entry service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    #[serde(default)]
    pub patient_id: String,

    #[serde(default)]
    pub entry_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub daily_emotion: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub emotion: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,
}

impl MoodEntry {
    /// Entry for `day` (as `YYYY-MM-DD` or a timestamp) with the given emotion.
    pub fn new(day: impl Into<String>, emotion: impl Into<String>) -> Self {
        Self {
            entry_date: Some(day.into()),
            daily_emotion: Some(emotion.into()),
            ..Self::default()
        }
    }

    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    pub fn with_updated_at(mut self, updated_at: impl Into<String>) -> Self {
        self.updated_at = Some(updated_at.into());
        self
    }

    /// First populated of `entryDate`, `createdAt`, `date`.
    pub fn raw_date(&self) -> Option<&str> {
        first_populated([&self.entry_date, &self.created_at, &self.date])
    }

    /// First populated of `dailyEmotion`, `mood`, `emotion`.
    pub fn raw_emotion(&self) -> Option<&str> {
        first_populated([&self.daily_emotion, &self.mood, &self.emotion])
    }

    /// Calendar day the check-in refers to.
    pub fn day(&self) -> Option<NaiveDate> {
        self.raw_date().and_then(parse_day)
    }

    /// Parsed emotion, `None` when missing or outside the vocabulary.
    pub fn parsed_mood(&self) -> Option<Mood> {
        self.raw_emotion().and_then(|s| s.parse().ok())
    }

    /// When the entry was last written, from `updatedAt` then `createdAt`.
    pub fn recorded_at(&self) -> Option<NaiveDateTime> {
        [&self.updated_at, &self.created_at]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .find_map(parse_timestamp)
    }
}

fn first_populated<const N: usize>(candidates: [&Option<String>; N]) -> Option<&str> {
    candidates
        .into_iter()
        .filter_map(|v| v.as_deref())
        .find(|s| !s.is_empty())
}
