//! Time-of-day and calendar-date normalization.
//!
//! Task and mood records arrive with loosely formatted strings: `"7:30 PM"`,
//! `"08:00:00"`, `"2026-10-16T09:12:44Z"`, `"2026-10-16"`. Everything the
//! analyzers bucket or window goes through these helpers first.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Time assumed for tasks with a missing or unrecognizable `scheduledTime`.
pub const DEFAULT_TIME: &str = "08:00";

/// Width of a time bucket in hours.
pub const BUCKET_HOURS: u32 = 2;

static STRICT_HHMM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("Valid HH:mm regex"));

static LOOSE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([0-9]{1,2}):([0-9]{2})\s*(AM|PM)?").expect("Valid loose time regex")
});

/// Normalize a raw time-of-day string to 24-hour `HH:mm`, using
/// [`DEFAULT_TIME`] when nothing usable is found.
pub fn normalize_time(raw: Option<&str>) -> String {
    normalize_time_or(raw, DEFAULT_TIME)
}

/// Normalize a raw time-of-day string, falling back to `fallback`.
///
/// A strict `HH:mm` value is returned unchanged. Otherwise the first
/// `H:MM`/`HH:MM` occurrence (with an optional AM/PM marker) is converted.
/// The result is not range-checked: `"25:00"` stays `"25:00"` and is
/// rejected later by [`hour_of`].
pub fn normalize_time_or(raw: Option<&str>, fallback: &str) -> String {
    let raw = match raw {
        Some(s) if !s.is_empty() => s,
        _ => return fallback.to_string(),
    };

    if STRICT_HHMM.is_match(raw) {
        return raw.to_string();
    }

    if let Some(caps) = LOOSE_TIME.captures(raw) {
        let mut hours: u32 = caps[1].parse().unwrap_or(0);
        let minutes = &caps[2];
        let modifier = caps
            .get(3)
            .map(|m| m.as_str().to_ascii_uppercase())
            .unwrap_or_default();

        if modifier == "PM" && hours < 12 {
            hours += 12;
        }
        if modifier == "AM" && hours == 12 {
            hours = 0;
        }

        return format!("{:02}:{}", hours, minutes);
    }

    fallback.to_string()
}

/// Hour of day (0-23) for a raw scheduled time, or `None` when the
/// normalized value is not a valid 24-hour time.
pub fn hour_of(raw: Option<&str>) -> Option<u32> {
    hour_of_normalized(&normalize_time(raw))
}

/// Hour of day for an already-normalized `HH:mm` string.
pub fn hour_of_normalized(normalized: &str) -> Option<u32> {
    let caps = STRICT_HHMM.captures(normalized)?;
    caps[1].parse().ok()
}

/// Label of the 2-hour bucket containing `hour`, e.g. `"08:00-10:00"`.
pub fn bucket_label(hour: u32) -> String {
    let start = hour - (hour % BUCKET_HOURS);
    let end = start + BUCKET_HOURS;
    format!("{:02}:00-{:02}:00", start, end)
}

/// Calendar date of a raw date or timestamp string.
///
/// The date is taken as written: `2026-10-16T23:30:00+02:00` is the 16th,
/// no conversion to another zone happens.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    if let Some(ndt) = parse_naive_datetime(s) {
        return Some(ndt.date());
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Point in time of a raw timestamp, used to order records.
///
/// Offsets are normalized to UTC; naive timestamps are taken as-is and
/// plain dates count as midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    if let Some(ndt) = parse_naive_datetime(s) {
        return Some(ndt);
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn parse_naive_datetime(s: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}
