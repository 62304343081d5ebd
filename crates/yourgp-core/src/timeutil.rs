//! Date/time parsing, display formatting, and id generation.
//!
//! All calendar math in the portal is local wall clock: appointment
//! date-times are `NaiveDateTime` with no timezone attached.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Parse a `YYYY-MM-DD` date as entered by the booking UI.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Parse an `HH:MM` slot time as entered by the booking UI.
pub fn parse_slot_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format an `HH:MM` slot label.
pub fn format_slot_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Long display form, e.g. `Monday, 2 March 2026`.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %-d %B %Y").to_string()
}

/// Short display form, e.g. `Monday, 2 Mar`.
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%A, %-d %b").to_string()
}

/// 12-hour display form, e.g. `9:30 am`.
pub fn format_time_12h(time: NaiveTime) -> String {
    time.format("%-I:%M %P").to_string()
}

/// Relative label for a date: `Today`, `Tomorrow`, or the short form.
pub fn relative_day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if date == today + chrono::Duration::days(1) {
        "Tomorrow".to_string()
    } else {
        format_short_date(date)
    }
}

/// Serialize a local date-time for storage (`%Y-%m-%dT%H:%M:%S`).
///
/// Fixed-width ISO text, so lexicographic order in SQL matches
/// chronological order.
pub fn format_stored_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Parse a stored local date-time written by [`format_stored_datetime`].
pub fn parse_stored_datetime(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
}

/// Generate a history-record id: prefix, millisecond timestamp, random
/// suffix. Unique enough for a single-profile store, not cryptographic.
pub fn generate_id(prefix: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}", prefix, Utc::now().timestamp_millis(), &suffix[..9])
}

/// Weekday number with Sunday = 0, matching the stored working-day sets.
pub fn weekday_number(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}
