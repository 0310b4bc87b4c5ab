//! Timestamp parsing for delay computation.
//!
//! View projections deliver instants as ISO 8601 strings, usually with an
//! offset (`2025-03-01T09:30:00+01:00` or `...Z`), occasionally without one,
//! and sometimes as a bare date. Parsing is timezone-aware: offset forms are
//! converted to UTC, offset-less forms are taken as UTC. Anything else is
//! not an error; it degrades to `None` and the row is excluded from pending
//! classification downstream.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Parse an ISO 8601 instant, tolerating missing offsets and bare dates.
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

/// Signed distance from `reference` to `issued`, in days.
pub fn delay_days(issued: DateTime<Utc>, reference: DateTime<Utc>) -> f64 {
    let millis = issued.signed_duration_since(reference).num_milliseconds();
    millis as f64 / 1_000.0 / SECONDS_PER_DAY
}

/// Calendar date prefix of an instant string, when one is present.
pub fn date_part(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    let (date, _) = trimmed.split_at_checked(10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some(date)
}
