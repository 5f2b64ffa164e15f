//! Flexible date parsing for fire feed timestamps.
//!
//! Upstream dates arrive as `YYYYMMDD` strings, ISO/calendar strings, epoch
//! seconds, or epoch milliseconds, sometimes as JSON numbers and sometimes
//! as strings. Everything is normalized to epoch milliseconds (UTC).

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::fields::number_text;

/// Values below this are epoch seconds; at or above, epoch milliseconds.
pub const EPOCH_MS_THRESHOLD: f64 = 1e12;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y"];

/// Parses a JSON date value into epoch milliseconds.
///
/// Numbers are rendered as text first so that `20240115` and `"20240115"`
/// take the same path.
#[must_use]
pub fn parse_flexible_date(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => parse_flexible_date_str(s),
        Value::Number(n) => parse_flexible_date_str(&number_text(n)),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parses a date string into epoch milliseconds.
///
/// Tried in order: `YYYYMMDD` (UTC midnight), calendar/ISO formats, then a
/// bare number (seconds below 1e12, milliseconds otherwise). Returns `None`
/// for empty input or when nothing yields a finite positive instant.
#[must_use]
pub fn parse_flexible_date_str(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(ms) = parse_yyyymmdd(s) {
        return Some(ms);
    }

    if let Some(dt) = parse_calendar(s) {
        return Some(dt.timestamp_millis());
    }

    parse_epoch(s)
}

/// Eight digits with month in `1..=12` and day in `1..=31`. Days past the
/// end of the month roll over into the next month (`20240230` is March 1).
fn parse_yyyymmdd(s: &str) -> Option<i64> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = s[0..4].parse().ok()?;
    let month: u32 = s[4..6].parse().ok()?;
    let day: u32 = s[6..8].parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let date = first.checked_add_signed(Duration::days(i64::from(day - 1)))?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}

/// Generic calendar parsing. Strings without an offset are taken as UTC.
fn parse_calendar(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%#z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }
    None
}

#[allow(clippy::cast_possible_truncation)]
fn parse_epoch(s: &str) -> Option<i64> {
    let n = s.parse::<f64>().ok()?;
    if !n.is_finite() || n <= 0.0 {
        return None;
    }
    let ms = if n < EPOCH_MS_THRESHOLD { n * 1000.0 } else { n };
    Some(ms.round() as i64)
}
