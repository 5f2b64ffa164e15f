//! Display strings for fire popups.
//!
//! The panel layer renders these verbatim. Labels differ by feed: active
//! fires lead with their detection time, out fires with their extinguish
//! time.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use fire_map_fire_models::{FeedOrigin, FireRecord};
use serde::Serialize;

/// Label shown when a record has no cause.
pub const NO_CAUSE_LABEL: &str = "No cause data";

const NOT_AVAILABLE: &str = "N/A";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M %Z";

/// Formatted popup content for one fire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupFields {
    pub title: String,
    pub status: String,
    pub area: String,
    pub containment: String,
    pub date_label: &'static str,
    pub date: String,
    pub cause: String,
    pub retrieved: Option<String>,
}

impl PopupFields {
    /// Formats `record`, rendering dates in `tz`.
    pub fn from_record<Tz>(record: &FireRecord, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let (date_label, date_ms) = match record.origin {
            FeedOrigin::Active => ("Detected", record.detected_at_ms),
            FeedOrigin::Extinguished => record
                .extinguished_at_ms
                .map_or(("Detected", record.detected_at_ms), |ms| {
                    ("Extinguished", Some(ms))
                }),
        };

        let containment = match (record.contained_pct, record.origin) {
            (Some(pct), _) => format!("{pct:.0}%"),
            (None, FeedOrigin::Extinguished) => "100%".to_string(),
            (None, FeedOrigin::Active) => NOT_AVAILABLE.to_string(),
        };

        let retrieved = match (record.fetched_at_ms, record.retrieved_live) {
            (Some(ms), _) => Some(format!("Retrieved {}", format_ms(ms, tz))),
            (None, true) => Some("Retrieved from agency feed".to_string()),
            (None, false) => None,
        };

        Self {
            title: record.name.clone(),
            status: record.status.label().to_string(),
            area: format!("{:.1} ha", record.area_hectares),
            containment,
            date_label,
            date: date_ms.map_or_else(|| NOT_AVAILABLE.to_string(), |ms| format_ms(ms, tz)),
            cause: record
                .cause
                .clone()
                .unwrap_or_else(|| NO_CAUSE_LABEL.to_string()),
            retrieved,
        }
    }
}

fn format_ms<Tz>(ms: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    DateTime::from_timestamp_millis(ms).map_or_else(
        || NOT_AVAILABLE.to_string(),
        |dt| dt.with_timezone(tz).format(DATE_FORMAT).to_string(),
    )
}
