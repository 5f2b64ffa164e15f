#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Canonical fire record types and the status/severity vocabulary.
//!
//! Both upstream feeds (active fires and extinguished fires) are normalized
//! into [`FireRecord`] values. Every consumer (filtering, clustering,
//! statistics, popups) reads these records and never the raw feed
//! properties directly.

use std::str::FromStr as _;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Raw, untyped properties of an upstream feature.
pub type RawProperties = serde_json::Map<String, serde_json::Value>;

/// Canonical fire status.
///
/// The string form of each known variant is the normalized status key
/// (lowercase, trimmed) as it appears in the upstream `FIRE_STAT_DESC_E`
/// field.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
pub enum FireStatus {
    /// Fire is spreading and not contained.
    #[strum(serialize = "out of control")]
    OutOfControl,
    /// Fire is not spreading but is being watched.
    #[strum(serialize = "being monitored")]
    BeingMonitored,
    /// Fire is contained within control lines.
    #[strum(serialize = "contained")]
    Contained,
    /// Fire is under control.
    #[strum(serialize = "under control")]
    UnderControl,
    /// Crews are patrolling the perimeter.
    #[strum(serialize = "being patrolled")]
    BeingPatrolled,
    /// Fire is out.
    #[strum(serialize = "extinguished")]
    Extinguished,
    /// Status text that matched none of the known keys.
    #[strum(serialize = "unrecognized")]
    Unrecognized,
}

impl FireStatus {
    /// Severity of [`Self::Extinguished`] and of every unrecognized status.
    pub const LOWEST_SEVERITY: i8 = -1;

    /// Maps free-form status text to a status. Total: anything that is not
    /// one of the known keys after lowercasing and trimming is
    /// [`Self::Unrecognized`].
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::from_str(&normalize_status_key(text)).unwrap_or(Self::Unrecognized)
    }

    /// Ordinal urgency rank. Higher is more urgent.
    #[must_use]
    pub const fn severity(self) -> i8 {
        match self {
            Self::OutOfControl => 4,
            Self::BeingMonitored => 3,
            Self::Contained => 2,
            Self::UnderControl => 1,
            Self::BeingPatrolled => 0,
            Self::Extinguished | Self::Unrecognized => Self::LOWEST_SEVERITY,
        }
    }

    /// Marker color for this status.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::OutOfControl => "#d32f2f",
            Self::BeingMonitored => "#f57c00",
            Self::Contained => "#fbc02d",
            Self::UnderControl => "#388e3c",
            Self::BeingPatrolled => "#7b1fa2",
            Self::Extinguished => "#1976d2",
            Self::Unrecognized => "#757575",
        }
    }

    /// Human-readable label for popups and legends.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OutOfControl => "Out of Control",
            Self::BeingMonitored => "Being Monitored",
            Self::Contained => "Contained",
            Self::UnderControl => "Under Control",
            Self::BeingPatrolled => "Being Patrolled",
            Self::Extinguished => "Extinguished",
            Self::Unrecognized => "Unknown",
        }
    }

    /// The six statuses that carry their own filter toggle and statistics
    /// bucket.
    #[must_use]
    pub const fn known() -> &'static [Self] {
        &[
            Self::OutOfControl,
            Self::BeingMonitored,
            Self::Contained,
            Self::UnderControl,
            Self::BeingPatrolled,
            Self::Extinguished,
        ]
    }
}

/// Lowercases and trims a status string.
#[must_use]
pub fn normalize_status_key(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Result of classifying a status string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Normalized status text (may be outside the known vocabulary).
    pub status_key: String,
    /// Status resolved from [`Self::status_key`].
    pub status: FireStatus,
    /// Display color.
    pub color: &'static str,
    /// Ordinal urgency rank.
    pub severity: i8,
}

/// Which upstream feed a record came from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FeedOrigin {
    /// The active fires feed.
    Active,
    /// The out/extinguished fires feed.
    Extinguished,
}

impl FeedOrigin {
    /// Status text assumed when a feature from this feed has none.
    #[must_use]
    pub const fn default_status_text(self) -> Option<&'static str> {
        match self {
            Self::Active => None,
            Self::Extinguished => Some("Extinguished"),
        }
    }
}

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A fire normalized from either upstream feed.
///
/// Records are built once per load pass and are read-only afterwards; a
/// later load replaces a record with the same [`Self::id`] wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FireRecord {
    /// Identifier from the first present id field, or `"unknown"`.
    pub id: String,
    /// Fire name, or `"Unnamed Fire"`.
    pub name: String,
    /// Normalized status text.
    pub status_key: String,
    /// Status resolved from [`Self::status_key`].
    pub status: FireStatus,
    /// Always `status.severity()`.
    pub severity: i8,
    /// Burned area. Zero when absent or unparseable.
    pub area_hectares: f64,
    /// Containment percentage clamped to `0..=100`.
    pub contained_pct: Option<f64>,
    /// Detection time in epoch milliseconds.
    pub detected_at_ms: Option<i64>,
    /// Extinguish time in epoch milliseconds.
    pub extinguished_at_ms: Option<i64>,
    /// When the upstream agency data was retrieved, in epoch milliseconds.
    pub fetched_at_ms: Option<i64>,
    /// Whether any retrieval marker was present on the feature.
    pub retrieved_live: bool,
    /// Cleaned English cause.
    pub cause: Option<String>,
    /// Marker position.
    pub location: LatLng,
    /// Which feed produced this record.
    pub origin: FeedOrigin,
    /// Original feature properties.
    pub raw_props: RawProperties,
}

impl FireRecord {
    /// Id used when none of the id fields is present.
    pub const UNKNOWN_ID: &'static str = "unknown";

    /// Name used when none of the name fields is present.
    pub const UNNAMED: &'static str = "Unnamed Fire";

    /// Creates a record with the given identity and status and every
    /// optional attribute empty.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        status_text: &str,
        location: LatLng,
        origin: FeedOrigin,
    ) -> Self {
        let status = FireStatus::from_text(status_text);
        Self {
            id: id.into(),
            name: Self::UNNAMED.to_string(),
            status_key: normalize_status_key(status_text),
            status,
            severity: status.severity(),
            area_hectares: 0.0,
            contained_pct: None,
            detected_at_ms: None,
            extinguished_at_ms: None,
            fetched_at_ms: None,
            retrieved_live: false,
            cause: None,
            location,
            origin,
            raw_props: RawProperties::new(),
        }
    }

    /// Whether this record came from the extinguished feed, regardless of
    /// the status it reports.
    #[must_use]
    pub fn is_out_fire(&self) -> bool {
        self.origin == FeedOrigin::Extinguished
    }

    /// Whether this record counts as extinguished for filtering. Out-feed
    /// records are always gated by the extinguished toggle.
    #[must_use]
    pub fn is_extinguished_class(&self) -> bool {
        self.status == FireStatus::Extinguished || self.is_out_fire()
    }
}
