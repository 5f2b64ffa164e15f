#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Statistics result types for the fire summary panel.
//!
//! These are plain data: the aggregator fills them in and the display layer
//! renders them as-is.

use fire_map_fire_models::FireStatus;
use serde::{Deserialize, Serialize};

/// Record counts per status bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub out_of_control: u64,
    pub being_monitored: u64,
    pub contained: u64,
    pub under_control: u64,
    pub being_patrolled: u64,
    pub extinguished: u64,
    /// Records whose status key matched none of the known statuses.
    pub other: u64,
}

impl StatusCounts {
    /// Increments the bucket for `status`.
    pub const fn record(&mut self, status: FireStatus) {
        let bucket = match status {
            FireStatus::OutOfControl => &mut self.out_of_control,
            FireStatus::BeingMonitored => &mut self.being_monitored,
            FireStatus::Contained => &mut self.contained,
            FireStatus::UnderControl => &mut self.under_control,
            FireStatus::BeingPatrolled => &mut self.being_patrolled,
            FireStatus::Extinguished => &mut self.extinguished,
            FireStatus::Unrecognized => &mut self.other,
        };
        *bucket += 1;
    }

    /// Count for one status.
    #[must_use]
    pub const fn get(&self, status: FireStatus) -> u64 {
        match status {
            FireStatus::OutOfControl => self.out_of_control,
            FireStatus::BeingMonitored => self.being_monitored,
            FireStatus::Contained => self.contained,
            FireStatus::UnderControl => self.under_control,
            FireStatus::BeingPatrolled => self.being_patrolled,
            FireStatus::Extinguished => self.extinguished,
            FireStatus::Unrecognized => self.other,
        }
    }

    /// Sum over every bucket.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.out_of_control
            + self.being_monitored
            + self.contained
            + self.under_control
            + self.being_patrolled
            + self.extinguished
            + self.other
    }
}

/// Events falling on the reference zone's current and previous calendar
/// dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCounts {
    pub today: u64,
    pub yesterday: u64,
}

/// Aggregate statistics over the whole fire store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FireStatistics {
    /// Number of records.
    pub total: u64,
    /// Sum of burned area in hectares.
    pub total_area_hectares: f64,
    /// Counts per status bucket.
    pub by_status: StatusCounts,
    /// Records whose status is anything but extinguished.
    pub active: u64,
    /// Records whose status is extinguished.
    pub extinguished: u64,
    /// Detections today and yesterday.
    pub detected: DayCounts,
    /// Extinguishments today and yesterday.
    pub extinguished_on: DayCounts,
}

/// One cause label and how many fires carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CauseBucket {
    pub label: String,
    pub count: u64,
    /// Whether this bucket counts toward coverage.
    pub meaningful: bool,
}

/// Cause coverage across the fire store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CauseStatistics {
    /// Number of records considered.
    pub total: u64,
    /// Records with a known cause.
    pub meaningful: u64,
    /// Records whose cause mentions "unknown".
    pub unknown: u64,
    /// Records with no cause data at all.
    pub no_data: u64,
    /// `meaningful / total * 100`, or `0` for an empty store.
    pub coverage_percent: f64,
    /// Buckets ordered by descending count, then label.
    pub buckets: Vec<CauseBucket>,
}
