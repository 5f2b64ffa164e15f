#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory fire record repository.
//!
//! A [`FireStore`] is constructed once per session and handed by reference
//! to every consumer. The record builder is its only writer; filtering,
//! clustering, statistics, and popups read from it. Records are keyed by
//! id and a later insert with the same id replaces the earlier record.

pub mod cluster;
pub mod marker;
pub mod popup;

use std::collections::{BTreeMap, BTreeSet};

use fire_map_fire_models::{FireRecord, FireStatus, LatLng};
use geo::{Distance as _, Haversine, Point};

use crate::marker::FireMarker;

/// A stored record together with its renderable marker.
#[derive(Debug, Clone, PartialEq)]
pub struct FireEntry {
    pub record: FireRecord,
    pub marker: FireMarker,
}

/// A record returned by [`FireStore::within_radius`].
#[derive(Debug, Clone, Copy)]
pub struct NearbyFire<'a> {
    pub record: &'a FireRecord,
    /// Great-circle distance from the query point.
    pub distance_km: f64,
}

/// Keyed registry of canonical fire records.
#[derive(Debug, Default)]
pub struct FireStore {
    entries: BTreeMap<String, FireEntry>,
}

impl FireStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `record`, replacing and returning any record with the same
    /// id.
    ///
    /// Only the record builder should call this; every other consumer
    /// treats the store as read-only.
    pub fn insert(&mut self, record: FireRecord) -> Option<FireRecord> {
        let marker = FireMarker::from_record(&record);
        let id = record.id.clone();
        let previous = self
            .entries
            .insert(id, FireEntry { record, marker })
            .map(|entry| entry.record);
        if let Some(previous) = &previous {
            log::debug!("Replaced fire record {}", previous.id);
        }
        previous
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FireRecord> {
        self.entries.get(id).map(|entry| &entry.record)
    }

    /// Looks up the marker for a record id.
    #[must_use]
    pub fn marker(&self, id: &str) -> Option<&FireMarker> {
        self.entries.get(id).map(|entry| &entry.marker)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every record. Explicit reset only; loads overwrite by id.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// All records in id order.
    pub fn records(&self) -> impl Iterator<Item = &FireRecord> {
        self.entries.values().map(|entry| &entry.record)
    }

    /// All markers in id order.
    pub fn markers(&self) -> impl Iterator<Item = &FireMarker> {
        self.entries.values().map(|entry| &entry.marker)
    }

    /// Records whose status is in `statuses`.
    #[must_use]
    pub fn with_statuses(&self, statuses: &BTreeSet<FireStatus>) -> Vec<&FireRecord> {
        self.records()
            .filter(|record| statuses.contains(&record.status))
            .collect()
    }

    /// Records ordered most urgent first, ties broken by id.
    #[must_use]
    pub fn by_severity(&self) -> Vec<&FireRecord> {
        let mut records: Vec<&FireRecord> = self.records().collect();
        records.sort_by(|a, b| b.severity.cmp(&a.severity).then_with(|| a.id.cmp(&b.id)));
        records
    }

    /// Records within `radius_km` of `center`, nearest first.
    #[must_use]
    pub fn within_radius(&self, center: LatLng, radius_km: f64) -> Vec<NearbyFire<'_>> {
        let origin = to_point(center);
        let mut nearby: Vec<NearbyFire<'_>> = self
            .records()
            .map(|record| NearbyFire {
                record,
                distance_km: Haversine.distance(origin, to_point(record.location)) / 1000.0,
            })
            .filter(|fire| fire.distance_km <= radius_km)
            .collect();
        nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        nearby
    }
}

fn to_point(location: LatLng) -> Point<f64> {
    Point::new(location.lng, location.lat)
}
