//! Status filtering and the clustering surface it drives.
//!
//! [`apply_filter`] clears the surface and re-adds exactly the markers whose
//! status key is enabled. Every record from the extinguished feed, and every
//! record reporting `extinguished`, is gated by the single
//! [`FireStatus::Extinguished`] toggle.

use std::collections::{BTreeMap, BTreeSet};

use fire_map_fire_models::{FireRecord, FireStatus, normalize_status_key};

use crate::FireStore;
use crate::marker::{FireMarker, cluster_color};

/// The map widget's clustering layer.
pub trait ClusterSurface {
    /// Removes every marker from the surface.
    fn clear_layers(&mut self);

    /// Adds markers to the surface. Insertion order carries no meaning.
    fn add_layers(&mut self, markers: Vec<FireMarker>);
}

/// User-selected status toggles, held as normalized status keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusFilter {
    enabled: BTreeSet<String>,
}

impl StatusFilter {
    #[must_use]
    pub fn new(enabled: impl IntoIterator<Item = FireStatus>) -> Self {
        Self {
            enabled: enabled
                .into_iter()
                .map(|status| status.as_ref().to_string())
                .collect(),
        }
    }

    /// Every known status enabled.
    #[must_use]
    pub fn all() -> Self {
        Self::new(FireStatus::known().iter().copied())
    }

    /// Builds a filter from status keys such as `"out of control"`.
    /// Keys are normalized the same way record statuses are. Keys outside
    /// the known vocabulary match only records carrying that exact key.
    #[must_use]
    pub fn from_keys<S: AsRef<str>>(keys: &[S]) -> Self {
        Self {
            enabled: keys
                .iter()
                .map(|key| normalize_status_key(key.as_ref()))
                .collect(),
        }
    }

    #[must_use]
    pub fn is_enabled(&self, status: FireStatus) -> bool {
        self.enabled.contains(status.as_ref())
    }

    /// Whether a record's marker should be visible.
    #[must_use]
    pub fn allows(&self, record: &FireRecord) -> bool {
        if record.is_extinguished_class() {
            self.is_enabled(FireStatus::Extinguished)
        } else if record.status == FireStatus::Unrecognized {
            self.enabled.contains(&record.status_key)
        } else {
            self.is_enabled(record.status)
        }
    }
}

/// Replaces the surface's contents with the markers `filter` allows.
/// Returns the number of visible markers.
pub fn apply_filter<S: ClusterSurface + ?Sized>(
    store: &FireStore,
    surface: &mut S,
    filter: &StatusFilter,
) -> usize {
    let visible: Vec<FireMarker> = store
        .records()
        .filter(|record| filter.allows(record))
        .filter_map(|record| store.marker(&record.id).cloned())
        .collect();
    let count = visible.len();

    surface.clear_layers();
    surface.add_layers(visible);

    log::debug!("Filter applied: {count}/{} markers visible", store.len());
    count
}

/// A [`ClusterSurface`] that keeps its markers in memory, keyed by id.
#[derive(Debug, Default)]
pub struct MarkerLayer {
    markers: BTreeMap<String, FireMarker>,
}

impl MarkerLayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of the visible markers in id order.
    #[must_use]
    pub fn visible_ids(&self) -> Vec<&str> {
        self.markers.keys().map(String::as_str).collect()
    }

    pub fn markers(&self) -> impl Iterator<Item = &FireMarker> {
        self.markers.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Color of the layer as one cluster.
    #[must_use]
    pub fn color(&self) -> Option<&'static str> {
        cluster_color(self.markers.values())
    }
}

impl ClusterSurface for MarkerLayer {
    fn clear_layers(&mut self) {
        self.markers.clear();
    }

    fn add_layers(&mut self, markers: Vec<FireMarker>) {
        self.markers
            .extend(markers.into_iter().map(|marker| (marker.id.clone(), marker)));
    }
}

#[cfg(test)]
mod tests {
    use fire_map_fire_models::{FeedOrigin, LatLng};

    use super::*;

    fn store() -> FireStore {
        let mut store = FireStore::new();
        for (id, status, origin) in [
            ("A", "Out of Control", FeedOrigin::Active),
            ("B", "Contained", FeedOrigin::Active),
            ("C", "Extinguished", FeedOrigin::Active),
            ("D", "Extinguished", FeedOrigin::Extinguished),
            ("E", "Being Patrolled", FeedOrigin::Extinguished),
            ("F", "smouldering", FeedOrigin::Active),
            ("G", "Burning", FeedOrigin::Active),
        ] {
            store.insert(FireRecord::new(id, status, LatLng::new(46.0, -66.0), origin));
        }
        store
    }

    #[test]
    fn shows_only_enabled_statuses() {
        let store = store();
        let mut layer = MarkerLayer::new();
        let count = apply_filter(&store, &mut layer, &StatusFilter::from_keys(&["out of control"]));
        assert_eq!(count, 1);
        assert_eq!(layer.visible_ids(), vec!["A"]);
        assert_eq!(layer.color(), Some(FireStatus::OutOfControl.color()));
    }

    #[test]
    fn idempotent() {
        let store = store();
        let filter = StatusFilter::from_keys(&["out of control"]);
        let mut once = MarkerLayer::new();
        apply_filter(&store, &mut once, &filter);

        let mut twice = MarkerLayer::new();
        apply_filter(&store, &mut twice, &filter);
        apply_filter(&store, &mut twice, &filter);

        assert_eq!(once.visible_ids(), twice.visible_ids());
    }

    #[test]
    fn extinguished_toggle_gates_both_feeds() {
        let store = store();
        let mut layer = MarkerLayer::new();

        apply_filter(&store, &mut layer, &StatusFilter::new([FireStatus::Extinguished]));
        assert_eq!(layer.visible_ids(), vec!["C", "D", "E"]);

        apply_filter(&store, &mut layer, &StatusFilter::new([FireStatus::BeingPatrolled]));
        assert!(layer.is_empty());
    }

    #[test]
    fn narrowing_the_filter_removes_markers() {
        let store = store();
        let mut layer = MarkerLayer::new();
        apply_filter(&store, &mut layer, &StatusFilter::all());
        assert_eq!(layer.len(), 5);

        apply_filter(&store, &mut layer, &StatusFilter::from_keys(&["Contained"]));
        assert_eq!(layer.visible_ids(), vec!["B"]);
    }

    #[test]
    fn unrecognized_status_matches_its_own_key() {
        let store = store();
        let mut layer = MarkerLayer::new();
        apply_filter(&store, &mut layer, &StatusFilter::from_keys(&["  Smouldering"]));
        assert_eq!(layer.visible_ids(), vec!["F"]);

        apply_filter(&store, &mut layer, &StatusFilter::from_keys(&["burning", "contained"]));
        assert_eq!(layer.visible_ids(), vec!["B", "G"]);
    }

    #[test]
    fn misspelled_key_shows_nothing() {
        let store = store();
        let mut layer = MarkerLayer::new();
        let count = apply_filter(&store, &mut layer, &StatusFilter::from_keys(&["being patroled"]));
        assert_eq!(count, 0);
        assert!(layer.is_empty());
    }
}
