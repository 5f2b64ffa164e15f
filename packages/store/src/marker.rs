//! Renderable marker handles.

use fire_map_fire_models::{FireRecord, FireStatus, LatLng};
use serde::Serialize;

/// What the map layer needs to draw one fire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FireMarker {
    pub id: String,
    pub position: LatLng,
    pub status: FireStatus,
    pub color: &'static str,
    pub severity: i8,
    pub is_out_fire: bool,
}

impl FireMarker {
    #[must_use]
    pub fn from_record(record: &FireRecord) -> Self {
        Self {
            id: record.id.clone(),
            position: record.location,
            status: record.status,
            color: record.status.color(),
            severity: record.severity,
            is_out_fire: record.is_out_fire(),
        }
    }
}

/// The most urgent status among `markers`. On equal severity the first
/// marker wins.
pub fn worst_status<'a>(markers: impl IntoIterator<Item = &'a FireMarker>) -> Option<FireStatus> {
    markers
        .into_iter()
        .fold(None::<&FireMarker>, |worst, marker| match worst {
            Some(w) if w.severity >= marker.severity => Some(w),
            _ => Some(marker),
        })
        .map(|marker| marker.status)
}

/// Color of a cluster: the color of its worst status.
pub fn cluster_color<'a>(markers: impl IntoIterator<Item = &'a FireMarker>) -> Option<&'static str> {
    worst_status(markers).map(FireStatus::color)
}
