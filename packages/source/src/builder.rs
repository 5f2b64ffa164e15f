//! Builds canonical fire records from raw feed features.
//!
//! Each feature is normalized through the field extractor, the flexible
//! date parser, the cause cleaner, and the status classifier, then
//! registered in the [`FireStore`] by id.

use fire_map_fire_models::{FeedOrigin, FireRecord, LatLng, RawProperties};
use fire_map_store::FireStore;
use geojson::Feature;

use crate::cause::clean_cause;
use crate::classify::classify;
use crate::fields::{FireField, extract, value_as_f64, value_as_text};
use crate::parsing::parse_flexible_date;

/// Counts from building one feed into the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedBuildSummary {
    /// Records registered.
    pub built: usize,
    /// Features dropped for lacking point geometry or properties.
    pub skipped: usize,
    /// Registrations that replaced an existing id.
    pub overwritten: usize,
}

/// Normalizes one feature without touching any store.
///
/// Returns `None` when the feature has no point geometry or no properties.
/// `status_override` wins over the feature's own status, which wins over
/// the feed's default.
#[must_use]
pub fn normalize_feature(
    feature: &Feature,
    status_override: Option<&str>,
    origin: FeedOrigin,
) -> Option<FireRecord> {
    let location = point_location(feature)?;
    let props = feature.properties.as_ref()?;

    let status_text = status_override
        .map(str::to_string)
        .or_else(|| text_field(props, FireField::Status))
        .or_else(|| origin.default_status_text().map(str::to_string))
        .unwrap_or_default();
    let classification = classify(&status_text);

    let area_hectares = extract(props, FireField::Area)
        .and_then(|(_, v)| value_as_f64(v))
        .filter(|area| *area >= 0.0)
        .unwrap_or(0.0);

    let contained_pct = extract(props, FireField::Containment)
        .and_then(|(_, v)| value_as_f64(v))
        .map(|pct| pct.clamp(0.0, 100.0));

    let fetched = extract(props, FireField::FetchedAt);

    Some(FireRecord {
        id: text_field(props, FireField::Id).unwrap_or_else(|| FireRecord::UNKNOWN_ID.to_string()),
        name: text_field(props, FireField::Name).unwrap_or_else(|| FireRecord::UNNAMED.to_string()),
        status_key: classification.status_key,
        status: classification.status,
        severity: classification.severity,
        area_hectares,
        contained_pct,
        detected_at_ms: date_field(props, FireField::Detected),
        extinguished_at_ms: date_field(props, FireField::Extinguished),
        fetched_at_ms: fetched.and_then(|(_, v)| parse_flexible_date(v)),
        retrieved_live: fetched.is_some_and(|(_, v)| v != &serde_json::Value::Bool(false)),
        cause: clean_cause(text_field(props, FireField::Cause).as_deref()),
        location,
        origin,
        raw_props: props.clone(),
    })
}

/// Normalizes one feature and registers it in `store`.
///
/// Returns the registered record and whether it replaced an earlier record
/// with the same id.
pub fn build_record<'s>(
    store: &'s mut FireStore,
    feature: &Feature,
    status_override: Option<&str>,
    origin: FeedOrigin,
) -> Option<(&'s FireRecord, bool)> {
    let record = normalize_feature(feature, status_override, origin)?;
    let id = record.id.clone();
    let replaced = store.insert(record).is_some();
    store.get(&id).map(|record| (record, replaced))
}

/// Builds every feature of one feed into `store`.
pub fn build_feed(store: &mut FireStore, features: &[Feature], origin: FeedOrigin) -> FeedBuildSummary {
    let mut summary = FeedBuildSummary::default();
    for feature in features {
        match build_record(store, feature, None, origin) {
            Some((_, replaced)) => {
                summary.built += 1;
                if replaced {
                    summary.overwritten += 1;
                }
            }
            None => {
                log::debug!("Skipping {origin} feature without point geometry or properties");
                summary.skipped += 1;
            }
        }
    }
    summary
}

fn point_location(feature: &Feature) -> Option<LatLng> {
    let geometry = feature.geometry.as_ref()?;
    let geojson::Value::Point(position) = &geometry.value else {
        return None;
    };
    let lng = *position.first()?;
    let lat = *position.get(1)?;
    (lat.is_finite() && lng.is_finite()).then(|| LatLng::new(lat, lng))
}

fn text_field(props: &RawProperties, field: FireField) -> Option<String> {
    extract(props, field).and_then(|(_, v)| value_as_text(v))
}

fn date_field(props: &RawProperties, field: FireField) -> Option<i64> {
    let (key, value) = extract(props, field)?;
    let parsed = parse_flexible_date(value);
    if parsed.is_none() {
        log::debug!("Unparseable {field} date in {key}: {value}");
    }
    parsed
}
