//! The load pass: fetch both feeds, then rebuild records in the store.
//!
//! Both feeds are fetched concurrently and fully decoded before the first
//! record is written, so a failed fetch leaves the store exactly as it was.

use std::collections::BTreeMap;

use fire_map_fire_models::FeedOrigin;
use fire_map_source_models::{CauseSourceConfig, FireMapConfig};
use fire_map_store::FireStore;
use geojson::Feature;

use crate::SourceError;
use crate::builder::{FeedBuildSummary, build_feed};
use crate::fetch::{FeedFetcher, cause_entries_from_json};

/// Outcome of one load pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Records built from the active feed.
    pub active: usize,
    /// Records built from the out feed.
    pub out: usize,
    /// Features skipped for lacking point geometry or properties.
    pub skipped: usize,
    /// Registrations that replaced a record with the same id, whether from
    /// this pass or an earlier one.
    pub overwritten: usize,
}

impl LoadSummary {
    fn from_feeds(active: FeedBuildSummary, out: FeedBuildSummary) -> Self {
        Self {
            active: active.built,
            out: out.built,
            skipped: active.skipped + out.skipped,
            overwritten: active.overwritten + out.overwritten,
        }
    }
}

/// Fetches both fire feeds and registers every usable feature in `store`.
///
/// Active features are built first, then out features, so an out record
/// replaces an active record with the same id.
///
/// # Errors
///
/// Returns [`SourceError`] if either feed cannot be fetched or decoded. The
/// store is not modified in that case.
pub async fn load_fires<F: FeedFetcher + ?Sized>(
    fetcher: &F,
    config: &FireMapConfig,
    store: &mut FireStore,
) -> Result<LoadSummary, SourceError> {
    let (active, out) = tokio::join!(
        fetcher.fetch_features(&config.feeds.active),
        fetcher.fetch_features(&config.feeds.out),
    );
    Ok(apply_feeds(store, &active?, &out?))
}

/// Runs [`load_fires`] and the cause-source fetch concurrently.
///
/// Returns the raw `key -> cause` table alongside the load summary. The
/// table is empty when no cause source is configured or its fetch fails.
///
/// # Errors
///
/// Returns [`SourceError`] if either fire feed fails. A cause-source failure
/// is logged and never fails the pass.
pub async fn load_fires_with_causes<F: FeedFetcher + ?Sized>(
    fetcher: &F,
    config: &FireMapConfig,
    store: &mut FireStore,
) -> Result<(LoadSummary, BTreeMap<String, String>), SourceError> {
    let (active, out, causes) = tokio::join!(
        fetcher.fetch_features(&config.feeds.active),
        fetcher.fetch_features(&config.feeds.out),
        load_cause_table(fetcher, config.causes.as_ref()),
    );
    Ok((apply_feeds(store, &active?, &out?), causes))
}

/// Fetches the auxiliary cause source into a `key -> raw cause` table.
///
/// Any failure degrades to an empty table; every record then has no cause
/// data.
pub async fn load_cause_table<F: FeedFetcher + ?Sized>(
    fetcher: &F,
    source: Option<&CauseSourceConfig>,
) -> BTreeMap<String, String> {
    let Some(source) = source else {
        return BTreeMap::new();
    };

    match fetcher.fetch_json(&source.location).await {
        Ok(value) => {
            let table =
                cause_entries_from_json(&value, &source.source_key_field, &source.cause_field);
            log::info!("Loaded {} cause entries from {}", table.len(), source.location);
            table
        }
        Err(e) => {
            log::warn!("Cause source {} unavailable: {e}", source.location);
            BTreeMap::new()
        }
    }
}

fn apply_feeds(store: &mut FireStore, active: &[Feature], out: &[Feature]) -> LoadSummary {
    let summary = LoadSummary::from_feeds(
        build_feed(store, active, FeedOrigin::Active),
        build_feed(store, out, FeedOrigin::Extinguished),
    );
    log::info!(
        "Loaded {} active and {} out fires ({} skipped, {} overwritten), {} in store",
        summary.active,
        summary.out,
        summary.skipped,
        summary.overwritten,
        store.len(),
    );
    summary
}

#[cfg(test)]
mod tests {
    use fire_map_fire_models::FireStatus;
    use fire_map_source_models::{FeedLocation, FeedsConfig};
    use serde_json::{Value, json};

    use super::*;

    /// Serves documents from memory, keyed by location display string.
    struct CannedFetcher {
        documents: BTreeMap<String, Value>,
    }

    impl CannedFetcher {
        fn new(documents: impl IntoIterator<Item = (&'static str, Value)>) -> Self {
            Self {
                documents: documents
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
            }
        }
    }

    #[async_trait::async_trait]
    impl FeedFetcher for CannedFetcher {
        async fn fetch_json(&self, location: &FeedLocation) -> Result<Value, SourceError> {
            self.documents
                .get(&location.to_string())
                .cloned()
                .ok_or_else(|| {
                    SourceError::Io(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        location.to_string(),
                    ))
                })
        }
    }

    fn url(url: &str) -> FeedLocation {
        FeedLocation::Url {
            url: url.to_string(),
        }
    }

    fn config(causes: Option<CauseSourceConfig>) -> FireMapConfig {
        FireMapConfig {
            time_zone: "America/Moncton".to_string(),
            feeds: FeedsConfig {
                active: url("mem://active"),
                out: url("mem://out"),
            },
            causes,
        }
    }

    fn collection(features: Value) -> Value {
        json!({"type": "FeatureCollection", "features": features})
    }

    fn point(props: Value) -> Value {
        json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [-66.5, 46.5]},
            "properties": props,
        })
    }

    fn scenario() -> CannedFetcher {
        CannedFetcher::new([
            (
                "mem://active",
                collection(json!([point(json!({
                    "FIRE_ID": "F1",
                    "FIRE_STAT_DESC_E": "Out of Control",
                    "FIRE_SIZE": 42.5,
                    "PCT_CONTAINED": "10%",
                    "FIRE_NUMBER": "101",
                }))])),
            ),
            (
                "mem://out",
                collection(json!([
                    point(json!({"FIRE_ID": "F2"})),
                    {"type": "Feature", "geometry": null, "properties": {"FIRE_ID": "F3"}},
                ])),
            ),
            (
                "mem://causes",
                json!([{"FIRE_NUMBER": "101", "FIRE_CAUSE": "Lightning / Foudre"}]),
            ),
        ])
    }

    #[tokio::test]
    async fn end_to_end_load() {
        let mut store = FireStore::new();
        let summary = load_fires(&scenario(), &config(None), &mut store)
            .await
            .unwrap();

        assert_eq!(
            summary,
            LoadSummary {
                active: 1,
                out: 1,
                skipped: 1,
                overwritten: 0
            }
        );
        assert_eq!(store.len(), 2);

        let f1 = store.get("F1").unwrap();
        assert_eq!(f1.severity, 4);
        assert!((f1.area_hectares - 42.5).abs() < f64::EPSILON);
        assert_eq!(f1.contained_pct, Some(10.0));

        let f2 = store.get("F2").unwrap();
        assert_eq!(f2.severity, -1);
        assert_eq!(f2.status, FireStatus::Extinguished);
        assert!(f2.is_out_fire());
    }

    #[tokio::test]
    async fn failed_feed_leaves_store_untouched() {
        let mut store = FireStore::new();
        load_fires(&scenario(), &config(None), &mut store)
            .await
            .unwrap();

        let broken = CannedFetcher::new([(
            "mem://active",
            collection(json!([point(json!({"FIRE_ID": "NEW"}))])),
        )]);
        let result = load_fires(&broken, &config(None), &mut store).await;

        assert!(matches!(result, Err(SourceError::Io(_))));
        assert_eq!(store.len(), 2);
        assert!(store.get("NEW").is_none());
    }

    #[tokio::test]
    async fn reload_overwrites_by_id() {
        let fetcher = scenario();
        let mut store = FireStore::new();
        load_fires(&fetcher, &config(None), &mut store).await.unwrap();
        let summary = load_fires(&fetcher, &config(None), &mut store).await.unwrap();
        assert_eq!(summary.overwritten, 2);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn loads_cause_table_alongside_feeds() {
        let causes = CauseSourceConfig {
            location: url("mem://causes"),
            key_field: "FIRE_NUMBER".to_string(),
            source_key_field: "FIRE_NUMBER".to_string(),
            cause_field: "FIRE_CAUSE".to_string(),
        };
        let mut store = FireStore::new();
        let (summary, table) =
            load_fires_with_causes(&scenario(), &config(Some(causes)), &mut store)
                .await
                .unwrap();
        assert_eq!(summary.active, 1);
        assert_eq!(table.get("101").map(String::as_str), Some("Lightning / Foudre"));
    }

    #[tokio::test]
    async fn missing_cause_source_degrades_to_empty() {
        let causes = CauseSourceConfig {
            location: url("mem://nowhere"),
            key_field: "FIRE_NUMBER".to_string(),
            source_key_field: "FIRE_NUMBER".to_string(),
            cause_field: "FIRE_CAUSE".to_string(),
        };
        let table = load_cause_table(&scenario(), Some(&causes)).await;
        assert!(table.is_empty());
        assert!(load_cause_table(&scenario(), None).await.is_empty());
    }
}
