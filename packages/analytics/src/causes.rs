//! Cause coverage: how many fires have a known cause.
//!
//! Causes come from an auxiliary table joined on an agency fire number, not
//! from the fire feeds themselves. A lookup miss counts as no cause data.

use std::collections::BTreeMap;

use fire_map_analytics_models::{CauseBucket, CauseStatistics};
use fire_map_fire_models::FireRecord;
use fire_map_source::cause::{clean_cause, is_unknown_cause};
use fire_map_source::fields::value_as_text;
use fire_map_store::FireStore;
use fire_map_store::popup::NO_CAUSE_LABEL;

/// Resolves the raw cause text for a record.
pub trait CauseLookup {
    fn raw_cause(&self, record: &FireRecord) -> Option<&str>;
}

/// A `key -> raw cause` table joined on one record property.
#[derive(Debug, Clone, Default)]
pub struct CauseTable {
    key_field: String,
    causes: BTreeMap<String, String>,
}

impl CauseTable {
    /// `key_field` names the record property holding the join key. Records
    /// without it join on their id.
    #[must_use]
    pub fn new(key_field: impl Into<String>, causes: BTreeMap<String, String>) -> Self {
        Self {
            key_field: key_field.into(),
            causes,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.causes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.causes.is_empty()
    }

    fn join_key(&self, record: &FireRecord) -> String {
        record
            .raw_props
            .get(&self.key_field)
            .and_then(value_as_text)
            .unwrap_or_else(|| record.id.clone())
    }
}

impl CauseLookup for CauseTable {
    fn raw_cause(&self, record: &FireRecord) -> Option<&str> {
        self.causes.get(&self.join_key(record)).map(String::as_str)
    }
}

#[derive(Default)]
struct BucketTally {
    count: u64,
    meaningful: bool,
}

/// Buckets every record by its cleaned cause and computes coverage.
///
/// Causes mentioning "unknown" get their own bucket and, like records with
/// no cause data, do not count toward coverage.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_cause_statistics<L: CauseLookup + ?Sized>(
    store: &FireStore,
    lookup: &L,
) -> CauseStatistics {
    let mut stats = CauseStatistics::default();
    let mut tallies: BTreeMap<String, BucketTally> = BTreeMap::new();

    for record in store.records() {
        stats.total += 1;

        let (label, meaningful) = match clean_cause(lookup.raw_cause(record)) {
            None => {
                stats.no_data += 1;
                (NO_CAUSE_LABEL.to_string(), false)
            }
            Some(cause) if is_unknown_cause(&cause) => {
                stats.unknown += 1;
                (cause, false)
            }
            Some(cause) => {
                stats.meaningful += 1;
                (cause, true)
            }
        };

        let tally = tallies.entry(label).or_default();
        tally.count += 1;
        tally.meaningful = meaningful;
    }

    stats.coverage_percent = if stats.total == 0 {
        0.0
    } else {
        stats.meaningful as f64 * 100.0 / stats.total as f64
    };

    stats.buckets = tallies
        .into_iter()
        .map(|(label, tally)| CauseBucket {
            label,
            count: tally.count,
            meaningful: tally.meaningful,
        })
        .collect();
    stats
        .buckets
        .sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

    log::debug!(
        "Cause coverage {:.1}% ({} of {})",
        stats.coverage_percent,
        stats.meaningful,
        stats.total
    );
    stats
}
