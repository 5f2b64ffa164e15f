//! Status text classification.
//!
//! Maps free-form `FIRE_STAT_DESC_E` text to the canonical
//! [`FireStatus`] vocabulary with its color and severity rank. Unknown
//! text collapses to the lowest rank, the same as extinguished.

use fire_map_fire_models::{Classification, FireStatus, normalize_status_key};

/// Classifies status text. Total over all inputs.
#[must_use]
pub fn classify(status_text: &str) -> Classification {
    let status_key = normalize_status_key(status_text);
    let status = FireStatus::from_text(&status_key);
    if status == FireStatus::Unrecognized && !status_key.is_empty() {
        log::debug!("Unrecognized fire status {status_key:?}");
    }
    Classification {
        status,
        color: status.color(),
        severity: status.severity(),
        status_key,
    }
}
