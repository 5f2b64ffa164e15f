#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Fire feed ingestion and normalization.
//!
//! Raw features from the active and extinguished feeds carry inconsistent
//! field names and value formats. This crate locates fields by prioritized
//! candidate keys ([`fields`]), parses heterogeneous dates ([`parsing`]),
//! cleans bilingual cause text ([`cause`]), classifies status text
//! ([`classify`]), and composes all of it into canonical
//! [`fire_map_fire_models::FireRecord`]s registered in a
//! [`fire_map_store::FireStore`] ([`builder`], [`load`]).

pub mod builder;
pub mod cause;
pub mod classify;
pub mod fetch;
pub mod fields;
pub mod load;
pub mod parsing;
pub mod registry;
pub mod retry;

/// Errors that can occur while fetching or decoding feeds.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status.
        status: reqwest::StatusCode,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error reading a local snapshot.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document parsed as JSON but is not a usable feature collection.
    #[error("Format error: {message}")]
    Format {
        /// Description of what went wrong.
        message: String,
    },
}
