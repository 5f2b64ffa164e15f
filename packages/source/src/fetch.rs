//! Feed retrieval and document decoding.
//!
//! A [`FeedFetcher`] turns a [`FeedLocation`] into a JSON document. Feeds
//! are `GeoJSON` feature collections; the cause source is either a feature
//! collection or a plain array of objects.

use std::collections::BTreeMap;

use fire_map_source_models::FeedLocation;
use geojson::Feature;
use serde_json::Value;

use crate::SourceError;
use crate::fields::value_as_text;
use crate::retry;

/// Retrieves raw documents from feed locations.
#[async_trait::async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetches and parses the JSON document at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the document cannot be retrieved or is not
    /// JSON.
    async fn fetch_json(&self, location: &FeedLocation) -> Result<Value, SourceError>;

    /// Fetches the document at `location` and decodes its features.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the document cannot be retrieved or is
    /// neither a feature collection nor a single feature.
    async fn fetch_features(&self, location: &FeedLocation) -> Result<Vec<Feature>, SourceError> {
        let value = self.fetch_json(location).await?;
        features_from_json(value)
    }
}

/// Fetches URLs with `reqwest` and reads paths from disk.
#[derive(Debug, Clone)]
pub struct HttpFeedFetcher {
    client: reqwest::Client,
}

impl HttpFeedFetcher {
    /// Creates a fetcher with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the client cannot be built.
    pub fn new() -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fire-map/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch_json(&self, location: &FeedLocation) -> Result<Value, SourceError> {
        match location {
            FeedLocation::Url { url } => {
                log::debug!("Fetching {url}");
                retry::send_json(|| self.client.get(url)).await
            }
            FeedLocation::Path { path } => {
                log::debug!("Reading {}", path.display());
                let bytes = tokio::fs::read(path).await?;
                Ok(serde_json::from_slice(&bytes)?)
            }
        }
    }
}

/// Decodes the features of a `FeatureCollection` or a bare `Feature`.
///
/// Entries that do not decode as features are dropped individually so one
/// malformed feature does not discard the whole feed.
///
/// # Errors
///
/// Returns [`SourceError::Format`] if `value` is neither a feature
/// collection nor a feature.
pub fn features_from_json(value: Value) -> Result<Vec<Feature>, SourceError> {
    match value.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            let Some(Value::Array(entries)) = value.get("features") else {
                return Err(SourceError::Format {
                    message: "FeatureCollection has no features array".to_string(),
                });
            };
            Ok(entries
                .iter()
                .filter_map(|entry| match Feature::from_json_value(entry.clone()) {
                    Ok(feature) => Some(feature),
                    Err(e) => {
                        log::debug!("Dropping undecodable feature: {e}");
                        None
                    }
                })
                .collect())
        }
        Some("Feature") => Feature::from_json_value(value)
            .map(|feature| vec![feature])
            .map_err(|e| SourceError::Format {
                message: format!("invalid Feature: {e}"),
            }),
        other => Err(SourceError::Format {
            message: format!("expected FeatureCollection or Feature, found {other:?}"),
        }),
    }
}

/// Extracts `key -> raw cause` pairs from a cause document.
///
/// Accepts a feature collection (reading each feature's properties), a
/// plain array of objects, or an object wrapping either under `features`.
/// Entries missing the key or the cause are skipped. Duplicate keys keep the
/// last entry.
#[must_use]
pub fn cause_entries_from_json(
    value: &Value,
    source_key_field: &str,
    cause_field: &str,
) -> BTreeMap<String, String> {
    let entries: &[Value] = match value {
        Value::Array(entries) => entries.as_slice(),
        Value::Object(map) => match map.get("features") {
            Some(Value::Array(entries)) => entries.as_slice(),
            _ => &[],
        },
        _ => &[],
    };

    entries
        .iter()
        .filter_map(|entry| {
            let attrs = entry
                .get("properties")
                .filter(|props| props.is_object())
                .unwrap_or(entry);
            let key = attrs.get(source_key_field).and_then(value_as_text)?;
            let cause = attrs.get(cause_field).and_then(value_as_text)?;
            Some((key, cause))
        })
        .collect()
}
