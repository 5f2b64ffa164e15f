#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Feed locations and the TOML configuration schema for the fire map.
//!
//! A [`FireMapConfig`] names the two upstream fire feeds, the optional
//! auxiliary cause source, and the reference time zone used for
//! calendar-day statistics and popup dates.

use std::path::PathBuf;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Errors produced while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configured time zone is not a known IANA zone.
    #[error("Unknown time zone: {name}")]
    UnknownTimeZone {
        /// The zone name as written in the config.
        name: String,
    },
}

/// Where to read a JSON/`GeoJSON` document from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedLocation {
    /// Fetched over HTTP(S).
    Url {
        /// Absolute URL.
        url: String,
    },
    /// Read from the local filesystem (saved snapshots).
    Path {
        /// File path.
        path: PathBuf,
    },
}

impl std::fmt::Display for FeedLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url { url } => write!(f, "{url}"),
            Self::Path { path } => write!(f, "{}", path.display()),
        }
    }
}

/// The two upstream fire feeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedsConfig {
    /// Active fires feature collection.
    pub active: FeedLocation,
    /// Out/extinguished fires feature collection.
    pub out: FeedLocation,
}

/// Auxiliary source that supplies raw cause text per agency fire number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CauseSourceConfig {
    /// Where the cause document lives.
    pub location: FeedLocation,
    /// Record property whose value is the join key.
    #[serde(default = "default_join_field")]
    pub key_field: String,
    /// Field in the cause document holding the join key.
    #[serde(default = "default_join_field")]
    pub source_key_field: String,
    /// Field in the cause document holding the raw bilingual cause.
    #[serde(default = "default_cause_field")]
    pub cause_field: String,
}

fn default_join_field() -> String {
    "FIRE_NUMBER".to_string()
}

fn default_cause_field() -> String {
    "FIRE_CAUSE".to_string()
}

fn default_time_zone() -> String {
    "America/Moncton".to_string()
}

/// Top-level fire map configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireMapConfig {
    /// IANA zone that defines "today" and "yesterday".
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// Upstream fire feeds.
    pub feeds: FeedsConfig,
    /// Optional cause-join source.
    #[serde(default)]
    pub causes: Option<CauseSourceConfig>,
}

impl FireMapConfig {
    /// Parses a configuration document and validates its time zone.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is malformed, a required table is
    /// missing, or the time zone is unknown.
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::de::from_str(toml_str)?;
        config.tz()?;
        Ok(config)
    }

    /// Resolves [`Self::time_zone`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownTimeZone`] for names outside the IANA
    /// database.
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.time_zone
            .parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimeZone {
                name: self.time_zone.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [feeds.active]
        type = "url"
        url = "https://example.org/active.geojson"

        [feeds.out]
        type = "path"
        path = "snapshots/out.geojson"
    "#;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let config = FireMapConfig::parse(MINIMAL).unwrap();
        assert_eq!(config.time_zone, "America/Moncton");
        assert!(config.causes.is_none());
        assert_eq!(
            config.feeds.active,
            FeedLocation::Url {
                url: "https://example.org/active.geojson".to_string()
            }
        );
        assert_eq!(config.feeds.out.to_string(), "snapshots/out.geojson");
    }

    #[test]
    fn cause_source_fields_default() {
        let toml_str = format!(
            "{MINIMAL}\n[causes]\nlocation = {{ type = \"url\", url = \"https://example.org/c.json\" }}\n"
        );
        let config = FireMapConfig::parse(&toml_str).unwrap();
        let causes = config.causes.unwrap();
        assert_eq!(causes.key_field, "FIRE_NUMBER");
        assert_eq!(causes.source_key_field, "FIRE_NUMBER");
        assert_eq!(causes.cause_field, "FIRE_CAUSE");
    }

    #[test]
    fn rejects_unknown_time_zone() {
        let toml_str = format!("time_zone = \"Mars/Olympus\"\n{MINIMAL}");
        assert!(matches!(
            FireMapConfig::parse(&toml_str),
            Err(ConfigError::UnknownTimeZone { .. })
        ));
    }

    #[test]
    fn rejects_missing_feeds() {
        assert!(matches!(
            FireMapConfig::parse("time_zone = \"UTC\""),
            Err(ConfigError::Toml(_))
        ));
    }
}
