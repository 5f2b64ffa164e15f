//! Compile-time default configuration.
//!
//! The default config is embedded via `include_str!` so the binary runs
//! without a config file. A user-supplied document replaces it wholesale.

use fire_map_source_models::{ConfigError, FireMapConfig};

/// Embedded default configuration document.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Parses the embedded default configuration.
///
/// # Errors
///
/// Returns [`ConfigError`] if the embedded document is invalid.
pub fn default_config() -> Result<FireMapConfig, ConfigError> {
    FireMapConfig::parse(DEFAULT_CONFIG_TOML)
}

/// Reads configuration from `toml_str` if given, otherwise the embedded
/// default.
///
/// # Errors
///
/// Returns [`ConfigError`] if the chosen document is invalid.
pub fn resolve_config(toml_str: Option<&str>) -> Result<FireMapConfig, ConfigError> {
    toml_str.map_or_else(default_config, FireMapConfig::parse)
}
