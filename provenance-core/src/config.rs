//! Store configuration
//!
//! Configuration can be built in code, read from the environment, or loaded
//! from a TOML file. Every field has a default so a bare `[store]`-less file
//! (or no file at all) is valid.

use crate::{ConfigError, ProvenanceResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of events preallocated in the log.
pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;

/// Tuning knobs for an event store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Events to preallocate in the log and id index
    pub initial_capacity: usize,
    /// Maximum number of events returned by a lineage walk (None = unbounded)
    pub lineage_depth_limit: Option<usize>,
    /// Indent exported archives
    pub export_pretty: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            lineage_depth_limit: None,
            export_pretty: false,
        }
    }
}

impl StoreConfig {
    /// Create config from environment variables with defaults.
    ///
    /// Environment variables:
    /// - `PROVENANCE_INITIAL_CAPACITY`: Events to preallocate (default: 1024)
    /// - `PROVENANCE_LINEAGE_DEPTH_LIMIT`: Lineage walk limit (default: unbounded)
    /// - `PROVENANCE_EXPORT_PRETTY`: Indent exported archives (default: false)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            initial_capacity: lookup("PROVENANCE_INITIAL_CAPACITY")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.initial_capacity),
            lineage_depth_limit: lookup("PROVENANCE_LINEAGE_DEPTH_LIMIT")
                .and_then(|s| s.parse().ok())
                .or(defaults.lineage_depth_limit),
            export_pretty: lookup("PROVENANCE_EXPORT_PRETTY")
                .and_then(|s| parse_flag(&s))
                .unwrap_or(defaults.export_pretty),
        }
    }

    /// Parse config from a TOML document.
    pub fn from_toml_str(contents: &str) -> ProvenanceResult<Self> {
        let config: StoreConfig =
            toml::from_str(contents).map_err(|e| ConfigError::ParseFailed {
                reason: e.to_string(),
            })?;
        Ok(config)
    }

    /// Load config from a TOML file.
    pub fn from_path(path: &Path) -> ProvenanceResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Validate the configuration.
    ///
    /// Validates:
    /// - lineage_depth_limit >= 1 when set
    pub fn validate(&self) -> ProvenanceResult<()> {
        if let Some(limit) = self.lineage_depth_limit {
            if limit == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "lineage_depth_limit".to_string(),
                    value: limit.to_string(),
                    reason: "lineage_depth_limit must be at least 1".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
