//! Registry configuration.
//!
//! Fixed at construction: the issuer address, the record layout version
//! new records are written in, and whether an expiry must fall after the
//! issue time. Load from environment variables or a YAML file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use credreg_core::{Address, CoreError};
use credreg_record::RecordVersion;

/// Environment variable holding the issuer address (64 hex chars).
pub const ENV_ISSUER: &str = "CREDREG_ISSUER";
/// Environment variable selecting the record version (`v1` or `v2`).
pub const ENV_RECORD_VERSION: &str = "CREDREG_RECORD_VERSION";
/// Environment variable toggling the expiry ordering check.
pub const ENV_REQUIRE_FUTURE_EXPIRY: &str = "CREDREG_REQUIRE_FUTURE_EXPIRY";

/// Immutable configuration of one registry instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// The single authorized issuer.
    pub issuer: Address,
    /// Layout for newly issued records. `V2` requires an asset reference.
    pub record_version: RecordVersion,
    /// Reject `expires_at <= issued_at` at issue time.
    pub require_future_expiry: bool,
}

/// On-disk form. Mirrors the environment keys.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    issuer: String,
    #[serde(default)]
    record_version: RecordVersion,
    #[serde(default)]
    require_future_expiry: bool,
}

impl RegistryConfig {
    /// v1 records, permissive expiry.
    pub const fn new(issuer: Address) -> Self {
        Self {
            issuer,
            record_version: RecordVersion::V1,
            require_future_expiry: false,
        }
    }

    /// Set the record version.
    pub const fn with_record_version(mut self, version: RecordVersion) -> Self {
        self.record_version = version;
        self
    }

    /// Set the expiry ordering policy.
    pub const fn with_require_future_expiry(mut self, require: bool) -> Self {
        self.require_future_expiry = require;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CREDREG_ISSUER` (required)
    /// - `CREDREG_RECORD_VERSION` (default: `v1`)
    /// - `CREDREG_REQUIRE_FUTURE_EXPIRY` (default: `false`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let issuer_hex = lookup(ENV_ISSUER).ok_or(ConfigError::Missing(ENV_ISSUER))?;
        let issuer = parse_issuer(ENV_ISSUER, &issuer_hex)?;

        let record_version = match lookup(ENV_RECORD_VERSION) {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                key: ENV_RECORD_VERSION,
                reason,
            })?,
            None => RecordVersion::default(),
        };

        let require_future_expiry = match lookup(ENV_REQUIRE_FUTURE_EXPIRY) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::Invalid {
                key: ENV_REQUIRE_FUTURE_EXPIRY,
                reason: format!("expected true or false, got {raw:?}"),
            })?,
            None => false,
        };

        Ok(Self {
            issuer,
            record_version,
            require_future_expiry,
        })
    }

    /// Parse a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_yaml::from_str(text)?;
        Ok(Self {
            issuer: parse_issuer("issuer", &raw.issuer)?,
            record_version: raw.record_version,
            require_future_expiry: raw.require_future_expiry,
        })
    }

    /// Read and parse a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }
}

fn parse_issuer(key: &'static str, hex: &str) -> Result<Address, ConfigError> {
    Address::from_hex(hex.trim()).map_err(|e: CoreError| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Error while loading a [`RegistryConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required key was not set.
    #[error("{0} is required")]
    Missing(&'static str),

    /// A key was set to a value that does not parse.
    #[error("invalid value for {key}: {reason}")]
    Invalid {
        /// The offending key.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The configuration file could not be read.
    #[error("cannot read config file {}: {source}", path.display())]
    Io {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The configuration file is not a valid YAML document for this schema.
    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
