//! Configuration loading for pagesync clients.
//!
//! Configuration is loaded from a TOML file:
//!
//! ```toml
//! [endpoint]
//! url = "https://example.com/api/foods"
//! timeout_secs = 10
//!
//! [paging]
//! limit = 10
//! order = "createdAt:desc"
//! ```

use pagesync_types::{OrderSpec, TypesError};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration for a pagesync client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Page endpoint configuration.
    #[serde(default)]
    pub endpoint: EndpointConfig,
    /// Pagination configuration.
    #[serde(default)]
    pub paging: PagingConfig,
}

/// Page endpoint configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// URL pages are requested from (default: http://localhost:8080/items).
    #[serde(default = "default_url")]
    pub url: String,
    /// Per-request timeout in seconds (default: 10).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Pagination configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Items per page (default: 10). Must be positive.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Initial ordering, `key` or `key:asc|desc` (default: createdAt:desc).
    #[serde(default)]
    pub order: OrderSpec,
}

// Default value functions
fn default_url() -> String {
    "http://localhost:8080/items".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_limit() -> u32 {
    10
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            order: OrderSpec::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails
    /// validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content, path.to_path_buf())
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, PathBuf::from("<string>"))
    }

    fn parse(content: &str, path: PathBuf) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ParseError { path, source: e })?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "endpoint.url",
                reason: "must not be empty".to_string(),
            });
        }
        if self.endpoint.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "endpoint.timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        self.page_limit().map_err(|e| ConfigError::Invalid {
            field: "paging.limit",
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Page size as a positive integer.
    pub fn page_limit(&self) -> Result<NonZeroU32, TypesError> {
        NonZeroU32::new(self.paging.limit).ok_or(TypesError::ZeroLimit)
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.endpoint.timeout_secs)
    }

    /// Set the page size.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.paging.limit = limit;
        self
    }

    /// Set the initial ordering.
    pub fn with_order(mut self, order: OrderSpec) -> Self {
        self.paging.order = order;
        self
    }

    /// Set the endpoint URL.
    pub fn with_url(mut self, url: &str) -> Self {
        self.endpoint.url = url.to_string();
        self
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
    /// A value is out of range.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Dotted name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}
