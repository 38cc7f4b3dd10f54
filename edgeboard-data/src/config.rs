//! Board configuration.

use crate::error::SourceError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default widget refresh period in seconds.
pub const DEFAULT_REFRESH_SECS: u64 = 30;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Runtime settings shared by every widget on a board.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Seconds between automatic refreshes
    pub refresh_interval_secs: u64,
    /// Rows per page in widget views
    pub page_size: usize,
    /// Base URL of the live record feed, if any
    pub source_url: Option<String>,
    /// Per-request timeout for the live feed
    pub request_timeout_secs: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: DEFAULT_REFRESH_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            source_url: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl BoardConfig {
    /// Create from environment variables.
    ///
    /// Reads, falling back to the defaults when unset or unparseable:
    /// - `EDGEBOARD_REFRESH_SECS` (default: 30)
    /// - `EDGEBOARD_PAGE_SIZE` (default: 100)
    /// - `EDGEBOARD_SOURCE_URL` (default: none)
    /// - `EDGEBOARD_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let refresh_interval_secs = lookup("EDGEBOARD_REFRESH_SECS")
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(defaults.refresh_interval_secs);

        let page_size = lookup("EDGEBOARD_PAGE_SIZE")
            .and_then(|v| v.parse().ok())
            .filter(|size| *size > 0)
            .unwrap_or(defaults.page_size);

        let source_url = lookup("EDGEBOARD_SOURCE_URL").filter(|url| !url.trim().is_empty());

        let request_timeout_secs = lookup("EDGEBOARD_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(defaults.request_timeout_secs);

        Self {
            refresh_interval_secs,
            page_size,
            source_url,
            request_timeout_secs,
        }
    }

    /// Decode from JSON, filling absent fields with defaults, then [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SourceError::Config(format!("invalid board config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject zero refresh period, page size or request timeout.
    pub fn validate(&self) -> Result<(), SourceError> {
        if self.refresh_interval_secs == 0 {
            return Err(SourceError::Config("refresh_interval_secs must be positive".into()));
        }
        if self.page_size == 0 {
            return Err(SourceError::Config("page_size must be positive".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(SourceError::Config("request_timeout_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
