//! Datafeed configuration.

use std::env;
use std::path::PathBuf;

use serde::Deserialize;

use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::ValidationError;

/// Install location used when nothing else is configured.
pub const DEFAULT_APP_PATH: &str = "D:/MCTrader14/APPs";

pub const APP_PATH_ENV: &str = "MCFEED_APP_PATH";
pub const CACHE_CAPACITY_ENV: &str = "MCFEED_CACHE_CAPACITY";

/// Configuration for [`McDatafeed`](crate::McDatafeed).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatafeedConfig {
    /// Quote terminal installation directory passed to `connect`.
    pub app_path: PathBuf,
    /// Upper bound on cached symbol translations; zero disables the cache.
    pub cache_capacity: usize,
}

impl Default for DatafeedConfig {
    fn default() -> Self {
        Self {
            app_path: resolve_app_path(),
            cache_capacity: resolve_cache_capacity(),
        }
    }
}

impl DatafeedConfig {
    pub fn new(app_path: impl Into<PathBuf>) -> Self {
        Self {
            app_path: app_path.into(),
            ..Self::default()
        }
    }

    pub fn with_cache_capacity(mut self, cache_capacity: usize) -> Self {
        self.cache_capacity = cache_capacity;
        self
    }

    /// Parse a JSON document; missing fields fall back to the defaults.
    pub fn from_json_str(input: &str) -> Result<Self, ValidationError> {
        let config: Self =
            serde_json::from_str(input).map_err(|error| ValidationError::InvalidConfig {
                reason: error.to_string(),
            })?;

        if config.app_path.as_os_str().is_empty() {
            return Err(ValidationError::InvalidConfig {
                reason: String::from("app_path cannot be empty"),
            });
        }

        Ok(config)
    }
}

fn resolve_app_path() -> PathBuf {
    if let Some(path) = env::var_os(APP_PATH_ENV) {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    PathBuf::from(DEFAULT_APP_PATH)
}

fn resolve_cache_capacity() -> usize {
    env::var(CACHE_CAPACITY_ENV)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(DEFAULT_CACHE_CAPACITY)
}
