//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `tile_cache_cap` or `prefetch_max_tiles` is 0
    /// - `prefetch_workers` is outside 1..=16
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `api_prefix` or `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_cache_cap == 0 {
            return Err(ConfigError::Invalid {
                field: "tile_cache_cap".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.prefetch_max_tiles == 0 {
            return Err(ConfigError::Invalid {
                field: "prefetch_max_tiles".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.prefetch_workers == 0 || self.prefetch_workers > 16 {
            return Err(ConfigError::Invalid {
                field: "prefetch_workers".into(),
                reason: "must be between 1 and 16".into(),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.api_prefix.is_empty() {
            return Err(ConfigError::Invalid { field: "api_prefix".into(), reason: "must not be empty".into() });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.tile_hosts.is_empty() {
            tracing::warn!("tile_hosts is empty; every tile request will fall through to the shell strategy");
        }

        Ok(())
    }
}
