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

const MIN_TIMEOUT_MS: u64 = 100;
const MAX_TIMEOUT_MS: u64 = 300_000;

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - any timeout is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `max_concurrency`, `max_emails_per_site` or `site_limit` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must not exceed 50MB".into() });
        }

        for (field, value) in [
            ("timeout_ms", self.timeout_ms),
            ("liveness_timeout_ms", self.liveness_timeout_ms),
            ("backlink_timeout_ms", self.backlink_timeout_ms),
            ("analyze_timeout_ms", self.analyze_timeout_ms),
            ("contact_timeout_ms", self.contact_timeout_ms),
            ("llm_timeout_ms", self.llm_timeout_ms),
        ] {
            if value < MIN_TIMEOUT_MS {
                return Err(ConfigError::Invalid { field: field.into(), reason: "must be at least 100ms".into() });
            }
            if value > MAX_TIMEOUT_MS {
                return Err(ConfigError::Invalid {
                    field: field.into(),
                    reason: "must not exceed 5 minutes (300000ms)".into(),
                });
            }
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        for (field, value) in [
            ("max_concurrency", self.max_concurrency),
            ("max_emails_per_site", self.max_emails_per_site),
            ("site_limit", self.site_limit),
            ("max_suggested_sites", self.max_suggested_sites),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid { field: field.into(), reason: "must be at least 1".into() });
            }
        }

        if self.cache_ttl_secs <= 0 {
            return Err(ConfigError::Invalid { field: "cache_ttl_secs".into(), reason: "must be positive".into() });
        }

        if self.analyze_fallback && self.llm_api_key.is_none() {
            tracing::warn!("analyze_fallback is enabled without llm_api_key; analyze will always serve the fallback");
        }

        Ok(())
    }
}
