//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (LEADSCOUT_*)
//! 2. TOML config file (if LEADSCOUT_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Desktop browser identity sent with every outbound request.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (LEADSCOUT_*)
/// 2. TOML config file (if LEADSCOUT_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP API binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Attach a permissive CORS layer to the router.
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Path to the SQLite database holding the response cache and leads.
    ///
    /// Set via LEADSCOUT_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for outbound HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Accept-Language header for outbound HTTP requests.
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Maximum bytes to read per response body.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Default transport timeout in milliseconds (search queries, single-site scrape).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Timeout for HEAD/GET liveness checks.
    #[serde(default = "default_short_timeout_ms")]
    pub liveness_timeout_ms: u64,

    /// Timeout for backlink and crawl page fetches.
    #[serde(default = "default_short_timeout_ms")]
    pub backlink_timeout_ms: u64,

    /// Timeout for analyze-pipeline page fetches.
    #[serde(default = "default_long_timeout_ms")]
    pub analyze_timeout_ms: u64,

    /// Timeout for the `/contact` fallback fetch.
    #[serde(default = "default_long_timeout_ms")]
    pub contact_timeout_ms: u64,

    /// Upper bound on simultaneous in-flight fetches within one batch.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Per-site email cap applied by the harvester.
    #[serde(default = "default_max_emails_per_site")]
    pub max_emails_per_site: usize,

    /// How many candidate sites the backlink and crawl pipelines harvest.
    #[serde(default = "default_site_limit")]
    pub site_limit: usize,

    /// How many LLM-suggested sites the analyze pipeline keeps.
    #[serde(default = "default_max_suggested_sites")]
    pub max_suggested_sites: usize,

    /// HTML search endpoint queried by the search result scraper.
    #[serde(default = "default_search_endpoint")]
    pub search_endpoint: String,

    /// OpenAI-compatible chat completion endpoint.
    #[serde(default = "default_llm_api_url")]
    pub llm_api_url: String,

    /// Bearer token for the completion endpoint.
    ///
    /// Set via LEADSCOUT_LLM_API_KEY environment variable.
    /// Required only when an LLM-backed endpoint is called.
    #[serde(default)]
    pub llm_api_key: Option<String>,

    /// Model name sent with every completion request.
    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    /// Completion request timeout in milliseconds.
    #[serde(default = "default_llm_timeout_ms")]
    pub llm_timeout_ms: u64,

    /// Lifetime of a cached analyze response.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: i64,

    /// Cached responses kept before least-recently-hit eviction.
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    /// Serve a fixed fallback payload instead of a 500 when the LLM fails during analyze.
    #[serde(default)]
    pub analyze_fallback: bool,
}

fn default_listen_addr() -> String {
    "0.0.0.0:5001".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./leadscout.sqlite")
}

fn default_user_agent() -> String {
    BROWSER_USER_AGENT.into()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_short_timeout_ms() -> u64 {
    5_000
}

fn default_long_timeout_ms() -> u64 {
    10_000
}

fn default_max_concurrency() -> usize {
    10
}

fn default_max_emails_per_site() -> usize {
    15
}

fn default_site_limit() -> usize {
    5
}

fn default_max_suggested_sites() -> usize {
    20
}

fn default_search_endpoint() -> String {
    "https://html.duckduckgo.com/html/".into()
}

fn default_llm_api_url() -> String {
    "https://api.hyperbolic.xyz/v1/chat/completions".into()
}

fn default_llm_model() -> String {
    "deepseek-ai/DeepSeek-V3".into()
}

fn default_llm_timeout_ms() -> u64 {
    100_000
}

fn default_cache_ttl_secs() -> i64 {
    86_400
}

fn default_cache_max_entries() -> usize {
    500
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            cors_enabled: true,
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            liveness_timeout_ms: default_short_timeout_ms(),
            backlink_timeout_ms: default_short_timeout_ms(),
            analyze_timeout_ms: default_long_timeout_ms(),
            contact_timeout_ms: default_long_timeout_ms(),
            max_concurrency: default_max_concurrency(),
            max_emails_per_site: default_max_emails_per_site(),
            site_limit: default_site_limit(),
            max_suggested_sites: default_max_suggested_sites(),
            search_endpoint: default_search_endpoint(),
            llm_api_url: default_llm_api_url(),
            llm_api_key: None,
            llm_model: default_llm_model(),
            llm_timeout_ms: default_llm_timeout_ms(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_max_entries: default_cache_max_entries(),
            analyze_fallback: false,
        }
    }
}

impl AppConfig {
    /// Default transport timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn liveness_timeout(&self) -> Duration {
        Duration::from_millis(self.liveness_timeout_ms)
    }

    pub fn backlink_timeout(&self) -> Duration {
        Duration::from_millis(self.backlink_timeout_ms)
    }

    pub fn analyze_timeout(&self) -> Duration {
        Duration::from_millis(self.analyze_timeout_ms)
    }

    pub fn contact_timeout(&self) -> Duration {
        Duration::from_millis(self.contact_timeout_ms)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_millis(self.llm_timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `LEADSCOUT_`
    /// 2. TOML file from `LEADSCOUT_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("LEADSCOUT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("LEADSCOUT_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the LLM API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is not set.
    pub fn require_llm_api_key(&self) -> Result<&str, ConfigError> {
        self.llm_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "llm_api_key".into(),
                hint: "Set LEADSCOUT_LLM_API_KEY environment variable".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.listen_addr, "0.0.0.0:5001");
        assert_eq!(config.db_path, PathBuf::from("./leadscout.sqlite"));
        assert_eq!(config.user_agent, BROWSER_USER_AGENT);
        assert_eq!(config.accept_language, "en-US,en;q=0.9");
        assert_eq!(config.max_bytes, 5_242_880);
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.liveness_timeout_ms, 5_000);
        assert_eq!(config.backlink_timeout_ms, 5_000);
        assert_eq!(config.analyze_timeout_ms, 10_000);
        assert_eq!(config.contact_timeout_ms, 10_000);
        assert_eq!(config.max_emails_per_site, 15);
        assert_eq!(config.site_limit, 5);
        assert_eq!(config.max_suggested_sites, 20);
        assert!(config.llm_api_key.is_none());
        assert!(!config.analyze_fallback);
    }

    #[test]
    fn test_timeout_durations() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
        assert_eq!(config.liveness_timeout(), Duration::from_secs(5));
        assert_eq!(config.analyze_timeout(), Duration::from_secs(10));
        assert_eq!(config.llm_timeout(), Duration::from_secs(100));
    }

    #[test]
    fn test_require_llm_api_key_missing() {
        let config = AppConfig::default();
        let result = config.require_llm_api_key();
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_llm_api_key_empty() {
        let config = AppConfig { llm_api_key: Some(String::new()), ..Default::default() };
        assert!(config.require_llm_api_key().is_err());
    }

    #[test]
    fn test_require_llm_api_key_present() {
        let config = AppConfig { llm_api_key: Some("test-key".into()), ..Default::default() };
        let result = config.require_llm_api_key();
        assert_eq!(result.unwrap(), "test-key");
    }

    #[test]
    fn test_load_env_overrides() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("LEADSCOUT_SITE_LIMIT", "3");
            jail.set_env("LEADSCOUT_LLM_API_KEY", "secret");
            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.site_limit, 3);
            assert_eq!(config.llm_api_key.as_deref(), Some("secret"));
            assert_eq!(config.max_emails_per_site, 15);
            Ok(())
        });
    }

    #[test]
    fn test_load_toml_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("leadscout.toml", "max_concurrency = 2\nanalyze_fallback = true\n")?;
            jail.set_env("LEADSCOUT_CONFIG_FILE", "leadscout.toml");
            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.max_concurrency, 2);
            assert!(config.analyze_fallback);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("LEADSCOUT_MAX_CONCURRENCY", "0");
            assert!(matches!(AppConfig::load(), Err(ConfigError::Invalid { .. })));
            Ok(())
        });
    }
}
