//! Search-engine result scraping.
//!
//! Issues a query against an HTML (no-JavaScript) search endpoint and returns
//! the organic result links, normalized.
//!
//! ### Protocol
//!
//! - **Endpoint**: `https://html.duckduckgo.com/html/?q=...` (configurable)
//! - **Identity**: the shared [`Fetcher`], so the same browser User-Agent
//! - **Parsing**: anchors with class `result__a`; hrefs unwrapped from `/l/?uddg=` redirects
//! - **Failure**: a failed or non-2xx query yields an empty list, logged, never raised

pub mod request;
pub mod response;

pub use request::{BACKLINK_INTENT, backlink_query, search_url};
pub use response::parse_results;

use async_trait::async_trait;
use leadscout_core::AppConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::fetch::{Fetcher, Method};

/// Default HTML search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// Produces candidate site URLs for a free-text query.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Normalized result URLs, deduplicated within this call, in result order.
    ///
    /// Never fails: errors degrade to an empty list.
    async fn search(&self, query: &str) -> Vec<String>;
}

/// DuckDuckGo HTML results scraper.
#[derive(Clone)]
pub struct DuckDuckGo {
    fetcher: Arc<dyn Fetcher>,
    endpoint: String,
    timeout: Duration,
}

impl DuckDuckGo {
    pub fn new(fetcher: Arc<dyn Fetcher>, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self { fetcher, endpoint: endpoint.into(), timeout }
    }

    pub fn from_config(fetcher: Arc<dyn Fetcher>, config: &AppConfig) -> Self {
        Self::new(fetcher, config.search_endpoint.clone(), config.timeout())
    }
}

#[async_trait]
impl SearchEngine for DuckDuckGo {
    async fn search(&self, query: &str) -> Vec<String> {
        let url = match search_url(&self.endpoint, query) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("bad search endpoint {}: {}", self.endpoint, e);
                return Vec::new();
            }
        };

        let start = Instant::now();
        tracing::debug!("searching: query={}", query);

        let response = match self.fetcher.fetch(url.as_str(), Method::Get, self.timeout).await {
            Ok(r) if r.is_success() => r,
            Ok(r) => {
                tracing::warn!("search for {:?} returned status {}", query, r.status);
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!("search for {:?} failed: {}", query, e);
                return Vec::new();
            }
        };

        let results = parse_results(&response.body);
        tracing::debug!("search completed in {:?}, {} results", start.elapsed(), results.len());
        results
    }
}
