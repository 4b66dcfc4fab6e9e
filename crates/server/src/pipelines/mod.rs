//! Harvest pipelines behind the HTTP endpoints.
//!
//! Each pipeline drives the client components in a fixed order:
//!
//! - **backlinks**: search per subject, liveness filter, harvest first N, placeholder fallbacks
//! - **crawl**: one search, harvest first N, no fallbacks
//! - **analyze**: LLM themes and sites, harvest all, cached by article
//! - **related**: LLM sites only
//! - **scrape**: one site, no fallback, no cap
//!
//! Per-site failures never fail a pipeline; only the LLM collaborator can.

mod analyze;
mod backlinks;
mod crawl;

pub use analyze::{AnalyzeBody, RelatedBody};
pub use backlinks::BacklinksBody;
pub use crawl::{CrawlBody, ScrapeBody};

use leadscout_client::{Fetcher, Harvester, LivenessFilter, SearchEngine, Suggester};
use leadscout_core::{AppConfig, Store};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Substituted when no backlink candidate survives the liveness check.
pub const DEFAULT_SITE: &str = "https://www.example.com";

/// Substituted when no backlink could be harvested.
pub const DEFAULT_BACKLINK_URL: &str = "https://default-backlink.com";
pub const DEFAULT_BACKLINK_TITLE: &str = "Default Backlink";

/// Substituted when the backlinks pipeline found no email at all.
pub const DEFAULT_EMAIL: &str = "contact@default.com";

/// Response body tagged with whether it holds genuine or substituted data.
///
/// Serializes flat: `{"ok": true, ...data}` or
/// `{"ok": false, "fallbackUsed": true, ...data}`.
#[derive(Debug, Clone, Serialize)]
pub struct Tagged<T> {
    pub ok: bool,
    #[serde(rename = "fallbackUsed", skip_serializing_if = "std::ops::Not::not")]
    pub fallback_used: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Tagged<T> {
    pub fn genuine(data: T) -> Self {
        Self { ok: true, fallback_used: false, data }
    }

    pub fn fallback(data: T) -> Self {
        Self { ok: false, fallback_used: true, data }
    }

    pub fn new(data: T, fallback_used: bool) -> Self {
        if fallback_used { Self::fallback(data) } else { Self::genuine(data) }
    }
}

/// Shared collaborators for every pipeline.
#[derive(Clone)]
pub struct Pipelines {
    config: Arc<AppConfig>,
    search: Arc<dyn SearchEngine>,
    suggester: Arc<dyn Suggester>,
    liveness: LivenessFilter,
    harvester: Harvester,
    cache: Option<Store>,
}

impl Pipelines {
    pub fn new(
        config: Arc<AppConfig>, fetcher: Arc<dyn Fetcher>, search: Arc<dyn SearchEngine>,
        suggester: Arc<dyn Suggester>, cache: Option<Store>,
    ) -> Self {
        let liveness = LivenessFilter::from_config(fetcher.clone(), &config);
        let harvester = Harvester::new(fetcher, config.max_concurrency);
        Self { config, search, suggester, liveness, harvester, cache }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Append `items` to `out`, skipping anything already in `seen`.
fn extend_unique(out: &mut Vec<String>, seen: &mut HashSet<String>, items: impl IntoIterator<Item = String>) {
    out.extend(items.into_iter().filter(|item| seen.insert(item.clone())));
}
