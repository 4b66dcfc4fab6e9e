//! Per-site email harvesting.
//!
//! ### Algorithm
//! 1. GET the site. Any transport error or non-2xx status ends the harvest
//!    with an empty, unreachable result.
//! 2. Extract emails from the body, clean them, deduplicate.
//! 3. If none were found and fallback is enabled, GET `<site>/contact` and
//!    union its emails. Fallback failures are logged and swallowed.
//! 4. Truncate to the per-site cap.
//!
//! ### Batches
//! - [`Harvester::harvest_all`] runs sites concurrently behind a semaphore.
//! - Output order matches input order; a failed or panicked site still
//!   contributes an empty entry.

pub mod liveness;

pub use liveness::LivenessFilter;

use leadscout_core::AppConfig;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::extract::{clean_all, extract_emails, extract_title};
use crate::fetch::{Fetcher, Method};

/// Per-call harvest policy.
#[derive(Debug, Clone)]
pub struct HarvestOptions {
    /// Timeout for the site's own page.
    pub timeout: Duration,
    /// Timeout for the `/contact` fallback fetch.
    pub contact_timeout: Duration,
    /// Keep at most this many emails (None = unbounded).
    pub max_emails: Option<usize>,
    /// Try `/contact` when the site page yields nothing.
    pub contact_fallback: bool,
}

impl HarvestOptions {
    /// Analyze pipeline: 10s, contact fallback, capped.
    pub fn analyze(config: &AppConfig) -> Self {
        Self {
            timeout: config.analyze_timeout(),
            contact_timeout: config.contact_timeout(),
            max_emails: Some(config.max_emails_per_site),
            contact_fallback: true,
        }
    }

    /// Backlink pipeline: 5s, contact fallback, capped.
    pub fn backlinks(config: &AppConfig) -> Self {
        Self { timeout: config.backlink_timeout(), ..Self::analyze(config) }
    }

    /// Crawl pipeline: 5s, no fallback, no cap.
    pub fn crawl(config: &AppConfig) -> Self {
        Self { max_emails: None, contact_fallback: false, ..Self::backlinks(config) }
    }

    /// Single-site scrape: default timeout, no fallback, no cap.
    pub fn scrape(config: &AppConfig) -> Self {
        Self {
            timeout: config.timeout(),
            contact_timeout: config.contact_timeout(),
            max_emails: None,
            contact_fallback: false,
        }
    }
}

/// Outcome of harvesting one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteHarvest {
    pub site: String,
    pub emails: Vec<String>,
    /// Trimmed `<title>` of the site page, if it had one.
    pub title: Option<String>,
    /// Whether the site page itself was fetched with a 2xx status.
    pub reachable: bool,
}

impl SiteHarvest {
    fn unreachable(site: &str) -> Self {
        Self { site: site.to_string(), emails: Vec::new(), title: None, reachable: false }
    }
}

/// Fetch-and-extract driver for one site or a batch of sites.
#[derive(Clone)]
pub struct Harvester {
    fetcher: Arc<dyn Fetcher>,
    max_concurrency: usize,
}

impl Harvester {
    pub fn new(fetcher: Arc<dyn Fetcher>, max_concurrency: usize) -> Self {
        Self { fetcher, max_concurrency: max_concurrency.max(1) }
    }

    /// Harvest one site. Never fails; see the module docs for the fallback chain.
    pub async fn harvest(&self, site: &str, opts: &HarvestOptions) -> SiteHarvest {
        let page = match self.fetcher.fetch(site, Method::Get, opts.timeout).await {
            Ok(page) if page.is_success() => page,
            Ok(page) => {
                tracing::warn!("harvest {}: status {}", site, page.status);
                return SiteHarvest::unreachable(site);
            }
            Err(e) => {
                tracing::warn!("harvest {}: {}", site, e);
                return SiteHarvest::unreachable(site);
            }
        };

        let title = extract_title(&page.body);
        let mut emails = clean_all(extract_emails(&page.body));

        if emails.is_empty() && opts.contact_fallback {
            let contact = contact_url(site);
            match self.fetcher.fetch(&contact, Method::Get, opts.contact_timeout).await {
                Ok(page) if page.is_success() => {
                    let mut seen: HashSet<String> = emails.iter().cloned().collect();
                    let found = clean_all(extract_emails(&page.body));
                    emails.extend(found.into_iter().filter(|e| seen.insert(e.clone())));
                }
                Ok(page) => tracing::debug!("contact fallback {}: status {}", contact, page.status),
                Err(e) => tracing::debug!("contact fallback {}: {}", contact, e),
            }
        }

        if let Some(max) = opts.max_emails {
            emails.truncate(max);
        }

        tracing::debug!("harvested {} emails from {}", emails.len(), site);
        SiteHarvest { site: site.to_string(), emails, title, reachable: true }
    }

    /// Harvest every site concurrently, at most `max_concurrency` at a time.
    ///
    /// Returns one entry per input site, in input order.
    pub async fn harvest_all(&self, sites: &[String], opts: &HarvestOptions) -> Vec<SiteHarvest> {
        let mut results: Vec<SiteHarvest> = sites.iter().map(|s| SiteHarvest::unreachable(s)).collect();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut join_set = JoinSet::new();

        for (idx, site) in sites.iter().cloned().enumerate() {
            let harvester = self.clone();
            let opts = opts.clone();
            let semaphore = semaphore.clone();

            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                (idx, harvester.harvest(&site, &opts).await)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((idx, harvest)) => results[idx] = harvest,
                Err(e) => tracing::error!("harvest task failed: {}", e),
            }
        }

        results
    }
}

/// `<site>/contact`, with a single trailing slash on `site` removed first.
pub fn contact_url(site: &str) -> String {
    format!("{}/contact", site.strip_suffix('/').unwrap_or(site))
}
