use leadscout_client::{HarvestOptions, normalize};
use serde::Serialize;
use std::collections::HashSet;

use super::{Pipelines, extend_unique};

#[derive(Debug, Clone, Serialize)]
pub struct CrawlBody {
    pub query: String,
    pub websites: Vec<String>,
    pub emails: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScrapeBody {
    pub emails: Vec<String>,
}

impl Pipelines {
    /// Search once for `query` and harvest the first few results.
    ///
    /// Returns every result URL but only harvests the first `site_limit`.
    /// Empty results are valid; no placeholders.
    pub async fn crawl(&self, query: &str) -> CrawlBody {
        let websites = self.search.search(query).await;
        let limit = websites.len().min(self.config.site_limit);

        let harvests = self
            .harvester
            .harvest_all(&websites[..limit], &HarvestOptions::crawl(&self.config))
            .await;

        let mut emails = Vec::new();
        let mut seen = HashSet::new();
        for harvest in harvests {
            extend_unique(&mut emails, &mut seen, harvest.emails);
        }

        tracing::info!("crawl {:?}: {} websites, {} emails", query, websites.len(), emails.len());
        CrawlBody { query: query.to_string(), websites, emails }
    }

    /// Harvest a single site with no fallback and no cap.
    ///
    /// Returns None when the site itself could not be fetched.
    pub async fn scrape(&self, url: &str) -> Option<ScrapeBody> {
        let site = normalize(url);
        let harvest = self.harvester.harvest(&site, &HarvestOptions::scrape(&self.config)).await;
        harvest.reachable.then_some(ScrapeBody { emails: harvest.emails })
    }
}
