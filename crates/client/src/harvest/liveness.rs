//! Liveness checks for candidate URLs.
//!
//! A URL is live when a HEAD, or failing that a GET, answers with a status in
//! [200, 400). Anything else drops the URL silently.

use leadscout_core::AppConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::fetch::{Fetcher, Method};

/// Concurrent HEAD/GET liveness checker.
#[derive(Clone)]
pub struct LivenessFilter {
    fetcher: Arc<dyn Fetcher>,
    timeout: Duration,
    max_concurrency: usize,
}

impl LivenessFilter {
    pub fn new(fetcher: Arc<dyn Fetcher>, timeout: Duration, max_concurrency: usize) -> Self {
        Self { fetcher, timeout, max_concurrency: max_concurrency.max(1) }
    }

    pub fn from_config(fetcher: Arc<dyn Fetcher>, config: &AppConfig) -> Self {
        Self::new(fetcher, config.liveness_timeout(), config.max_concurrency)
    }

    /// Whether `url` currently answers. HEAD first, GET on any HEAD failure.
    pub async fn is_live(&self, url: &str) -> bool {
        match self.fetcher.fetch(url, Method::Head, self.timeout).await {
            Ok(r) if r.is_live() => return true,
            Ok(r) => tracing::debug!("HEAD {} -> {}, retrying with GET", url, r.status),
            Err(e) => tracing::debug!("HEAD {} failed ({}), retrying with GET", url, e),
        }

        match self.fetcher.fetch(url, Method::Get, self.timeout).await {
            Ok(r) if r.is_live() => true,
            Ok(r) => {
                tracing::debug!("dropping {}: status {}", url, r.status);
                false
            }
            Err(e) => {
                tracing::debug!("dropping {}: {}", url, e);
                false
            }
        }
    }

    /// The live subset of `urls`, in input order.
    pub async fn filter_active(&self, urls: &[String]) -> Vec<String> {
        let mut live = vec![false; urls.len()];
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut join_set = JoinSet::new();

        for (idx, url) in urls.iter().cloned().enumerate() {
            let filter = self.clone();
            let semaphore = semaphore.clone();

            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                (idx, filter.is_live(&url).await)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((idx, ok)) => live[idx] = ok,
                Err(e) => tracing::error!("liveness task failed: {}", e),
            }
        }

        let active: Vec<String> = urls
            .iter()
            .zip(live)
            .filter_map(|(url, ok)| ok.then(|| url.clone()))
            .collect();

        tracing::info!("{} of {} candidate urls are live", active.len(), urls.len());
        active
    }
}
