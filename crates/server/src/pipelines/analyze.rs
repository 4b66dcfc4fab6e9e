use leadscout_client::HarvestOptions;
use leadscout_client::LlmError;
use leadscout_client::llm::{suggest_subjects, suggest_websites};
use leadscout_core::store::compute_cache_key;
use serde::{Deserialize, Serialize};

use super::{Pipelines, Tagged};

const CACHE_NAMESPACE: &str = "analyze";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeBody {
    pub subjects: Vec<String>,
    pub websites: Vec<String>,
    pub emails: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelatedBody {
    pub subjects: Vec<String>,
    pub websites: Vec<String>,
}

impl Pipelines {
    /// Article -> subjects -> suggested websites -> harvested emails.
    ///
    /// Genuine results are cached by article. On LLM failure the error is
    /// returned, or an empty fallback body when `analyze_fallback` is set.
    /// Emails are flattened per site in site order, not deduplicated across sites.
    pub async fn analyze(&self, article: &str) -> Result<Tagged<AnalyzeBody>, LlmError> {
        let key = compute_cache_key(CACHE_NAMESPACE, article);
        if let Some(body) = self.cached(&key).await {
            tracing::info!("analyze served from cache");
            return Ok(Tagged::genuine(body));
        }

        let suggested = async {
            let subjects = suggest_subjects(self.suggester.as_ref(), article).await?;
            let websites =
                suggest_websites(self.suggester.as_ref(), &subjects, self.config.max_suggested_sites).await?;
            Ok::<_, LlmError>((subjects, websites))
        };

        let (subjects, websites) = match suggested.await {
            Ok(pair) => pair,
            Err(e) if self.config.analyze_fallback => {
                tracing::warn!("analyze falling back after LLM failure: {}", e);
                return Ok(Tagged::fallback(AnalyzeBody::default()));
            }
            Err(e) => return Err(e),
        };

        let harvests = self
            .harvester
            .harvest_all(&websites, &HarvestOptions::analyze(&self.config))
            .await;

        let body = AnalyzeBody {
            subjects,
            websites: harvests.iter().map(|h| h.site.clone()).collect(),
            emails: harvests.into_iter().flat_map(|h| h.emails).collect(),
        };

        self.store_cached(&key, &body).await;
        Ok(Tagged::genuine(body))
    }

    /// LLM-suggested websites for `subjects`, no harvesting.
    pub async fn related(&self, subjects: &[String]) -> Result<RelatedBody, LlmError> {
        let websites = suggest_websites(self.suggester.as_ref(), subjects, self.config.max_suggested_sites).await?;
        Ok(RelatedBody { subjects: subjects.to_vec(), websites })
    }

    async fn cached(&self, key: &str) -> Option<AnalyzeBody> {
        let store = self.cache.as_ref()?;
        match store.get_response(key).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(body) => Some(body),
                Err(e) => {
                    tracing::warn!("ignoring unreadable cache entry {}: {}", key, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(code = e.code(), "cache lookup failed: {}", e);
                None
            }
        }
    }

    async fn store_cached(&self, key: &str, body: &AnalyzeBody) {
        let Some(store) = self.cache.as_ref() else {
            return;
        };

        let json = match serde_json::to_string(body) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("cannot serialize analyze result: {}", e);
                return;
            }
        };

        if let Err(e) = store
            .put_response(key, CACHE_NAMESPACE, &json, self.config.cache_ttl_secs)
            .await
        {
            tracing::warn!(code = e.code(), "cache write failed: {}", e);
            return;
        }

        match store.purge_lru_responses(self.config.cache_max_entries).await {
            Ok(0) => {}
            Ok(n) => tracing::debug!("evicted {} cached responses", n),
            Err(e) => tracing::warn!(code = e.code(), "cache eviction failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use leadscout_core::{AppConfig, Store};
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    const THEMES: &str = "- Call to Action: buy now\n- Content Marketing\n- **Link Building**";
    const SITES: &str = "1. one.test\n2. https://two.test\n3. three.test";

    fn suggester() -> MockSuggester {
        MockSuggester::default().reply(512, THEMES).reply(256, SITES)
    }

    fn fetcher() -> MockFetcher {
        MockFetcher::default()
            .page("https://one.test", &html(&["a@one.test", "b@one.test"]))
            .page("https://two.test", &html(&["a@one.test"]))
    }

    #[tokio::test]
    async fn test_analyze_pipeline() {
        let p = pipelines(AppConfig::default(), fetcher(), MockSearch::default(), suggester(), None);

        let result = p.analyze("An article about content.").await.unwrap();

        assert!(result.ok);
        assert_eq!(result.data.subjects, vec!["Content Marketing", "Link Building"]);
        assert_eq!(result.data.websites, vec!["https://one.test", "https://two.test", "https://three.test"]);
        // Not deduplicated across sites.
        assert_eq!(result.data.emails, vec!["a@one.test", "b@one.test", "a@one.test"]);
    }

    #[tokio::test]
    async fn test_analyze_caps_suggested_sites() {
        let config = AppConfig { max_suggested_sites: 2, ..Default::default() };
        let p = pipelines(config, fetcher(), MockSearch::default(), suggester(), None);

        let result = p.analyze("article").await.unwrap();
        assert_eq!(result.data.websites.len(), 2);
    }

    #[tokio::test]
    async fn test_analyze_llm_failure_is_error() {
        let p = pipelines(AppConfig::default(), fetcher(), MockSearch::default(), MockSuggester::failing(), None);
        let result = p.analyze("article").await;
        assert!(matches!(result, Err(LlmError::HttpError { status: 503 })));
    }

    #[tokio::test]
    async fn test_analyze_llm_failure_fallback() {
        let config = AppConfig { analyze_fallback: true, ..Default::default() };
        let p = pipelines(config, fetcher(), MockSearch::default(), MockSuggester::failing(), None);

        let result = p.analyze("article").await.unwrap();
        assert!(!result.ok);
        assert!(result.fallback_used);
        assert_eq!(result.data, AnalyzeBody::default());
    }

    #[tokio::test]
    async fn test_analyze_uses_cache() {
        let store = Store::open_in_memory().await.unwrap();
        let counted = Arc::new(suggester());
        let p = Pipelines::new(
            Arc::new(AppConfig::default()),
            Arc::new(fetcher()),
            Arc::new(MockSearch::default()),
            counted.clone(),
            Some(store.clone()),
        );

        let first = p.analyze("Same article").await.unwrap();
        assert_eq!(counted.calls.load(Ordering::SeqCst), 2);

        let second = p.analyze("  Same article \n").await.unwrap();
        assert_eq!(counted.calls.load(Ordering::SeqCst), 2);
        assert_eq!(second.data, first.data);
        assert!(second.ok);
    }

    #[tokio::test]
    async fn test_analyze_fallback_not_cached() {
        let store = Store::open_in_memory().await.unwrap();
        let config = AppConfig { analyze_fallback: true, ..Default::default() };
        let p = pipelines(config, fetcher(), MockSearch::default(), MockSuggester::failing(), Some(store.clone()));

        p.analyze("article").await.unwrap();

        let key = compute_cache_key(CACHE_NAMESPACE, "article");
        assert!(store.get_response(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_related_websites() {
        let p = pipelines(AppConfig::default(), MockFetcher::default(), MockSearch::default(), suggester(), None);
        let subjects = vec!["SEO".to_string()];

        let body = p.related(&subjects).await.unwrap();
        assert_eq!(body.subjects, subjects);
        assert_eq!(body.websites, vec!["https://one.test", "https://two.test", "https://three.test"]);
    }
}
