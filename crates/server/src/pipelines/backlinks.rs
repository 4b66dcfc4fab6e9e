use leadscout_client::HarvestOptions;
use leadscout_client::search::backlink_query;
use serde::Serialize;
use std::collections::HashSet;

use super::{
    DEFAULT_BACKLINK_TITLE, DEFAULT_BACKLINK_URL, DEFAULT_EMAIL, DEFAULT_SITE, Pipelines, Tagged, extend_unique,
};

/// A site that may accept guest posts, with its page title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Backlink {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BacklinksBody {
    pub backlinks: Vec<Backlink>,
    pub emails: Vec<String>,
}

impl Pipelines {
    /// Find outreach targets for `subjects`.
    ///
    /// Always returns at least one backlink and one email; placeholders are
    /// substituted (and the result tagged as a fallback) when the search turns
    /// up nothing usable.
    pub async fn backlinks(&self, subjects: &[String]) -> Tagged<BacklinksBody> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for subject in subjects {
            let results = self.search.search(&backlink_query(subject)).await;
            extend_unique(&mut candidates, &mut seen, results);
        }
        tracing::info!("{} backlink candidates for {} subjects", candidates.len(), subjects.len());

        let mut fallback_used = false;
        let mut sites = self.liveness.filter_active(&candidates).await;
        if sites.is_empty() {
            tracing::warn!("no live backlink candidates, using {}", DEFAULT_SITE);
            sites.push(DEFAULT_SITE.to_string());
            fallback_used = true;
        }
        sites.truncate(self.config.site_limit);

        let harvests = self
            .harvester
            .harvest_all(&sites, &HarvestOptions::backlinks(&self.config))
            .await;

        let mut backlinks = Vec::new();
        let mut emails = Vec::new();
        let mut seen_emails = HashSet::new();
        for harvest in harvests.into_iter().filter(|h| h.reachable) {
            let title = harvest.title.unwrap_or_else(|| harvest.site.clone());
            backlinks.push(Backlink { url: harvest.site, title });
            extend_unique(&mut emails, &mut seen_emails, harvest.emails);
        }

        if backlinks.is_empty() {
            backlinks.push(Backlink { url: DEFAULT_BACKLINK_URL.into(), title: DEFAULT_BACKLINK_TITLE.into() });
            fallback_used = true;
        }
        if emails.is_empty() {
            emails.push(DEFAULT_EMAIL.to_string());
            fallback_used = true;
        }

        tracing::info!("{} backlinks, {} emails", backlinks.len(), emails.len());
        Tagged::new(BacklinksBody { backlinks, emails }, fallback_used)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use leadscout_core::AppConfig;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    fn subjects(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_backlinks_happy_path() {
        let search = MockSearch::default().results(&backlink_query("seo"), &["https://blog.test"]);
        let fetcher = MockFetcher::default().page("https://blog.test", &html(&["editor@blog.test"]));
        let p = pipelines(AppConfig::default(), fetcher, search, MockSuggester::default(), None);

        let result = p.backlinks(&subjects(&["seo"])).await;

        assert!(result.ok);
        assert!(!result.fallback_used);
        assert_eq!(result.data.backlinks, vec![Backlink { url: "https://blog.test".into(), title: "Page".into() }]);
        assert_eq!(result.data.emails, vec!["editor@blog.test"]);
    }

    #[tokio::test]
    async fn test_backlinks_all_dead_uses_defaults() {
        let search = MockSearch::default().results(&backlink_query("seo"), &["https://dead1.test", "https://dead2.test"]);
        let p = pipelines(AppConfig::default(), MockFetcher::default(), search, MockSuggester::default(), None);

        let result = p.backlinks(&subjects(&["seo"])).await;

        assert!(!result.ok);
        assert!(result.fallback_used);
        assert_eq!(
            result.data.backlinks,
            vec![Backlink { url: DEFAULT_BACKLINK_URL.into(), title: DEFAULT_BACKLINK_TITLE.into() }]
        );
        assert_eq!(result.data.emails, vec![DEFAULT_EMAIL]);
    }

    #[tokio::test]
    async fn test_backlinks_dedup_across_queries_and_limit() {
        let urls: Vec<String> = (1..=7).map(|i| format!("https://s{i}.test")).collect();
        let first: Vec<&str> = urls[..4].iter().map(String::as_str).collect();
        let second: Vec<&str> = urls[2..].iter().map(String::as_str).collect();
        let search = MockSearch::default()
            .results(&backlink_query("a"), &first)
            .results(&backlink_query("b"), &second);

        let mut fetcher = MockFetcher::default();
        for (i, url) in urls.iter().enumerate() {
            fetcher = fetcher.page(url, &html(&[format!("info@s{}.test", i + 1).as_str()]));
        }
        let p = pipelines(AppConfig::default(), fetcher, search, MockSuggester::default(), None);

        let result = p.backlinks(&subjects(&["a", "b"])).await;

        let sites: Vec<_> = result.data.backlinks.iter().map(|b| b.url.as_str()).collect();
        assert_eq!(sites, urls[..5].iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(result.data.emails.len(), 5);
        assert!(result.ok);
    }

    #[tokio::test]
    async fn test_backlinks_emails_deduped_across_sites() {
        let search = MockSearch::default().results(&backlink_query("seo"), &["https://a.test", "https://b.test"]);
        let fetcher = MockFetcher::default()
            .page("https://a.test", &html(&["team@agency.test", "a@a.test"]))
            .page("https://b.test", &html(&["team@agency.test", "b@b.test"]));
        let p = pipelines(AppConfig::default(), fetcher, search, MockSuggester::default(), None);

        let result = p.backlinks(&subjects(&["seo"])).await;

        assert_eq!(result.data.backlinks.len(), 2);
        assert_eq!(result.data.emails, vec!["team@agency.test", "a@a.test", "b@b.test"]);
        assert!(result.ok);
    }

    #[tokio::test]
    async fn test_backlinks_uses_contact_page() {
        let search = MockSearch::default().results(&backlink_query("seo"), &["https://shy.test"]);
        let fetcher = MockFetcher::default()
            .page("https://shy.test", &html(&[]))
            .page("https://shy.test/contact", &html(&["editor@shy.test"]));
        let p = pipelines(AppConfig::default(), fetcher, search, MockSuggester::default(), None);

        let result = p.backlinks(&subjects(&["seo"])).await;

        assert_eq!(result.data.backlinks[0].url, "https://shy.test");
        assert_eq!(result.data.emails, vec!["editor@shy.test"]);
        assert!(!result.fallback_used);
    }

    #[tokio::test]
    async fn test_backlinks_title_falls_back_to_url() {
        let search = MockSearch::default().results(&backlink_query("seo"), &["https://notitle.test"]);
        let fetcher = MockFetcher::default().page("https://notitle.test", "<body>hi@notitle.test</body>");
        let p = pipelines(AppConfig::default(), fetcher, search, MockSuggester::default(), None);

        let result = p.backlinks(&subjects(&["seo"])).await;
        assert_eq!(result.data.backlinks[0].title, "https://notitle.test");
    }

    #[tokio::test]
    async fn test_backlinks_live_site_without_emails_gets_default_email() {
        let search = MockSearch::default().results(&backlink_query("seo"), &["https://quiet.test"]);
        let fetcher = MockFetcher::default()
            .page("https://quiet.test", &html(&[]))
            .status("https://quiet.test/contact", 404);
        let p = pipelines(AppConfig::default(), fetcher, search, MockSuggester::default(), None);

        let result = p.backlinks(&subjects(&["seo"])).await;

        assert_eq!(result.data.backlinks.len(), 1);
        assert_eq!(result.data.backlinks[0].url, "https://quiet.test");
        assert_eq!(result.data.emails, vec![DEFAULT_EMAIL]);
        assert!(result.fallback_used);
    }

    #[tokio::test]
    async fn test_backlinks_one_query_per_subject() {
        let search = Arc::new(MockSearch::default());
        let p = Pipelines::new(
            Arc::new(AppConfig::default()),
            Arc::new(MockFetcher::default()),
            search.clone(),
            Arc::new(MockSuggester::default()),
            None,
        );

        p.backlinks(&subjects(&["seo", "ppc"])).await;

        let queries = search.queries.lock().unwrap().clone();
        assert_eq!(queries, vec![backlink_query("seo"), backlink_query("ppc")]);
    }

    #[tokio::test]
    async fn test_backlinks_never_calls_llm() {
        let suggester = Arc::new(MockSuggester::default());
        let p = Pipelines::new(
            Arc::new(AppConfig::default()),
            Arc::new(MockFetcher::default()),
            Arc::new(MockSearch::default()),
            suggester.clone(),
            None,
        );

        p.backlinks(&subjects(&["seo"])).await;
        assert_eq!(suggester.calls.load(Ordering::SeqCst), 0);
    }
}
