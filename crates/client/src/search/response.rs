//! Search result page parsing.

use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::extract::extract_hrefs;
use crate::fetch::normalize;

/// Anchor class carrying organic result links on the HTML results page.
static RESULT_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a.result__a").expect("invalid selector"));

/// Normalized result URLs from a search results page.
///
/// Every result href is run through [`normalize`] (scheme injection and
/// redirect unwrapping); duplicates after normalization are dropped keeping
/// first-seen order.
pub fn parse_results(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    extract_hrefs(&document, &RESULT_LINK)
        .iter()
        .map(|href| normalize(href))
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"
        <html><body>
          <div class="result">
            <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fblog.example.org%2Fwrite-for-us&amp;rut=1">Write for us</a>
            <a class="result__snippet" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fignored.example">snippet</a>
          </div>
          <div class="result">
            <a class="result__a" href="https://directory.example.net/">Directory</a>
          </div>
          <div class="result">
            <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fblog.example.org%2Fwrite-for-us&amp;rut=2">Dup</a>
          </div>
          <div class="result">
            <a class="result__a" href="plain.example.com/contact">Plain</a>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_results() {
        let urls = parse_results(RESULTS_PAGE);
        assert_eq!(
            urls,
            vec![
                "https://blog.example.org/write-for-us",
                "https://directory.example.net/",
                "https://plain.example.com/contact",
            ]
        );
    }

    #[test]
    fn test_parse_results_empty_page() {
        assert!(parse_results("<html><body><p>No results.</p></body></html>").is_empty());
    }
}
