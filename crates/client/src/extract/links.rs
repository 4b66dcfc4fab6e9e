//! Href harvesting from parsed HTML documents.

use scraper::{Html, Selector};
use std::collections::HashSet;

/// Collect the `href` of every element matching `selector`.
///
/// Hrefs are trimmed, blanks are skipped, and duplicates (by exact string)
/// are removed keeping first-seen order. No resolution against a base URL is
/// done; callers normalize as they need.
pub fn extract_hrefs(document: &Html, selector: &Selector) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut hrefs = Vec::new();

    for element in document.select(selector) {
        let href = match element.value().attr("href") {
            Some(h) => h.trim(),
            None => continue,
        };

        if href.is_empty() || !seen.insert(href.to_string()) {
            continue;
        }

        hrefs.push(href.to_string());
    }

    hrefs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchors() -> Selector {
        Selector::parse("a[href]").unwrap()
    }

    #[test]
    fn test_extract_hrefs_basic() {
        let html = r#"
            <html>
                <body>
                    <a href="https://example.com">Example</a>
                    <a href="/about">About</a>
                </body>
            </html>
        "#;

        let hrefs = extract_hrefs(&Html::parse_document(html), &anchors());
        assert_eq!(hrefs, vec!["https://example.com", "/about"]);
    }

    #[test]
    fn test_extract_hrefs_duplicate() {
        let html = r#"
            <html>
                <body>
                    <a href="https://example.com">First</a>
                    <a href=" https://example.com ">Second</a>
                </body>
            </html>
        "#;

        let hrefs = extract_hrefs(&Html::parse_document(html), &anchors());
        assert_eq!(hrefs, vec!["https://example.com"]);
    }

    #[test]
    fn test_extract_hrefs_skips_blank() {
        let html = r#"<a href="   ">Blank</a><a>No href</a><a href="x">X</a>"#;
        let hrefs = extract_hrefs(&Html::parse_document(html), &anchors());
        assert_eq!(hrefs, vec!["x"]);
    }

    #[test]
    fn test_extract_hrefs_class_selector() {
        let html = r#"
            <a class="result__a" href="https://one.example">One</a>
            <a class="result__snippet" href="https://two.example">Two</a>
        "#;

        let selector = Selector::parse("a.result__a").unwrap();
        let hrefs = extract_hrefs(&Html::parse_document(html), &selector);
        assert_eq!(hrefs, vec!["https://one.example"]);
    }

    #[test]
    fn test_extract_hrefs_no_links() {
        let html = "<html><body><p>No links here</p></body></html>";
        assert!(extract_hrefs(&Html::parse_document(html), &anchors()).is_empty());
    }
}
