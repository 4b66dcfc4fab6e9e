//! Contact email discovery in fetched HTML.
//!
//! Extraction is two-pass: a permissive pattern collects candidates from the
//! document text and `mailto:` links, then [`clean_email`] re-matches each
//! candidate against a boundary-anchored pattern to shed characters picked up
//! from adjacent punctuation.

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

use super::links::extract_hrefs;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid regex"));

/// Same shape as [`EMAIL`] but must be followed by whitespace, a quote, an angle bracket or the end.
static CLEAN_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})(?:\s|$|["'<>])"#).expect("valid regex")
});

static MAILTO: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href^="mailto:"]"#).expect("invalid selector"));

static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").expect("invalid selector"));

static HEAD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("head").expect("invalid selector"));

/// Elements whose text is never shown to a reader.
const HIDDEN_TEXT: &[&str] = &["script", "style", "noscript", "template"];

/// Extract raw contact emails from an HTML document.
///
/// Returns the union of pattern matches over the `<body>` and `<head>` text
/// and the addresses of `mailto:` links (query string removed), deduplicated
/// by exact string in first-seen order. No case folding.
pub fn extract_emails(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let text = document_text(&document);

    let from_text = EMAIL.find_iter(&text).map(|m| m.as_str().to_string());
    let from_links = extract_hrefs(&document, &MAILTO).into_iter().filter_map(|href| mailto_address(&href));

    let mut seen = HashSet::new();
    from_text.chain(from_links).filter(|email| seen.insert(email.clone())).collect()
}

/// Strip characters captured by adjacency to punctuation.
///
/// Returns the boundary-anchored match when there is one, otherwise the input
/// unchanged. Idempotent.
pub fn clean_email(raw: &str) -> String {
    CLEAN_EMAIL
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Clean every email and drop duplicates that cleaning produced, keeping order.
pub fn clean_all(raw: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter().map(|e| clean_email(&e)).filter(|e| seen.insert(e.clone())).collect()
}

fn mailto_address(href: &str) -> Option<String> {
    let rest = href.strip_prefix("mailto:")?;
    let address = rest.split('?').next().unwrap_or_default().trim();
    if address.is_empty() { None } else { Some(address.to_string()) }
}

/// Text content of `<body>` then `<head>`, one space between the two.
///
/// Within a region text nodes are concatenated as-is, so an address split by
/// inline markup (`john<span>@</span>example.com`) reads whole.
fn document_text(document: &Html) -> String {
    let regions: Vec<String> = [&*BODY, &*HEAD]
        .into_iter()
        .flat_map(|selector| document.select(selector))
        .map(region_text)
        .collect();

    regions.join(" ")
}

fn region_text(region: ElementRef<'_>) -> String {
    let mut out = String::new();

    for node in region.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node
            .ancestors()
            .any(|a| a.value().as_element().is_some_and(|el| HIDDEN_TEXT.contains(&el.name())));
        if !hidden {
            out.push_str(text);
        }
    }

    out
}
