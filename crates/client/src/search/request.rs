//! Search query construction.

use url::Url;

/// Intent phrases appended to a subject when hunting for outreach targets.
pub const BACKLINK_INTENT: &str = r#"directory OR "write for us" OR "guest post" OR contact"#;

/// Query for sites that accept guest posts or list contacts on `subject`.
pub fn backlink_query(subject: &str) -> String {
    format!("{} {}", subject.trim(), BACKLINK_INTENT)
}

/// Build the HTML search URL for `query` against `endpoint`.
///
/// The query is form-encoded into the `q` parameter; existing endpoint query
/// parameters are kept.
pub fn search_url(endpoint: &str, query: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(endpoint, &[("q", query)])
}
