//! URL normalization for scraped and suggested links.
//!
//! Normalization never fails: anything that can't be parsed is passed
//! through with a scheme prepended, so a bad link degrades to a failed
//! fetch later instead of aborting the pipeline.

use std::sync::LazyLock;

use regex::Regex;

/// Search-engine redirect wrappers: (host fragment, path prefix, destination parameter).
const REDIRECTORS: &[(&str, &str, &str)] = &[("duckduckgo.com", "/l/", "uddg")];

static EXTRA_SLASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https:/{2,}").expect("valid regex"));

/// Whether `raw` starts with an explicit `http://` or `https://` scheme.
pub fn has_scheme(raw: &str) -> bool {
    raw.starts_with("http://") || raw.starts_with("https://")
}

/// Prepend `https://` when `raw` has no explicit http(s) scheme.
///
/// Used for LLM-suggested sites, which never carry redirect wrappers.
pub fn ensure_scheme(raw: &str) -> String {
    let trimmed = raw.trim();
    if has_scheme(trimmed) { trimmed.to_string() } else { format!("https://{trimmed}") }
}

/// Canonicalize a raw link into an absolute, schemed URL.
///
/// Steps:
/// 1. Trim whitespace and prepend `https://` if no http(s) scheme is present
/// 2. Collapse a run of slashes after `https:` to exactly two
/// 3. If the URL is a known search redirector, return the decoded destination
///    (normalized the same way)
///
/// The result is a fixed point: `normalize(&normalize(u)) == normalize(u)`.
pub fn normalize(raw: &str) -> String {
    let schemed = ensure_scheme(raw);
    let collapsed = EXTRA_SLASHES.replace(&schemed, "https://").into_owned();

    match unwrap_redirect(&collapsed) {
        // The destination is strictly shorter than the wrapper, so this terminates.
        Some(target) if target.len() < collapsed.len() => normalize(&target),
        _ => collapsed,
    }
}

/// Extract the true destination from a search-engine redirect URL.
///
/// Returns None if `url` is not a recognized redirector, can't be parsed, or
/// carries no destination parameter.
pub fn unwrap_redirect(url: &str) -> Option<String> {
    let parsed = match url::Url::parse(url) {
        Ok(u) => u,
        Err(e) => {
            tracing::debug!("leaving unparseable link as-is: {} ({})", url, e);
            return None;
        }
    };

    let host = parsed.host_str()?;
    let (_, _, param) = REDIRECTORS
        .iter()
        .find(|(domain, prefix, _)| host.contains(domain) && parsed.path().starts_with(prefix))?;

    // query_pairs percent-decodes the value.
    parsed
        .query_pairs()
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.trim().is_empty())
}
