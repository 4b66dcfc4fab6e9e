//! Prompts for theme and website suggestion, and parsing of the replies.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::fetch::ensure_scheme;

/// Token budget for the themes completion.
pub const THEMES_MAX_TOKENS: u32 = 512;

/// Token budget for the website list completion.
pub const WEBSITES_MAX_TOKENS: u32 = 256;

/// Subjects containing any of these (lower-cased) describe the article's
/// rhetoric rather than a topic a website could be about.
pub const DISQUALIFIERS: &[&str] = &[
    "tone",
    "contrast",
    "call to action",
    "recap",
    "congratulatory",
    "obstacle",
    "action",
    "templates",
    "benefits",
];

/// Leading markdown heading, bullet or list numbering, possibly repeated.
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:#{1,6}\s*|[-*•+]\s*|\d+[.)]\s*)+").expect("valid regex"));

pub fn themes_prompt(article: &str) -> String {
    format!(
        "Read the following SEO article and extract its main themes. \n\
         List the themes as bullet points (one per line), keeping them concise:\n\n{article}"
    )
}

pub fn websites_prompt(subjects: &[String]) -> String {
    format!(
        "Based on the following subjects: {}. Please provide a list of 20 unique website URLs that are \
         highly relevant to these topics. List each website on a new line without any additional commentary.",
        subjects.join(", ")
    )
}

/// One reply line without bold markers, list decoration or surrounding space.
fn strip_decoration(line: &str) -> String {
    let unbolded = line.replace("**", "");
    LIST_MARKER.replace(unbolded.trim(), "").trim().to_string()
}

fn is_disqualified(subject: &str) -> bool {
    let lower = subject.to_lowercase();
    DISQUALIFIERS.iter().any(|word| lower.contains(word))
}

/// Subjects from a themes completion, in reply order.
///
/// Empty lines and disqualified subjects are dropped.
pub fn parse_subjects(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_decoration)
        .filter(|s| !s.is_empty())
        .filter(|s| !is_disqualified(s))
        .collect()
}

/// Schemed site URLs from a website-list completion, at most `max`, deduplicated.
pub fn parse_websites(text: &str, max: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    text.lines()
        .map(strip_decoration)
        .filter(|s| !s.is_empty())
        .map(|s| ensure_scheme(&s))
        .filter(|s| seen.insert(s.clone()))
        .take(max)
        .collect()
}
