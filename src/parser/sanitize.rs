//! Text cleanup for HTML fragments pulled out of the state payload
//!
//! Deal descriptions arrive as raw HTML strings. This module reduces them to
//! plain text: tags become a single space, entities are decoded, and runs of
//! whitespace collapse to one space.

use regex::Regex;
use std::sync::LazyLock;

// Pre-compiled regex patterns for performance
static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Reduce an HTML fragment to clean single-line text
///
/// # Examples
///
/// ```
/// use dealscrape::parser::sanitize::clean_html_fragment;
///
/// let html = "<p>Save <b>20%</b> today</p>";
/// assert_eq!(clean_html_fragment(html), "Save 20% today");
/// ```
pub fn clean_html_fragment(html: &str) -> String {
    let stripped = strip_tags(html);
    let decoded = html_escape::decode_html_entities(&stripped);
    collapse_whitespace(&decoded)
}

/// Replace every tag-delimited span with a single space
pub fn strip_tags(html: &str) -> String {
    TAG_REGEX.replace_all(html, " ").into_owned()
}

/// Collapse consecutive whitespace to one space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}
