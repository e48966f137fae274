//! Thread URL normalization and cache filename derivation
//!
//! Threads are identified by their URL. The same URL always maps to the same
//! cache filename, both when reading and when writing, so repeated scrapes of
//! a thread land on one file.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Thread id inside a forum path: `/f/<digits>`
static DEAL_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/f/(\d+)").unwrap());

/// Maximum slug length in fallback filenames
const SLUG_MAX_LEN: usize = 50;

/// Strip any existing query string off a thread URL
pub fn normalize_thread_url(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

/// Build the fetch URL for one page of a thread
///
/// Page 1 gets the same query parameters as every other page; the site
/// ignores them there.
pub fn page_url(base: &str, page: u32) -> String {
    format!("{base}?sort=oldest&page={page}")
}

/// Derive the deterministic cache filename for a thread URL
///
/// # Examples
///
/// ```
/// use dealscrape::scraper::url::cache_filename;
///
/// assert_eq!(
///     cache_filename("https://example.com/f/654321-some-deal"),
///     "deal_654321.json"
/// );
/// assert_eq!(
///     cache_filename("https://example.com/forum/some_thread!!"),
///     "scrape_somethread.json"
/// );
/// ```
pub fn cache_filename(url: &str) -> String {
    if let Some(caps) = DEAL_ID_REGEX.captures(url) {
        return format!("deal_{}.json", &caps[1]);
    }

    let slug: String = url
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .take(SLUG_MAX_LEN)
        .collect();

    format!("scrape_{slug}.json")
}

/// Page number carried by a final, post-redirect URL
///
/// `None` covers both a missing `page` parameter and a non-numeric one; the
/// pagination controller treats either as a redirect past the end of the
/// thread.
pub fn final_url_page(url: &Url) -> Option<u32> {
    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}
