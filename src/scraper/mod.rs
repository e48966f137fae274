//! Thread scraping orchestration
//!
//! [`ThreadScraper`] drives the whole scrape of one thread: cache check,
//! page-by-page fetching, payload parsing, extraction, and write-through.
//!
//! Pagination has no declared length to rely on; the upstream site exposes no
//! total-page count in its payload. Termination is driven entirely by
//! observed signal instead:
//!
//! - a final URL whose `page` parameter is missing or differs from the
//!   requested page (silent redirect past the end of the thread)
//! - a page without the embedded state payload, or with an unparsable one
//! - a page contributing zero new comments (the site looped back)
//!
//! Pages are processed strictly in order because both the redirect check and
//! the zero-new check depend on state accumulated from earlier pages.
//! Extraction failures never propagate: partial data beats no data for a
//! thread that may have thousands of comments.

pub mod fetcher;
pub mod url;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::models::{DealRecord, RecordSource};
use crate::parser::{extract_metadata, extract_state, CommentExtractor, DealMetadata};
use crate::storage::DealStore;
use crate::utils::error::ScrapeError;

pub use fetcher::{FetchedPage, PageFetcher};

/// Parameters of one scrape invocation
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Deepest page to request (inclusive)
    pub max_pages: u32,

    /// Skip the cache and scrape fresh
    pub force_refresh: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            max_pages: 10,
            force_refresh: false,
        }
    }
}

/// Pagination controller for deal threads
pub struct ThreadScraper {
    fetcher: PageFetcher,
    store: Arc<DealStore>,
}

impl ThreadScraper {
    /// Create a scraper from configuration
    pub fn new(config: &ScraperConfig, store: Arc<DealStore>) -> Result<Self> {
        let fetcher = PageFetcher::with_config(
            config.rate_limit,
            config.max_retries,
            config.request_timeout(),
        )
        .context("Failed to create page fetcher")?;

        Ok(Self { fetcher, store })
    }

    /// Scrape a thread, or return its cached record when deep enough
    ///
    /// The cached record satisfies the request when it was produced by a
    /// scrape at least as deep as `max_pages` and `force_refresh` is off; in
    /// that case no page is fetched at all. An unreadable cache entry is a
    /// miss, never an error.
    ///
    /// # Errors
    ///
    /// Only two failures surface: the first page being unfetchable
    /// ([`ScrapeError::FirstPageFetch`]) and the final write-through failing
    /// ([`ScrapeError::Store`]). Everything else degrades to a shorter
    /// aggregate.
    pub async fn scrape(&self, url: &str, opts: &ScrapeOptions) -> Result<DealRecord, ScrapeError> {
        let base_url = url::normalize_thread_url(url);
        let filename = url::cache_filename(base_url);

        // Serialize concurrent scrapes of the same thread; the lock covers
        // the cache check through the final write
        let _guard = self.store.lock_thread(&filename).await;

        if !opts.force_refresh {
            if let Some(mut cached) = self.store.load(&filename) {
                if cached.max_pages_request >= opts.max_pages {
                    info!(%filename, "returning cached record");
                    cached.source = RecordSource::Cache;
                    return Ok(cached);
                }
                debug!(
                    requested = opts.max_pages,
                    cached = cached.max_pages_request,
                    "cached record too shallow, re-scraping"
                );
            }
        }

        let mut extractor = CommentExtractor::new();
        let mut metadata = DealMetadata::default();
        let mut all_comments = Vec::new();

        for page in 1..=opts.max_pages {
            let page_url = url::page_url(base_url, page);
            debug!(page, %page_url, "fetching thread page");

            let fetched = match self.fetcher.fetch_page(&page_url).await {
                Ok(fetched) => fetched,
                Err(e) if page == 1 => return Err(ScrapeError::FirstPageFetch(e)),
                Err(e) => {
                    warn!(page, error = %e, "page fetch failed, stopping pagination");
                    break;
                }
            };

            // Requesting a page past the end of the thread silently
            // redirects to an earlier page; the final URL gives it away
            if page > 1 && url::final_url_page(&fetched.final_url) != Some(page) {
                info!(
                    page,
                    final_url = %fetched.final_url,
                    "redirected past end of thread, stopping pagination"
                );
                break;
            }

            let data = match extract_state(&fetched.body) {
                Ok(data) => data,
                Err(e) => {
                    warn!(page, error = %e, "no usable state payload, stopping pagination");
                    break;
                }
            };

            if page == 1 {
                match extract_metadata(&data) {
                    Some(found) => {
                        debug!(
                            title = %found.title,
                            description_len = found.description.len(),
                            "extracted deal metadata"
                        );
                        metadata = found;
                    }
                    None => debug!("no deal metadata found on page 1"),
                }
            }

            let fresh = extractor.extract_page(&data);
            if fresh.is_empty() {
                info!(page, "no new comments, stopping pagination (duplicate page)");
                break;
            }

            debug!(page, new_comments = fresh.len(), "extracted page comments");
            all_comments.extend(fresh);
        }

        let record = DealRecord::from_scrape(
            metadata.title,
            metadata.description,
            all_comments,
            filename.clone(),
            opts.max_pages,
        );

        self.store.save(&filename, &record)?;
        info!(%filename, count = record.count, "scrape complete");

        Ok(record)
    }
}
