//! HTTP fetcher for thread pages
//!
//! This module provides the page fetcher used by the pagination controller,
//! with features including:
//! - User-Agent rotation from a pool of realistic browser strings
//! - Rate limiting with governor
//! - Automatic retry with exponential backoff
//! - Final-URL exposure after redirects (the controller's overflow signal)

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use rand::seq::SliceRandom;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, USER_AGENT},
    Client,
};
use std::num::NonZeroU32;
use std::time::Duration;
use url::Url;

use crate::utils::error::FetchError;

/// Pool of realistic User-Agent strings for rotation
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
];

/// One fetched page plus the URL the server actually served it from
///
/// `final_url` is the post-redirect URL; comparing its `page` parameter with
/// the requested page is how pagination past the end of a thread is detected.
#[derive(Debug)]
pub struct FetchedPage {
    pub final_url: Url,
    pub body: String,
}

/// Thread page fetcher
pub struct PageFetcher {
    /// HTTP client with configured timeout and compression
    client: Client,

    /// Rate limiter to control request frequency
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    /// Maximum number of retry attempts for failed requests
    max_retries: u32,

    /// Base delay in milliseconds for exponential backoff
    base_delay_ms: u64,
}

impl PageFetcher {
    /// Create a new fetcher with default retry settings
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(requests_per_second: u32) -> Result<Self, FetchError> {
        Self::with_config(requests_per_second, 3, Duration::from_secs(30))
    }

    /// Create a new fetcher with custom configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn with_config(
        requests_per_second: u32,
        max_retries: u32,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .cookie_store(true)
            .build()?;

        let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::new(1).unwrap());
        let quota = Quota::per_second(rate);
        let rate_limiter = RateLimiter::direct(quota);

        Ok(Self {
            client,
            rate_limiter,
            max_retries,
            base_delay_ms: 1000,
        })
    }

    /// Fetch one page with rate limiting and retry
    ///
    /// # Errors
    ///
    /// Returns various `FetchError` variants depending on the failure mode;
    /// timeouts surface as `FetchError::Timeout` and behave like any other
    /// fetch failure upstream.
    pub async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.rate_limiter.until_ready().await;
        self.fetch_with_retry(url).await
    }

    /// Fetch with exponential backoff retry logic
    async fn fetch_with_retry(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay_ms * 2_u64.pow(attempt - 1);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            let headers = self.build_headers();

            match self.client.get(url).headers(headers).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let final_url = response.url().clone();
                        let body = response.text().await?;
                        return Ok(FetchedPage { final_url, body });
                    } else if Self::should_retry(status.as_u16()) {
                        last_error = Some(FetchError::ServerError(status.as_u16()));
                        continue;
                    } else {
                        return Err(FetchError::ServerError(status.as_u16()));
                    }
                }
                Err(e) => {
                    if e.is_timeout() {
                        last_error = Some(FetchError::Timeout);
                    } else {
                        last_error = Some(FetchError::Http(e));
                    }
                }
            }
        }

        Err(last_error.unwrap_or(FetchError::MaxRetriesExceeded))
    }

    /// Determine if a status code should trigger a retry
    ///
    /// Retry on 429 and transient 5xx; client errors fail immediately.
    fn should_retry(status: u16) -> bool {
        matches!(status, 429 | 500 | 502 | 503 | 504)
    }

    /// Build browser-like headers with a rotated user agent
    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(USER_AGENT, HeaderValue::from_static(self.random_user_agent()));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        headers.insert(
            ACCEPT_ENCODING,
            HeaderValue::from_static("gzip, deflate, br"),
        );

        headers
    }

    /// Get a random user agent from the pool
    fn random_user_agent(&self) -> &'static str {
        let mut rng = rand::thread_rng();
        USER_AGENTS.choose(&mut rng).unwrap_or(&USER_AGENTS[0])
    }
}
