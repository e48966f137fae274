//! Integration tests for the pagination controller using wiremock
//!
//! These tests validate the observed-signal termination rules and the cache
//! depth policy against a mock forum server.

mod common;

use std::sync::Arc;
use std::time::Duration;

use dealscrape::config::ScraperConfig;
use dealscrape::models::RecordSource;
use dealscrape::scraper::{ScrapeOptions, ThreadScraper};
use dealscrape::storage::DealStore;
use dealscrape::utils::error::ScrapeError;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{mixed_shape_page, thread_page};

fn test_config() -> ScraperConfig {
    ScraperConfig {
        rate_limit: 100,
        request_timeout_secs: 5,
        max_retries: 0,
    }
}

fn scraper(dir: &TempDir) -> (ThreadScraper, Arc<DealStore>) {
    let store = Arc::new(DealStore::new(dir.path()));
    let scraper = ThreadScraper::new(&test_config(), Arc::clone(&store)).unwrap();
    (scraper, store)
}

async fn mount_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path("/f/123456-widget-deal"))
        .and(query_param("page", page))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// A single-page thread: page 2 repeats page 1, pagination stops on the
/// duplicate and the aggregate holds page 1 exactly once
#[tokio::test]
async fn test_duplicate_page_stops_pagination() {
    let server = MockServer::start().await;
    let page = thread_page(&[
        ("alice", "Today", "first!"),
        ("bob", "Today", "nice price"),
    ]);
    mount_page(&server, "1", page.clone()).await;
    mount_page(&server, "2", page).await;

    let dir = TempDir::new().unwrap();
    let (scraper, _) = scraper(&dir);
    let url = format!("{}/f/123456-widget-deal", server.uri());

    let record = scraper.scrape(&url, &ScrapeOptions::default()).await.unwrap();

    assert_eq!(record.count, 2);
    assert_eq!(record.deal_title, "Widget deal");
    assert_eq!(record.deal_description, "Save 20% today");
    assert_eq!(record.source, RecordSource::Scrape);
    assert_eq!(record.saved_to, "deal_123456.json");
}

/// Multiple distinct pages aggregate in order until the duplicate signal
#[tokio::test]
async fn test_multi_page_aggregation() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "1",
        thread_page(&[("alice", "Mon", "page one comment")]),
    )
    .await;
    mount_page(
        &server,
        "2",
        thread_page(&[("bob", "Tue", "page two comment")]),
    )
    .await;
    // Page 3 repeats page 2 content: zero new comments, stop
    mount_page(
        &server,
        "3",
        thread_page(&[("bob", "Tue", "page two comment")]),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let (scraper, _) = scraper(&dir);
    let url = format!("{}/f/123456-widget-deal", server.uri());

    let record = scraper
        .scrape(
            &url,
            &ScrapeOptions {
                max_pages: 10,
                force_refresh: false,
            },
        )
        .await
        .unwrap();

    assert_eq!(record.count, 2);
    assert_eq!(record.comments[0].text, "page one comment");
    assert_eq!(record.comments[1].text, "page two comment");
}

/// Requesting a page past the end of the thread redirects to an earlier
/// page; the final URL's page parameter stops pagination
#[tokio::test]
async fn test_redirect_stops_pagination() {
    let server = MockServer::start().await;
    mount_page(&server, "1", thread_page(&[("alice", "Mon", "one")])).await;
    mount_page(&server, "2", thread_page(&[("bob", "Tue", "two")])).await;

    // Page 3 silently bounces back to page 1
    Mock::given(method("GET"))
        .and(path("/f/123456-widget-deal"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(302).insert_header(
            "Location",
            format!("{}/f/123456-widget-deal?sort=oldest&page=1", server.uri()).as_str(),
        ))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let (scraper, _) = scraper(&dir);
    let url = format!("{}/f/123456-widget-deal", server.uri());

    let record = scraper
        .scrape(
            &url,
            &ScrapeOptions {
                max_pages: 10,
                force_refresh: false,
            },
        )
        .await
        .unwrap();

    assert_eq!(record.count, 2);
}

/// A page without the state payload marker ends pagination without error
#[tokio::test]
async fn test_missing_marker_stops_pagination() {
    let server = MockServer::start().await;
    mount_page(&server, "1", mixed_shape_page()).await;
    mount_page(
        &server,
        "2",
        "<html><body>maintenance page</body></html>".to_string(),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let (scraper, _) = scraper(&dir);
    let url = format!("{}/f/123456-widget-deal", server.uri());

    let record = scraper.scrape(&url, &ScrapeOptions::default()).await.unwrap();

    // Both shapes from page 1 survive
    assert_eq!(record.count, 2);
    let authors: Vec<_> = record.comments.iter().map(|c| c.author.as_str()).collect();
    assert!(authors.contains(&"pinned_user"));
    assert!(authors.contains(&"main_user"));
}

/// A failing fetch after page 1 keeps the partial aggregate
#[tokio::test]
async fn test_later_page_failure_keeps_partial() {
    let server = MockServer::start().await;
    mount_page(&server, "1", thread_page(&[("alice", "Mon", "one")])).await;
    Mock::given(method("GET"))
        .and(path("/f/123456-widget-deal"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let (scraper, _) = scraper(&dir);
    let url = format!("{}/f/123456-widget-deal", server.uri());

    let record = scraper.scrape(&url, &ScrapeOptions::default()).await.unwrap();
    assert_eq!(record.count, 1);
}

/// Page 1 being unfetchable is the one fetch error that surfaces
#[tokio::test]
async fn test_first_page_failure_surfaces() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/f/123456-widget-deal"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let (scraper, _) = scraper(&dir);
    let url = format!("{}/f/123456-widget-deal", server.uri());

    let result = scraper.scrape(&url, &ScrapeOptions::default()).await;
    assert!(matches!(result, Err(ScrapeError::FirstPageFetch(_))));
}

/// Depth policy: a cached record satisfies shallower requests untouched and
/// re-scrapes for deeper ones
#[tokio::test]
async fn test_cache_depth_policy() {
    let server = MockServer::start().await;
    let page = thread_page(&[("alice", "Mon", "one")]);
    mount_page(&server, "1", page.clone()).await;
    mount_page(&server, "2", page).await;

    let dir = TempDir::new().unwrap();
    let (scraper, _) = scraper(&dir);
    let url = format!("{}/f/123456-widget-deal", server.uri());

    let first = scraper
        .scrape(
            &url,
            &ScrapeOptions {
                max_pages: 3,
                force_refresh: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(first.source, RecordSource::Scrape);
    assert_eq!(first.max_pages_request, 3);

    // Shallower request: served from cache, no fetches
    let shallow = scraper
        .scrape(
            &url,
            &ScrapeOptions {
                max_pages: 2,
                force_refresh: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(shallow.source, RecordSource::Cache);
    assert_eq!(shallow.max_pages_request, 3);

    // Deeper request: cache is stale relative to the requested depth
    let deep = scraper
        .scrape(
            &url,
            &ScrapeOptions {
                max_pages: 5,
                force_refresh: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(deep.source, RecordSource::Scrape);
    assert_eq!(deep.max_pages_request, 5);
}

/// Force refresh bypasses a satisfying cache entry
#[tokio::test]
async fn test_force_refresh_rescrapes() {
    let server = MockServer::start().await;
    let page = thread_page(&[("alice", "Mon", "one")]);
    mount_page(&server, "1", page.clone()).await;
    mount_page(&server, "2", page).await;

    let dir = TempDir::new().unwrap();
    let (scraper, _) = scraper(&dir);
    let url = format!("{}/f/123456-widget-deal", server.uri());

    scraper.scrape(&url, &ScrapeOptions::default()).await.unwrap();

    let refreshed = scraper
        .scrape(
            &url,
            &ScrapeOptions {
                max_pages: 10,
                force_refresh: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(refreshed.source, RecordSource::Scrape);
}

/// A corrupt cache entry is a miss, not an error
#[tokio::test]
async fn test_corrupt_cache_is_rescrapped() {
    let server = MockServer::start().await;
    let page = thread_page(&[("alice", "Mon", "one")]);
    mount_page(&server, "1", page.clone()).await;
    mount_page(&server, "2", page).await;

    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("deal_123456.json"), "{broken").unwrap();

    let (scraper, _) = scraper(&dir);
    let url = format!("{}/f/123456-widget-deal", server.uri());

    let record = scraper.scrape(&url, &ScrapeOptions::default()).await.unwrap();
    assert_eq!(record.source, RecordSource::Scrape);
    assert_eq!(record.count, 1);
}

/// The query string of the input URL is stripped before pagination
#[tokio::test]
async fn test_input_query_string_ignored() {
    let server = MockServer::start().await;
    let page = thread_page(&[("alice", "Mon", "one")]);
    mount_page(&server, "1", page.clone()).await;
    mount_page(&server, "2", page).await;

    let dir = TempDir::new().unwrap();
    let (scraper, store) = scraper(&dir);
    let url = format!(
        "{}/f/123456-widget-deal?sort=newest&page=7",
        server.uri()
    );

    let record = scraper.scrape(&url, &ScrapeOptions::default()).await.unwrap();
    assert_eq!(record.saved_to, "deal_123456.json");
    assert!(store.load("deal_123456.json").is_some());
}
