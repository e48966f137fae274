//! Integration tests for the cache store lifecycle

use dealscrape::models::{Comment, CommentKind, DealRecord};
use dealscrape::scraper::url::cache_filename;
use dealscrape::storage::DealStore;
use tempfile::TempDir;

fn record(filename: &str, comments: Vec<Comment>, depth: u32) -> DealRecord {
    DealRecord::from_scrape(
        "Widget deal".into(),
        "Half price".into(),
        comments,
        filename.into(),
        depth,
    )
}

fn comment(author: &str, text: &str) -> Comment {
    Comment {
        kind: CommentKind::Main,
        author: author.into(),
        text: text.into(),
        date: "Today".into(),
    }
}

/// Filename derivation feeds both reads and writes of the same thread
#[test]
fn test_filename_derivation() {
    assert_eq!(
        cache_filename("https://example.com/f/654321-some-deal"),
        "deal_654321.json"
    );

    let slug_name = cache_filename("https://example.com/forum/some_thread!!");
    assert!(slug_name.starts_with("scrape_"));
    assert!(slug_name.ends_with(".json"));
    let slug = slug_name
        .trim_start_matches("scrape_")
        .trim_end_matches(".json");
    assert!(slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
    assert!(slug.len() <= 50);
}

/// A full re-scrape overwrites the previous record wholesale
#[test]
fn test_rescrape_overwrites_record() {
    let dir = TempDir::new().unwrap();
    let store = DealStore::new(dir.path());

    store
        .save(
            "deal_1.json",
            &record("deal_1.json", vec![comment("a", "old")], 2),
        )
        .unwrap();
    store
        .save(
            "deal_1.json",
            &record(
                "deal_1.json",
                vec![comment("a", "old"), comment("b", "new")],
                5,
            ),
        )
        .unwrap();

    let loaded = store.load("deal_1.json").unwrap();
    assert_eq!(loaded.count, 2);
    assert_eq!(loaded.max_pages_request, 5);
}

/// The chat feature's summary survives read-modify-write, and a scrape-style
/// overwrite replaces the record it does not own a summary for
#[test]
fn test_summary_attach_then_full_overwrite() {
    let dir = TempDir::new().unwrap();
    let store = DealStore::new(dir.path());

    store
        .save(
            "deal_7.json",
            &record("deal_7.json", vec![comment("a", "t")], 3),
        )
        .unwrap();

    // Chat-style read-modify-write: attach a summary, keep everything else
    let mut value = store.load_value("deal_7.json").unwrap();
    value["deal_summary"] = serde_json::json!("mostly positive");
    store.save_value("deal_7.json", &value).unwrap();

    let with_summary = store.load("deal_7.json").unwrap();
    assert_eq!(with_summary.extra["deal_summary"], "mostly positive");
    assert_eq!(with_summary.count, 1);

    // A fresh scrape writes a wholly new record
    store
        .save(
            "deal_7.json",
            &record("deal_7.json", vec![comment("b", "t2")], 6),
        )
        .unwrap();
    let rescraped = store.load("deal_7.json").unwrap();
    assert!(rescraped.extra.get("deal_summary").is_none());
}

/// List, delete and delete-all over a small cache directory
#[test]
fn test_store_lifecycle() {
    let dir = TempDir::new().unwrap();
    let store = DealStore::new(dir.path());

    store
        .save(
            "deal_1.json",
            &record("deal_1.json", vec![comment("a", "t")], 1),
        )
        .unwrap();
    store
        .save(
            "scrape_thread.json",
            &record("scrape_thread.json", vec![], 1),
        )
        .unwrap();

    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 2);

    let outcome = store.delete(&["deal_1.json".to_string()]);
    assert_eq!(outcome.deleted, vec!["deal_1.json"]);
    assert!(outcome.errors.is_empty());

    assert_eq!(store.delete_all().unwrap(), 1);
    assert!(store.list().unwrap().is_empty());
}
