//! Integration tests for payload parsing and extraction

mod common;

use dealscrape::models::CommentKind;
use dealscrape::parser::resolver::resolve;
use dealscrape::parser::{extract_metadata, extract_state, CommentExtractor};
use proptest::prelude::*;
use serde_json::{json, Value};

use common::mixed_shape_page;

proptest! {
    /// resolve returns data[i] iff the index is an integer in range
    #[test]
    fn resolve_bounds(values in prop::collection::vec(any::<i32>(), 0..20), index in any::<i64>()) {
        let data: Vec<Value> = values.iter().map(|v| json!(v)).collect();

        let resolved = resolve(&data, &json!(index));
        if index >= 0 && (index as usize) < data.len() {
            prop_assert_eq!(resolved, Some(&data[index as usize]));
        } else {
            prop_assert_eq!(resolved, None);
        }
    }

    /// Non-integer indices never resolve
    #[test]
    fn resolve_rejects_strings(values in prop::collection::vec(any::<i32>(), 0..20), index in ".*") {
        let data: Vec<Value> = values.iter().map(|v| json!(v)).collect();
        prop_assert_eq!(resolve(&data, &json!(index)), None);
    }

    /// Float indices never resolve, even when numerically in range
    #[test]
    fn resolve_rejects_floats(values in prop::collection::vec(any::<i32>(), 1..20), index in 0.1f64..10.0) {
        let data: Vec<Value> = values.iter().map(|v| json!(v)).collect();
        prop_assert_eq!(resolve(&data, &json!(index)), None);
    }
}

/// A realistic page resolves end to end: payload, metadata and both shapes
#[test]
fn test_full_page_extraction() {
    let html = mixed_shape_page();
    let data = extract_state(&html).unwrap();

    let metadata = extract_metadata(&data).unwrap();
    assert_eq!(metadata.title, "Widget deal");
    assert_eq!(metadata.description, "Save 20% today");

    let mut extractor = CommentExtractor::new();
    let comments = extractor.extract_page(&data);
    assert_eq!(comments.len(), 2);

    let featured = comments
        .iter()
        .find(|c| c.kind == CommentKind::Featured)
        .unwrap();
    assert_eq!(featured.author, "pinned_user");
    assert_eq!(featured.text, "Featured says hi");
    assert_eq!(featured.date, "Yesterday 08:00 PM");

    let main = comments
        .iter()
        .find(|c| c.kind == CommentKind::Main)
        .unwrap();
    assert_eq!(main.author, "main_user");
    assert_eq!(main.text, "Main says hi");
    assert_eq!(main.date, "Today 09:00 AM");
}

/// Extraction over a page with no recognizable comment objects yields nothing
#[test]
fn test_unrecognized_layout_extracts_nothing() {
    let data = vec![
        json!({"unrelated": 1}),
        json!("noise"),
        json!([1, 2, 3]),
        json!(42),
    ];
    let mut extractor = CommentExtractor::new();
    assert!(extractor.extract_page(&data).is_empty());
    assert_eq!(extract_metadata(&data), None);
}

/// Dedup state carries across pages fed to the same extractor
#[test]
fn test_cross_page_dedup() {
    let page = extract_state(&mixed_shape_page()).unwrap();

    let mut extractor = CommentExtractor::new();
    assert_eq!(extractor.extract_page(&page).len(), 2);
    assert_eq!(extractor.extract_page(&page).len(), 0);
    assert_eq!(extractor.seen_count(), 2);
}
