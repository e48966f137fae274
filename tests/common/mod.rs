//! Shared fixtures for integration tests
//!
//! Builders for reference-indexed state payloads and the thread pages that
//! embed them, so tests can describe a page as a list of comments.

use serde_json::{json, Value};

/// Embed a state array in a full thread page
pub fn page_html(state: &Value) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Deal thread</title></head>
<body>
<div id="app">rendered content</div>
<script type="application/json" data-nuxt-data="nuxt-app" data-ssr="true" id="__NUXT_DATA__">{state}</script>
</body>
</html>"#
    )
}

/// Build a thread page containing deal metadata and main-shape comments
///
/// Comments are `(author, date, text)` triples; every field goes through the
/// reference indirection the real payload uses, including the author-object
/// and footer-object hops.
pub fn thread_page(comments: &[(&str, &str, &str)]) -> String {
    let mut data = vec![
        json!({"mainDesktopBlock": 1}),
        json!({"dealTitle": 2, "bodyHtml": 3}),
        json!("Widget deal"),
        json!("<p>Save <b>20%</b> today</p>"),
    ];

    for (author, date, text) in comments {
        let base = data.len();
        data.push(json!({
            "commentContent": base + 1,
            "commentAuthor": base + 2,
            "commentSectionCommentFooter": base + 4
        }));
        data.push(json!(text));
        data.push(json!({"username": base + 3}));
        data.push(json!(author));
        data.push(json!({"timestampFormatted": base + 5}));
        data.push(json!(date));
    }

    page_html(&Value::Array(data))
}

/// A page whose embedded payload wraps comment text in an htmlContent object
/// and mixes in a featured-shape comment
pub fn mixed_shape_page() -> String {
    let data = json!([
        {"mainDesktopBlock": 1},
        {"dealTitle": 2, "bodyHtml": 3},
        "Widget deal",
        "<p>Save <b>20%</b> today</p>",
        {"commentText": 5, "author": 7, "timestampFormatted": 8},
        {"htmlContent": 6},
        "Featured says hi",
        "pinned_user",
        "Yesterday 08:00 PM",
        {"commentContent": 10, "commentAuthor": 11, "commentSectionCommentFooter": 13},
        "Main says hi",
        {"username": 12},
        "main_user",
        {"timestampFormatted": 14},
        "Today 09:00 AM"
    ]);
    page_html(&data)
}
