//! Comment extraction from the resolved state array
//!
//! Thread pages embed comments in two structurally different shapes:
//!
//! - `Featured` objects carry `commentText` + `author`, with the author as a
//!   direct string reference
//! - `Main` objects carry `commentContent` + `commentAuthor`, with the author
//!   behind a user object and the timestamp behind a footer object
//!
//! Both shapes are probed independently for every object in document order; a
//! single object may legitimately yield both. Text fields add one more twist:
//! the reference may land on the string itself or on an `{htmlContent: idx}`
//! wrapper that needs a second hop.

use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::models::{Comment, CommentKind};
use crate::parser::resolver::{resolve_field, resolve_str};

// ============================================================================
// Deduplication
// ============================================================================

/// Exact comment identity: the `(author, date, text)` triple
///
/// The set holds owned tuples compared structurally, so there is no hash
/// collision risk to reason about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CommentKey {
    author: String,
    date: String,
    text: String,
}

impl CommentKey {
    fn of(comment: &Comment) -> Self {
        Self {
            author: comment.author.clone(),
            date: comment.date.clone(),
            text: comment.text.clone(),
        }
    }
}

// ============================================================================
// Extractor
// ============================================================================

/// Stateful comment extractor spanning one whole scrape invocation
///
/// The seen-set deliberately lives across pages: a page that contributes
/// nothing new is the pagination controller's signal that the site looped
/// back to an already-seen page.
#[derive(Debug, Default)]
pub struct CommentExtractor {
    seen: HashSet<CommentKey>,
}

impl CommentExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract every novel comment from one page's state array
    ///
    /// Returns comments in document order, already deduplicated against
    /// everything this extractor has seen on previous pages.
    pub fn extract_page(&mut self, data: &[Value]) -> Vec<Comment> {
        let mut fresh = Vec::new();

        for item in data {
            let Some(obj) = item.as_object() else {
                continue;
            };

            // Both shapes are checked for every object, not either/or
            if let Some(comment) = featured_comment(data, obj) {
                self.admit(comment, &mut fresh);
            }
            if let Some(comment) = main_comment(data, obj) {
                self.admit(comment, &mut fresh);
            }
        }

        fresh
    }

    /// Number of distinct comments seen so far
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    fn admit(&mut self, comment: Comment, out: &mut Vec<Comment>) {
        if self.seen.insert(CommentKey::of(&comment)) {
            out.push(comment);
        }
    }
}

// ============================================================================
// Shape probes
// ============================================================================

/// Probe an object for the featured comment shape
fn featured_comment(data: &[Value], obj: &Map<String, Value>) -> Option<Comment> {
    if !obj.contains_key("commentText") || !obj.contains_key("author") {
        return None;
    }

    let author = resolve_str(data, obj, "author").unwrap_or_default().to_string();
    let text = resolve_text(data, obj, "commentText");
    let date = resolve_str(data, obj, "timestampFormatted")
        .unwrap_or_default()
        .to_string();

    Some(Comment {
        kind: CommentKind::Featured,
        author,
        text,
        date,
    })
}

/// Probe an object for the main comment shape
fn main_comment(data: &[Value], obj: &Map<String, Value>) -> Option<Comment> {
    if !obj.contains_key("commentContent") || !obj.contains_key("commentAuthor") {
        return None;
    }

    // Author sits behind a user object; any break in the chain degrades to ""
    let author = resolve_field(data, obj, "commentAuthor")
        .and_then(Value::as_object)
        .and_then(|user| resolve_str(data, user, "username"))
        .unwrap_or_default()
        .to_string();

    let text = resolve_text(data, obj, "commentContent");

    let date = resolve_field(data, obj, "commentSectionCommentFooter")
        .and_then(Value::as_object)
        .and_then(|footer| resolve_str(data, footer, "timestampFormatted"))
        .unwrap_or_default()
        .to_string();

    Some(Comment {
        kind: CommentKind::Main,
        author,
        text,
        date,
    })
}

/// Resolve a text field through up to two levels of indirection
///
/// The reference may land directly on the string, or on an object whose
/// `htmlContent` field references the string.
fn resolve_text(data: &[Value], obj: &Map<String, Value>, key: &str) -> String {
    let Some(raw) = resolve_field(data, obj, key) else {
        return String::new();
    };

    if let Some(nested) = raw.as_object() {
        if nested.contains_key("htmlContent") {
            return resolve_str(data, nested, "htmlContent")
                .unwrap_or_default()
                .to_string();
        }
    }

    raw.as_str().unwrap_or_default().to_string()
}
