// Core data structures for the dealscrape engine

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which of the two known comment shapes produced a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommentKind {
    /// Pinned/top comments rendered in the featured block
    Featured,
    /// Regular comments in the main thread listing
    Main,
}

/// A single normalized comment
///
/// Identity for deduplication purposes is the `(author, date, text)` triple;
/// the kind is informational and does not participate in identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "type")]
    pub kind: CommentKind,
    pub author: String,
    pub text: String,
    pub date: String,
}

/// Where a returned record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    Scrape,
    Cache,
}

/// One persisted deal thread: metadata plus the deduplicated comment list
///
/// `extra` keeps fields this engine does not own (for example `deal_summary`
/// written by the chat feature) so they survive read-modify-write cycles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealRecord {
    pub deal_title: String,
    pub deal_description: String,
    pub count: usize,
    pub comments: Vec<Comment>,
    pub saved_to: String,
    pub source: RecordSource,
    pub max_pages_request: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DealRecord {
    /// Build a freshly scraped record; `count` always mirrors the comment list
    pub fn from_scrape(
        deal_title: String,
        deal_description: String,
        comments: Vec<Comment>,
        saved_to: String,
        max_pages_request: u32,
    ) -> Self {
        Self {
            deal_title,
            deal_description,
            count: comments.len(),
            comments,
            saved_to,
            source: RecordSource::Scrape,
            max_pages_request,
            extra: Map::new(),
        }
    }
}

/// Parameters of a scrape request
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default)]
    pub force_refresh: bool,
}

fn default_max_pages() -> u32 {
    10
}

/// One turn of chat history relayed by the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

/// Parameters of a chat request against a scraped thread
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub filename: String,
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    #[serde(default)]
    pub use_summary: bool,
}

/// Parameters of a batch delete request
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteRequest {
    pub filenames: Vec<String>,
}

/// One entry in a cache directory listing
#[derive(Debug, Clone, Serialize)]
pub struct StoredFile {
    pub filename: String,
    pub title: String,
    pub modified: String,
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_mirrors_comments() {
        let comments = vec![Comment {
            kind: CommentKind::Main,
            author: "alice".into(),
            text: "great deal".into(),
            date: "Yesterday".into(),
        }];
        let record = DealRecord::from_scrape(
            "Title".into(),
            "Desc".into(),
            comments,
            "deal_1.json".into(),
            5,
        );
        assert_eq!(record.count, record.comments.len());
        assert_eq!(record.source, RecordSource::Scrape);
    }

    #[test]
    fn test_comment_kind_serializes_as_type() {
        let comment = Comment {
            kind: CommentKind::Featured,
            author: "bob".into(),
            text: "hot".into(),
            date: String::new(),
        };
        let json = serde_json::to_value(&comment).unwrap();
        assert_eq!(json["type"], "Featured");
    }

    #[test]
    fn test_record_roundtrips_unknown_fields() {
        let json = serde_json::json!({
            "deal_title": "T",
            "deal_description": "D",
            "count": 0,
            "comments": [],
            "saved_to": "deal_2.json",
            "source": "scrape",
            "max_pages_request": 3,
            "deal_summary": "users like it"
        });
        let record: DealRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.extra["deal_summary"], "users like it");

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["deal_summary"], "users like it");
    }

    #[test]
    fn test_scrape_request_defaults() {
        let req: ScrapeRequest =
            serde_json::from_str(r#"{"url": "https://slickdeals.net/f/123-x"}"#).unwrap();
        assert_eq!(req.max_pages, 10);
        assert!(!req.force_refresh);
    }
}
