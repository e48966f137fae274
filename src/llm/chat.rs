//! Chat over a scraped thread
//!
//! Assembles the model context from a cached deal record: title, description
//! and either the raw comment lines or a generated summary. Summaries are
//! written back into the cache file on first generation so later chats reuse
//! them; that write goes through the store's raw-value path and keeps every
//! field of the record intact.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::llm::{Content, GeminiClient};
use crate::models::{ChatRequest, ChatTurn};
use crate::storage::DealStore;
use crate::utils::error::ChatError;

/// Context assembled from comments is capped to keep prompts bounded
const CONTEXT_CHAR_LIMIT: usize = 30_000;

/// Chat service bound to the cache store
pub struct ChatService {
    client: GeminiClient,
    store: Arc<DealStore>,
}

impl ChatService {
    pub fn new(client: GeminiClient, store: Arc<DealStore>) -> Self {
        Self { client, store }
    }

    /// Answer one chat message against a scraped thread
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Store` when the record does not exist and
    /// `ChatError::Http`/`ChatError::Response` for API failures.
    pub async fn chat(&self, request: &ChatRequest) -> Result<String, ChatError> {
        let mut data = self.store.load_value(&request.filename)?;

        let deal_title = data["deal_title"].as_str().unwrap_or("Unknown Deal").to_string();
        let deal_description = data["deal_description"].as_str().unwrap_or("").to_string();

        let context_text = if request.use_summary {
            self.summary_context(&request.filename, &mut data).await?
        } else {
            let comments = join_comments(&data, true);
            let comments = truncate_chars(&comments, CONTEXT_CHAR_LIMIT, "...(truncated)");
            format!("COMMENTS FROM USERS:\n{comments}")
        };

        let system_prompt = format!(
            "You are a helpful assistant analyzing a Slickdeals thread.\n\n\
             DEAL TITLE: {deal_title}\n\n\
             DEAL DESCRIPTION:\n{deal_description}\n\n\
             {context_text}\n\n\
             Answer the user's questions based on the deal details and the user comments.\n"
        );

        let contents = build_contents(&system_prompt, &request.history, &request.message);
        self.client.generate(contents).await
    }

    /// Reuse or generate the thread summary and return it as context
    ///
    /// A freshly generated summary is persisted into the cache entry; if
    /// generation fails the raw comments are used instead, so chat still
    /// works.
    async fn summary_context(
        &self,
        filename: &str,
        data: &mut Value,
    ) -> Result<String, ChatError> {
        if let Some(summary) = data
            .get("deal_summary")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
        {
            debug!(%filename, "reusing persisted thread summary");
            return Ok(format!("SUMMARY OF COMMENTS:\n{summary}"));
        }

        let comments = join_comments(data, false);
        let comments = truncate_chars(&comments, CONTEXT_CHAR_LIMIT, "...");

        let prompt = format!(
            "Summarize the following Slickdeals thread.\n\
             Focus on the general sentiment, key questions asked, answers given, \
             and any important warnings or tips from users.\n\n\
             Comments:\n{comments}"
        );

        match self.client.generate(vec![Content::user(prompt)]).await {
            Ok(summary) => {
                data["deal_summary"] = Value::String(summary.clone());
                self.store.save_value(filename, data)?;
                debug!(%filename, "persisted thread summary");
                Ok(format!("SUMMARY OF COMMENTS:\n{summary}"))
            }
            Err(e) => {
                warn!(%filename, error = %e, "summary generation failed, falling back to raw comments");
                Ok(format!("Error generating summary. Using raw comments.\n{comments}"))
            }
        }
    }
}

/// Build the conversation sent to the model
///
/// The frontend relays bare question/answer pairs without the context block,
/// so the context is injected into the first user turn of the history (or
/// prepended to the message when there is no history yet).
fn build_contents(system_prompt: &str, history: &[ChatTurn], message: &str) -> Vec<Content> {
    if history.is_empty() {
        return vec![Content::user(format!(
            "{system_prompt}\n\nUser Question: {message}"
        ))];
    }

    let mut contents = Vec::with_capacity(history.len() + 1);
    for (i, turn) in history.iter().enumerate() {
        let role = if turn.role == "user" { "user" } else { "model" };
        let mut text = turn.content.clone();
        if i == 0 && role == "user" && !text.contains("DEAL TITLE:") {
            text = format!("{system_prompt}\n\nUser Question: {text}");
        }
        contents.push(Content::new(role, text));
    }

    contents.push(Content::user(message));
    contents
}

/// Join the record's comments into prompt lines
fn join_comments(data: &Value, with_date: bool) -> String {
    let Some(comments) = data.get("comments").and_then(Value::as_array) else {
        return String::new();
    };

    comments
        .iter()
        .map(|comment| {
            let author = comment["author"].as_str().unwrap_or("");
            let text = comment["text"].as_str().unwrap_or("");
            if with_date {
                let date = comment["date"].as_str().unwrap_or("");
                format!("{author} ({date}): {text}")
            } else {
                format!("{author}: {text}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cap a string at `limit` characters, appending `suffix` when cut
fn truncate_chars(text: &str, limit: usize, suffix: &str) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(limit).collect();
    truncated.push_str(suffix);
    truncated
}
