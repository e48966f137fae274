//! Gemini client for thread chat and summarization
//!
//! Thin typed wrapper over the `generateContent` REST endpoint. The API key
//! arrives through configuration at construction time; there is no global
//! client state.

pub mod chat;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::utils::error::ChatError;

pub use chat::ChatService;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// One conversation turn in Gemini wire format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

/// One text part of a turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

impl Content {
    pub fn new(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            parts: vec![Part { text: text.into() }],
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new("user", text)
    }
}

/// Gemini generate request
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

/// Gemini generate response
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Client for the Gemini generateContent API
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Http` if the HTTP client cannot be created
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, ChatError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url: API_BASE.to_string(),
        })
    }

    /// Create a client pointed at a custom endpoint, for testing
    pub fn with_base_url(
        api_key: String,
        model: String,
        timeout: Duration,
        base_url: &str,
    ) -> Result<Self, ChatError> {
        let mut client = Self::new(api_key, model, timeout)?;
        client.base_url = base_url.to_string();
        Ok(client)
    }

    /// Run one generation over a full conversation
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Http` for transport failures and
    /// `ChatError::Response` when the API answers with a non-success status
    /// or an empty candidate list.
    pub async fn generate(&self, contents: Vec<Content>) -> Result<String, ChatError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let request = GenerateRequest { contents };
        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Response(format!(
                "Gemini API returned status {status}"
            )));
        }

        let body: GenerateResponse = response.json().await?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ChatError::Response("Empty response from Gemini".into()));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_constructors() {
        let turn = Content::user("hello");
        assert_eq!(turn.role, "user");
        assert_eq!(turn.parts[0].text, "hello");

        let model_turn = Content::new("model", "hi");
        assert_eq!(model_turn.role, "model");
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "part one "}, {"text": "part two"}]}}
            ]
        }"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        let candidate = response.candidates.into_iter().next().unwrap();
        let parts: Vec<String> = candidate
            .content
            .unwrap()
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect();
        assert_eq!(parts.join(""), "part one part two");
    }

    #[test]
    fn test_empty_candidates_parse() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(response.candidates.is_empty());
    }
}
