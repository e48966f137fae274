//! Error types for the dealscrape engine
//!
//! This module defines custom error types used throughout the application.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during HTTP fetching operations
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server error with status code
    #[error("Server error: {0}")]
    ServerError(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Maximum retry attempts exceeded
    #[error("Maximum retry attempts exceeded")]
    MaxRetriesExceeded,

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Errors that can occur while locating and parsing the embedded state payload
#[derive(Error, Debug)]
pub enum PayloadError {
    /// The page carries no serialized application state
    #[error("No embedded state payload found in page")]
    MarkerMissing,

    /// The payload text is not valid JSON
    #[error("Failed to parse state payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload parsed but is not a top-level array
    #[error("State payload is not a reference-indexed array")]
    NotAnArray,
}

/// Errors that can occur in the cache store
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error with path context
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Cached record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Filename rejected (path traversal or separator characters)
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors that can occur in the chat feature
#[derive(Error, Debug)]
pub enum ChatError {
    /// No API key configured
    #[error("GOOGLE_API_KEY environment variable not set")]
    MissingApiKey,

    /// Underlying store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// HTTP request to the LLM API failed
    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The LLM returned an unusable response
    #[error("LLM response error: {0}")]
    Response(String),
}

/// Errors surfaced by a scrape request
///
/// Only a small subset of failures ever reaches the caller: extraction-path
/// errors degrade the aggregate to fewer pages or empty fields instead.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// First page could not be fetched, nothing to return
    #[error("Failed to fetch first page: {0}")]
    FirstPageFetch(#[source] FetchError),

    /// Writing the result through the cache failed
    #[error("Failed to persist scrape result: {0}")]
    Store(#[from] StoreError),
}
