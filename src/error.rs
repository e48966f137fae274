//! Unified error handling for the dealscrape crate
//!
//! This module provides a unified error type that consolidates all
//! domain-specific errors into a single `Error` enum, while maintaining the
//! ability to use domain-specific errors when needed.
//!
//! # Architecture
//!
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors
//!
//! Extraction-path failures (missing payload marker, unresolvable fields,
//! unreadable cache files) are deliberately *not* represented here: they are
//! degradable by design and never escape the pagination controller. The
//! variants below are the ones a caller can actually observe.

use std::io;
use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::utils::error::{ChatError, FetchError, PayloadError, ScrapeError, StoreError};

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (HTTP, timeout)
    Network,
    /// Parsing and data extraction errors
    Parsing,
    /// Storage and I/O errors
    Storage,
    /// LLM and chat errors
    Llm,
    /// Configuration and validation errors
    Config,
    /// Other/unknown errors
    Other,
}

/// Unified error type for the dealscrape crate
#[derive(Error, Debug)]
pub enum Error {
    /// Scrape request errors
    #[error("Scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    /// Fetch-specific errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Payload location/parse errors
    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),

    /// Cache store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Chat feature errors
    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check if this error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Scrape(ScrapeError::FirstPageFetch(_)) => true,
            Self::Scrape(ScrapeError::Store(_)) => false,
            Self::Fetch(e) => !matches!(e, FetchError::InvalidUrl(_)),
            Self::Payload(_) => false,
            Self::Store(_) => false,
            Self::Chat(ChatError::Http(_)) => true,
            Self::Chat(_) => false,
            Self::Io(_) => true,
            Self::Json(_) => false,
            Self::Http(_) => true,
            Self::Config(_) => false,
        }
    }

    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Scrape(ScrapeError::FirstPageFetch(_)) | Self::Fetch(_) | Self::Http(_) => {
                ErrorCategory::Network
            }
            Self::Scrape(ScrapeError::Store(_)) | Self::Store(_) | Self::Io(_) => {
                ErrorCategory::Storage
            }
            Self::Payload(_) | Self::Json(_) => ErrorCategory::Parsing,
            Self::Chat(_) => ErrorCategory::Llm,
            Self::Config(_) => ErrorCategory::Config,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
