//! dealscrape - Slickdeals thread scraper
//!
//! Fetches multi-page deal threads, extracts comments and deal metadata from
//! the serialized application state embedded in each page, and persists the
//! deduplicated result to a local JSON cache. An HTTP API and a CLI sit on
//! top, plus an optional Gemini-backed chat over scraped threads.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`scraper`] - Page fetching and pagination control
//! - [`parser`] - State payload parsing and data extraction
//! - [`models`] - Core data structures and types
//! - [`storage`] - Cache file persistence
//! - [`llm`] - Gemini chat and summarization
//! - [`server`] - HTTP API
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use dealscrape::config::Config;
//! use dealscrape::scraper::{ScrapeOptions, ThreadScraper};
//! use dealscrape::storage::DealStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let store = Arc::new(DealStore::new(&config.storage.data_dir));
//!     let scraper = ThreadScraper::new(&config.scraper, store)?;
//!
//!     let record = scraper
//!         .scrape("https://slickdeals.net/f/123456-some-deal", &ScrapeOptions::default())
//!         .await?;
//!     println!("{} comments", record.count);
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod parser;
pub mod scraper;
pub mod server;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::models::{Comment, CommentKind, DealRecord, RecordSource};
    pub use crate::scraper::{ScrapeOptions, ThreadScraper};
    pub use crate::storage::DealStore;
}

// Direct re-exports for convenience
pub use models::{Comment, CommentKind, DealRecord, RecordSource};
