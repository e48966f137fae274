//! Parsing of the embedded state payload and data extraction
//!
//! This module owns everything between raw page HTML and normalized output:
//! payload location, reference resolution, comment shape probing, metadata
//! extraction, and text cleanup.

pub mod comments;
pub mod metadata;
pub mod payload;
pub mod resolver;
pub mod sanitize;

pub use comments::CommentExtractor;
pub use metadata::{extract_metadata, DealMetadata};
pub use payload::extract_state;
pub use resolver::resolve;
