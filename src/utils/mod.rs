//! Common utilities and helpers

pub mod error;

pub use error::{ChatError, FetchError, PayloadError, ScrapeError, StoreError};
