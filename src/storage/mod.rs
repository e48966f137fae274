//! Local persistence for scraped deal records

pub mod store;

pub use store::{DealStore, DeleteOutcome};
