//! Deal title and description extraction
//!
//! Runs once per scrape, against page 1 only. The first object carrying a
//! `mainDesktopBlock` field points at the content container; from there the
//! title and the HTML body resolve like any other reference. Absence of any
//! link in that chain is a normal outcome, the scrape proceeds with empty
//! metadata.

use serde_json::Value;

use crate::parser::resolver::{resolve, resolve_str};
use crate::parser::sanitize::clean_html_fragment;

/// Thread-level metadata pulled from page 1
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DealMetadata {
    pub title: String,
    pub description: String,
}

/// Locate the main content block and extract title/description
///
/// Returns `None` when the container cannot be found or resolved; individual
/// missing fields inside a resolvable container degrade to empty strings.
pub fn extract_metadata(data: &[Value]) -> Option<DealMetadata> {
    let container_ref = data
        .iter()
        .find_map(|item| item.as_object()?.get("mainDesktopBlock"))?;

    let container = resolve(data, container_ref)?.as_object()?;

    let title = resolve_str(data, container, "dealTitle")
        .unwrap_or_default()
        .to_string();

    let description = resolve_str(data, container, "bodyHtml")
        .map(clean_html_fragment)
        .unwrap_or_default();

    Some(DealMetadata { title, description })
}
