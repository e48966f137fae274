//! Location and parsing of the embedded application state payload
//!
//! Thread pages ship their data inside a `<script>` element carrying the
//! Nuxt state marker attributes. The element's text content is a JSON array,
//! the reference-indexed document the rest of the parser works against.

use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;

use crate::utils::error::PayloadError;

/// Marker for the serialized application state script element
static STATE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        r#"script#__NUXT_DATA__[type="application/json"][data-nuxt-data="nuxt-app"][data-ssr="true"]"#,
    )
    .unwrap()
});

/// Extract and parse the reference-indexed state array from page HTML
///
/// # Errors
///
/// - [`PayloadError::MarkerMissing`] if the page has no state script; the
///   pagination controller treats this as end-of-thread, not a failure
/// - [`PayloadError::Json`] if the script body is not valid JSON
/// - [`PayloadError::NotAnArray`] if it parses to anything but an array
pub fn extract_state(html: &str) -> Result<Vec<Value>, PayloadError> {
    let document = Html::parse_document(html);
    let script = document
        .select(&STATE_SELECTOR)
        .next()
        .ok_or(PayloadError::MarkerMissing)?;

    let text: String = script.text().collect();
    let value: Value = serde_json::from_str(&text)?;

    match value {
        Value::Array(items) => Ok(items),
        _ => Err(PayloadError::NotAnArray),
    }
}
