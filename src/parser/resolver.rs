//! Reference-index resolution over the embedded state document
//!
//! The serialized application state is a flat JSON array in which any object
//! field may hold an *integer index* into the same array instead of an inline
//! value. Nothing in the document says which fields are references, so every
//! field access goes through [`resolve`] defensively: an index that is not an
//! integer within bounds is simply not a reference, and resolution yields
//! `None` rather than an error.

use serde_json::{Map, Value};

/// Resolve a candidate reference against the state array
///
/// Returns `Some(&data[i])` iff `index` is a JSON integer with
/// `0 <= i < data.len()`. Floats, strings, objects, negatives and
/// out-of-range indices all yield `None`.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use dealscrape::parser::resolver::resolve;
///
/// let data = vec![json!("zero"), json!("one")];
/// assert_eq!(resolve(&data, &json!(1)), Some(&json!("one")));
/// assert_eq!(resolve(&data, &json!(2)), None);
/// assert_eq!(resolve(&data, &json!(-1)), None);
/// assert_eq!(resolve(&data, &json!("1")), None);
/// ```
pub fn resolve<'a>(data: &'a [Value], index: &Value) -> Option<&'a Value> {
    let idx = index.as_u64()?;
    let idx = usize::try_from(idx).ok()?;
    data.get(idx)
}

/// Resolve an object field that may hold a reference
///
/// Shorthand for `obj.get(key)` chained through [`resolve`]. Absent fields
/// and non-reference values yield `None`.
pub fn resolve_field<'a>(
    data: &'a [Value],
    obj: &Map<String, Value>,
    key: &str,
) -> Option<&'a Value> {
    resolve(data, obj.get(key)?)
}

/// Resolve an object field all the way down to a string
pub fn resolve_str<'a>(data: &'a [Value], obj: &Map<String, Value>, key: &str) -> Option<&'a str> {
    resolve_field(data, obj, key).and_then(Value::as_str)
}
