//! Document codec: JsonValue <-> stored text
//!
//! Documents are persisted as compact JSON text. Writes encode exactly once.
//!
//! ## Legacy double encoding
//!
//! An older write path serialized documents twice, so some stored rows hold a
//! JSON string whose contents are themselves JSON (`"{\"a\":1}"`). [`decode`]
//! therefore runs a second pass whenever the first pass yields a string, and
//! keeps the first result if that second pass fails. A plain string that
//! happens to be valid JSON text (`"123"`, `"true"`) is decoded twice as well.
//! That is a known quirk of the stored format and is kept for compatibility.
//!
//! ## Unset sentinel
//!
//! A row whose text is exactly [`UNSET_SENTINEL`] exists but holds nothing;
//! reads treat it as absent.

use crate::error::Result;
use crate::json::JsonValue;
use serde_json::Value;

/// Stored text of a row that exists but has never been given a value
pub const UNSET_SENTINEL: &str = "{}";

/// Encode a document for storage
pub fn encode(value: &JsonValue) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Decode stored text into a document
///
/// Fails only if the first pass fails. See the module docs for the second pass.
pub fn decode(text: &str) -> Result<JsonValue> {
    let first: Value = serde_json::from_str(text)?;
    if let Value::String(inner) = &first {
        if let Ok(second) = serde_json::from_str::<Value>(inner) {
            return Ok(JsonValue::from(second));
        }
    }
    Ok(JsonValue::from(first))
}

/// Whether stored text is the unset sentinel
pub fn is_unset(text: &str) -> bool {
    text == UNSET_SENTINEL
}
