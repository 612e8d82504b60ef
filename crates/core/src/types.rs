//! Core row and table types
//!
//! - Row: what a backing store persists, `(id, text)`
//! - Entry: a decoded row, as handed to query callbacks
//! - Table name validation shared by every backend

use crate::error::{Error, Result};
use crate::json::JsonValue;
use serde::{Deserialize, Serialize};

/// Table used when the caller does not name one
pub const DEFAULT_TABLE: &str = "JSON";

/// Maximum table name length in bytes
pub const MAX_TABLE_NAME_BYTES: usize = 128;

/// A persisted row: document id plus encoded document text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Document id, unique within its table
    pub id: String,
    /// Encoded document (see [`codec`](crate::codec))
    pub json: String,
}

impl Row {
    /// Create a row
    pub fn new(id: impl Into<String>, json: impl Into<String>) -> Self {
        Row {
            id: id.into(),
            json: json.into(),
        }
    }
}

/// A decoded row
///
/// Serializes with the legacy export field names `ID` and `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Document id
    #[serde(rename = "ID")]
    pub id: String,
    /// Decoded document
    #[serde(rename = "data")]
    pub document: JsonValue,
}

impl Entry {
    /// Create an entry
    pub fn new(id: impl Into<String>, document: impl Into<JsonValue>) -> Self {
        Entry {
            id: id.into(),
            document: document.into(),
        }
    }
}

/// Validate a table name
///
/// Names must be non-empty, at most [`MAX_TABLE_NAME_BYTES`] long, and use only
/// ASCII letters, digits, `_` and `-`.
///
/// # Examples
///
/// ```
/// use docstore_core::types::validate_table_name;
///
/// assert!(validate_table_name("JSON").is_ok());
/// assert!(validate_table_name("users_v2").is_ok());
/// assert!(validate_table_name("").is_err());
/// assert!(validate_table_name("a; DROP TABLE b").is_err());
/// ```
pub fn validate_table_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidTable {
            reason: "table name is empty".into(),
        });
    }
    if name.len() > MAX_TABLE_NAME_BYTES {
        return Err(Error::InvalidTable {
            reason: format!(
                "table name is {} bytes, maximum is {}",
                name.len(),
                MAX_TABLE_NAME_BYTES
            ),
        });
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(Error::InvalidTable {
            reason: format!("table name '{}' contains '{}'", name, c),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_serializes_legacy_field_names() {
        let e = Entry::new("u1", json!({"name": "Alice"}));
        let text = serde_json::to_string(&e).unwrap();
        assert_eq!(text, r#"{"ID":"u1","data":{"name":"Alice"}}"#);
    }

    #[test]
    fn test_entry_deserializes_legacy_field_names() {
        let e: Entry = serde_json::from_str(r#"{"ID":"k","data":[1]}"#).unwrap();
        assert_eq!(e, Entry::new("k", json!([1])));
    }

    #[test]
    fn test_validate_table_name_accepts() {
        let longest = "x".repeat(MAX_TABLE_NAME_BYTES);
        for name in ["JSON", "t", "users-2024", "_private", longest.as_str()] {
            assert!(validate_table_name(name).is_ok(), "{}", name);
        }
    }

    #[test]
    fn test_validate_table_name_rejects() {
        let too_long = "x".repeat(MAX_TABLE_NAME_BYTES + 1);
        for name in ["", "has space", "quote\"", "semi;colon", "dot.ted", too_long.as_str()] {
            assert!(
                matches!(validate_table_name(name), Err(Error::InvalidTable { .. })),
                "{}",
                name
            );
        }
    }
}
