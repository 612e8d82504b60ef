//! Core types and traits for docstore
//!
//! This crate defines the foundational pieces shared by every layer:
//! - Key addressing: splitting `id.path.to.field` keys
//! - JSON types: JsonValue, JsonPath, ValueKind and nested get/set/delete
//! - Limits: bounds on document size, nesting, path length and arrays
//! - Document codec: stored text <-> JsonValue, with the legacy double decode
//! - Row types: Row, Entry, table name rules
//! - Traits: RowStore, the backing engine seam
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod error;
pub mod json;
pub mod key;
pub mod limits;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use json::{
    delete_at_path, get_at_path, set_at_path, JsonPath, JsonPathError, JsonValue, PathParseError,
    PathSegment, ValueKind,
};
pub use key::{KeyAddress, KeyError};
pub use limits::{LimitError, MAX_ARRAY_LEN, MAX_DEPTH, MAX_DOCUMENT_BYTES, MAX_PATH_SEGMENTS};
pub use traits::RowStore;
pub use types::{validate_table_name, Entry, Row, DEFAULT_TABLE};
