//! docstore - document-oriented key-value store
//!
//! Each key addresses a whole document (`profile`) or a field inside it
//! (`profile.name`). Documents are JSON values kept in named tables on a
//! pluggable row store.
//!
//! # Quick Start
//!
//! ```
//! use docstore::Database;
//! use serde_json::json;
//!
//! let db = Database::in_memory()?;
//!
//! db.set("profile.name", "Alice")?;
//! db.push("profile.tags", "admin")?;
//! db.add("profile.logins", 1i64)?;
//!
//! assert_eq!(*db.get("profile")?.unwrap(), json!({
//!     "name": "Alice",
//!     "tags": ["admin"],
//!     "logins": 1
//! }));
//!
//! let admins = db.filter(|e| e.document["tags"].as_array().map_or(false, |t| !t.is_empty()))?;
//! assert_eq!(admins.len(), 1);
//! # Ok::<(), docstore::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `docstore-core`: keys, JSON paths, the document codec, errors, `RowStore`
//! - `docstore-storage`: `MemoryStore` and, with the `sqlite` feature, `SqliteStore`
//! - `docstore-engine`: the `Database` handle and every document, table and
//!   query operation

pub use docstore_core::{
    codec, Entry, Error, JsonPath, JsonValue, KeyAddress, Result, Row, RowStore, ValueKind,
    DEFAULT_TABLE,
};
pub use docstore_engine::{
    Database, DocstoreConfig, ExportOptions, Indent, Snapshot, SnapshotData, TableList,
    TableRows, CONFIG_FILE_NAME, EXPORT_ORIGIN,
};
pub use docstore_storage::MemoryStore;
#[cfg(feature = "sqlite")]
pub use docstore_storage::SqliteStore;
