//! Row store abstraction
//!
//! `RowStore` is the minimal surface the document layer needs from a backing
//! engine. It deals only in raw rows; document encoding, key parsing and path
//! semantics live above it. Implementations can be swapped (in-memory, SQLite)
//! without touching upper layers.
//!
//! Thread safety: all methods must be safe to call concurrently from multiple
//! threads (requires Send + Sync). Each call is atomic on its own; callers that
//! need read-modify-write atomicity serialize above this layer.

use crate::error::Result;
use crate::types::Row;

/// Backing row store
///
/// Table names reaching a store have already passed
/// [`validate_table_name`](crate::types::validate_table_name).
pub trait RowStore: Send + Sync {
    /// Create the table if it does not exist. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the table cannot be provisioned.
    fn ensure_table(&self, table: &str) -> Result<()>;

    /// Stored text for `id`, if the row exists
    fn get(&self, table: &str, id: &str) -> Result<Option<String>>;

    /// Insert a new row at the end of the table's insertion order
    ///
    /// # Errors
    ///
    /// Returns an error if a row with `id` already exists.
    fn insert(&self, table: &str, id: &str, json: &str) -> Result<()>;

    /// Replace the text of an existing row, keeping its position
    ///
    /// Returns whether a row was updated.
    fn update(&self, table: &str, id: &str, json: &str) -> Result<bool>;

    /// Remove a row. Returns whether it existed.
    fn delete(&self, table: &str, id: &str) -> Result<bool>;

    /// Remove every row, keeping the table
    fn clear(&self, table: &str) -> Result<()>;

    /// All rows in insertion order
    fn scan(&self, table: &str) -> Result<Vec<Row>>;

    /// Number of rows in the table
    fn row_count(&self, table: &str) -> Result<usize>;

    /// Every table name, in creation order
    fn table_names(&self) -> Result<Vec<String>>;

    /// Remove a table and its rows
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not exist.
    fn drop_table(&self, table: &str) -> Result<()>;

    /// Bytes used on disk (0 for stores without a file)
    fn size_bytes(&self) -> u64 {
        0
    }

    /// Insert the row, or replace its text if it already exists
    fn upsert(&self, table: &str, id: &str, json: &str) -> Result<()> {
        if !self.update(table, id, json)? {
            self.insert(table, id, json)?;
        }
        Ok(())
    }
}
