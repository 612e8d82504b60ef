//! Per-table write locks
//!
//! Every write (`set`, `delete`, `push`, `pull`, arithmetic, clear, drop,
//! import) holds its table's lock for the whole read-modify-write sequence.
//! Plain reads never take it.
//!
//! Handles derived from one another share a registry, so the lock follows the
//! table rather than the handle. Entries are never removed: a table dropped
//! and re-created keeps the same lock, so a waiter on the old table and a
//! caller on the new one still exclude each other.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Registry of table name -> write lock
#[derive(Debug, Default)]
pub(crate) struct LockRegistry {
    tables: DashMap<String, Arc<Mutex<()>>>,
}

impl LockRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Lock for `table`, created on first use
    pub(crate) fn table_lock(&self, table: &str) -> Arc<Mutex<()>> {
        if let Some(lock) = self.tables.get(table) {
            return Arc::clone(lock.value());
        }
        Arc::clone(
            self.tables
                .entry(table.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        )
    }
}
