//! MemoryStore: in-process row store
//!
//! Implements the RowStore trait using:
//! - `BTreeMap<u64, Row>` per table, keyed by an insertion sequence number,
//!   so scans come back in insertion order
//! - `FxHashMap<String, u64>` id index for O(1) lookups
//! - A single `parking_lot::RwLock` over all tables
//!
//! # Design Notes
//!
//! - **No persistence**: data lives as long as the store
//! - **Stable positions**: updating a row keeps its sequence number; only
//!   delete + insert moves a row to the end
//! - **Table order**: table names are reported in creation order

use std::collections::BTreeMap;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use docstore_core::{Error, Result, Row, RowStore};

/// One table's rows plus its id index
#[derive(Debug, Default)]
struct MemTable {
    rows: BTreeMap<u64, Row>,
    index: FxHashMap<String, u64>,
    next_seq: u64,
}

impl MemTable {
    fn insert(&mut self, id: &str, json: &str) -> Result<()> {
        if self.index.contains_key(id) {
            return Err(Error::storage(format!("row '{}' already exists", id)));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.rows.insert(seq, Row::new(id, json));
        self.index.insert(id.to_string(), seq);
        Ok(())
    }

    fn update(&mut self, id: &str, json: &str) -> bool {
        match self.index.get(id).and_then(|seq| self.rows.get_mut(seq)) {
            Some(row) => {
                row.json = json.to_string();
                true
            }
            None => false,
        }
    }

    fn delete(&mut self, id: &str) -> bool {
        match self.index.remove(id) {
            Some(seq) => self.rows.remove(&seq).is_some(),
            None => false,
        }
    }
}

#[derive(Debug, Default)]
struct Tables {
    order: Vec<String>,
    by_name: FxHashMap<String, MemTable>,
}

impl Tables {
    fn table(&self, name: &str) -> Result<&MemTable> {
        self.by_name.get(name).ok_or_else(|| no_such_table(name))
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut MemTable> {
        self.by_name.get_mut(name).ok_or_else(|| no_such_table(name))
    }
}

fn no_such_table(name: &str) -> Error {
    Error::storage(format!("no such table: {}", name))
}

/// In-memory row store
///
/// Thread-safe through `parking_lot::RwLock`. Every call takes the lock once,
/// so each call is atomic on its own.
///
/// # Example
///
/// ```
/// use docstore_core::RowStore;
/// use docstore_storage::MemoryStore;
///
/// let store = MemoryStore::new();
/// store.ensure_table("JSON").unwrap();
/// store.insert("JSON", "user", r#"{"name":"Alice"}"#).unwrap();
/// assert_eq!(store.get("JSON", "user").unwrap().as_deref(), Some(r#"{"name":"Alice"}"#));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store with no tables
    pub fn new() -> Self {
        Self::default()
    }
}

impl RowStore for MemoryStore {
    fn ensure_table(&self, table: &str) -> Result<()> {
        let mut tables = self.tables.write();
        if !tables.by_name.contains_key(table) {
            tables.order.push(table.to_string());
            tables.by_name.insert(table.to_string(), MemTable::default());
            debug!(table, "Created table");
        }
        Ok(())
    }

    fn get(&self, table: &str, id: &str) -> Result<Option<String>> {
        let tables = self.tables.read();
        let t = tables.table(table)?;
        Ok(t.index
            .get(id)
            .and_then(|seq| t.rows.get(seq))
            .map(|row| row.json.clone()))
    }

    fn insert(&self, table: &str, id: &str, json: &str) -> Result<()> {
        self.tables.write().table_mut(table)?.insert(id, json)
    }

    fn update(&self, table: &str, id: &str, json: &str) -> Result<bool> {
        Ok(self.tables.write().table_mut(table)?.update(id, json))
    }

    fn delete(&self, table: &str, id: &str) -> Result<bool> {
        Ok(self.tables.write().table_mut(table)?.delete(id))
    }

    fn clear(&self, table: &str) -> Result<()> {
        let mut tables = self.tables.write();
        let t = tables.table_mut(table)?;
        t.rows.clear();
        t.index.clear();
        Ok(())
    }

    fn scan(&self, table: &str) -> Result<Vec<Row>> {
        let tables = self.tables.read();
        Ok(tables.table(table)?.rows.values().cloned().collect())
    }

    fn row_count(&self, table: &str) -> Result<usize> {
        Ok(self.tables.read().table(table)?.rows.len())
    }

    fn table_names(&self) -> Result<Vec<String>> {
        Ok(self.tables.read().order.clone())
    }

    fn drop_table(&self, table: &str) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.by_name.remove(table).is_none() {
            return Err(no_such_table(table));
        }
        tables.order.retain(|name| name != table);
        Ok(())
    }
}
