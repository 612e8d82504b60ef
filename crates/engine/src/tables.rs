//! Table management
//!
//! Tables share one backing store. Handles bind to a table with
//! [`Database::table`]; the operations here act on named tables or on the
//! whole store.

use crate::database::Database;
use docstore_core::{validate_table_name, Entry, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Table names known to the backing store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableList {
    /// Number of tables
    pub count: usize,
    /// Names in creation order
    pub tables: Vec<String>,
}

/// One table's decoded rows, as produced by [`Database::all_tables`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRows {
    /// Position in [`Database::list_tables`] order
    pub index: usize,
    /// Table name
    pub table: String,
    /// Decoded rows in insertion order
    pub rows: Vec<Entry>,
}

impl Database {
    /// Every table in the backing store
    pub fn list_tables(&self) -> Result<TableList> {
        let tables = self.store().table_names()?;
        Ok(TableList {
            count: tables.len(),
            tables,
        })
    }

    /// Drop `name` and all its rows
    ///
    /// Returns `false` instead of failing when the table does not exist, the
    /// name is invalid, or the store refuses.
    pub fn drop_table(&self, name: &str) -> bool {
        if let Err(e) = validate_table_name(name) {
            warn!(table = name, error = %e, "Refusing to drop table");
            return false;
        }

        let lock = self.table_lock(name);
        let result = {
            let _guard = lock.lock();
            self.store().drop_table(name)
        };
        match result {
            Ok(()) => {
                info!(table = name, "Dropped table");
                true
            }
            Err(e) => {
                warn!(table = name, error = %e, "Failed to drop table");
                false
            }
        }
    }

    /// Drop the bound table; see [`drop_table`](Self::drop_table)
    pub fn drop(&self) -> bool {
        self.drop_table(self.table_name())
    }

    /// Remove every row of `name`, keeping the table
    pub fn clear_table(&self, name: &str) -> Result<()> {
        validate_table_name(name)?;
        self.store().ensure_table(name)?;
        let lock = self.table_lock(name);
        let _guard = lock.lock();
        self.store().clear(name)?;
        info!(table = name, "Cleared table");
        Ok(())
    }

    /// Remove every row of the bound table
    pub fn delete_all(&self) -> Result<()> {
        self.clear_table(self.table_name())
    }

    /// Decoded rows of every table, tagged with the table name
    pub fn all_tables(&self) -> Result<Vec<TableRows>> {
        self.list_tables()?
            .tables
            .into_iter()
            .enumerate()
            .map(|(index, table)| {
                let rows = self.materialize(&table, None)?;
                Ok(TableRows { index, table, rows })
            })
            .collect()
    }

    /// Decoded rows of every table concatenated, in table order
    pub fn flatten(&self) -> Result<Vec<Entry>> {
        let mut out = Vec::new();
        for table in self.list_tables()?.tables {
            out.extend(self.materialize(&table, None)?);
        }
        Ok(out)
    }
}
