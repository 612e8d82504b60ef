//! SqliteStore: file-backed row store
//!
//! Every table is a SQLite table with the layout `(ID TEXT PRIMARY KEY, json TEXT)`,
//! so files written by older tools that share that layout open as-is.
//! Scans follow `rowid`, which is insertion order for tables that are only
//! ever appended to and updated in place.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use docstore_core::{Error, Result, Row, RowStore};

/// SQLite-backed row store
///
/// The connection sits behind a mutex; SQLite locks internally as well, but
/// `Connection` is not `Sync`.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.path)
            .finish()
    }
}

impl SqliteStore {
    /// Open (or create) a database file
    ///
    /// Creates missing parent directories. With `wal_mode` the journal is
    /// switched to WAL.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the directory or file cannot be opened.
    pub fn open(path: impl AsRef<Path>, wal_mode: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::store_unavailable(format!("{}: {}", parent.display(), e))
                })?;
            }
        }

        let conn = Connection::open(&path)
            .map_err(|e| Error::store_unavailable(format!("{}: {}", path.display(), e)))?;

        if wal_mode {
            conn.pragma_update(None, "journal_mode", "WAL")
                .map_err(|e| Error::store_unavailable(e.to_string()))?;
        }

        info!(path = %path.display(), wal_mode, "Opened SQLite store");

        Ok(SqliteStore {
            conn: Mutex::new(conn),
            path: Some(path),
        })
    }

    /// Open a private in-memory SQLite database
    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| Error::store_unavailable(e.to_string()))?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Path of the database file, `None` for in-memory databases
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Quote a table name as an SQL identifier
///
/// Names are validated before they reach the store; doubling quotes keeps
/// the statement well-formed regardless.
fn ident(table: &str) -> String {
    format!("\"{}\"", table.replace('"', "\"\""))
}

impl RowStore for SqliteStore {
    fn ensure_table(&self, table: &str) -> Result<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (ID TEXT PRIMARY KEY, json TEXT)",
            ident(table)
        );
        self.conn
            .lock()
            .execute(&sql, [])
            .map_err(|e| Error::store_unavailable(format!("table '{}': {}", table, e)))?;
        debug!(table, "Ensured table");
        Ok(())
    }

    fn get(&self, table: &str, id: &str) -> Result<Option<String>> {
        let sql = format!("SELECT json FROM {} WHERE ID = ?1", ident(table));
        let text = self
            .conn
            .lock()
            .query_row(&sql, params![id], |row| row.get::<_, Option<String>>(0))
            .optional()?;
        // A NULL json column reads like a missing row
        Ok(text.flatten())
    }

    fn insert(&self, table: &str, id: &str, json: &str) -> Result<()> {
        let sql = format!("INSERT INTO {} (ID, json) VALUES (?1, ?2)", ident(table));
        self.conn.lock().execute(&sql, params![id, json])?;
        Ok(())
    }

    fn update(&self, table: &str, id: &str, json: &str) -> Result<bool> {
        let sql = format!("UPDATE {} SET json = ?1 WHERE ID = ?2", ident(table));
        let changed = self.conn.lock().execute(&sql, params![json, id])?;
        Ok(changed > 0)
    }

    fn delete(&self, table: &str, id: &str) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE ID = ?1", ident(table));
        let changed = self.conn.lock().execute(&sql, params![id])?;
        Ok(changed > 0)
    }

    fn clear(&self, table: &str) -> Result<()> {
        let sql = format!("DELETE FROM {}", ident(table));
        self.conn.lock().execute(&sql, [])?;
        Ok(())
    }

    fn scan(&self, table: &str) -> Result<Vec<Row>> {
        let sql = format!("SELECT ID, json FROM {} ORDER BY rowid", ident(table));
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(Row::new(
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn row_count(&self, table: &str) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", ident(table));
        let count: i64 = self.conn.lock().query_row(&sql, [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn table_names(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY rowid",
        )?;
        let names = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut out = Vec::new();
        for name in names {
            out.push(name?);
        }
        Ok(out)
    }

    fn drop_table(&self, table: &str) -> Result<()> {
        let sql = format!("DROP TABLE {}", ident(table));
        self.conn.lock().execute(&sql, [])?;
        debug!(table, "Dropped table");
        Ok(())
    }

    fn size_bytes(&self) -> u64 {
        self.path
            .as_deref()
            .and_then(|p| std::fs::metadata(p).ok())
            .map(|m| m.len())
            .unwrap_or(0)
    }
}
