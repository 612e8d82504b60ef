//! Database handle and open logic
//!
//! A [`Database`] is a cheap, cloneable handle made of:
//! - the shared backing row store (`Arc<dyn RowStore>`)
//! - the table the handle is bound to
//! - the shared per-table lock registry
//!
//! Document operations live in [`crate::document`], table management in
//! [`crate::tables`] and [`crate::export`], sequence queries in
//! [`crate::query`]. They are all inherent methods on `Database`.
//!
//! ## Opening
//!
//! - `Database::in_memory()`: ephemeral, backed by `MemoryStore`
//! - `Database::open(&config)`: file-backed SQLite (`sqlite` feature)
//! - `Database::with_store(store, table)`: any `RowStore`
//!
//! There is no process-wide instance. Callers own their handles; dropping the
//! last one closes the store.

pub mod config;
mod registry;

pub use config::{DocstoreConfig, CONFIG_FILE_NAME};

use registry::LockRegistry;

use docstore_core::{validate_table_name, Result, RowStore, DEFAULT_TABLE};
use docstore_storage::MemoryStore;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Handle to a document store, bound to one table
///
/// Cloning is cheap and clones share the backing store and locks.
/// `Database` is `Send + Sync`.
///
/// # Example
///
/// ```
/// use docstore_engine::Database;
///
/// let db = Database::in_memory().unwrap();
/// db.set("profile.name", "Alice").unwrap();
/// assert_eq!(db.get("profile.name").unwrap().unwrap().as_str(), Some("Alice"));
///
/// let users = db.table("users").unwrap();
/// assert!(users.get("profile").unwrap().is_none());
/// ```
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn RowStore>,
    table: String,
    locks: Arc<LockRegistry>,
}

impl Database {
    /// Open an ephemeral store bound to the default table (`JSON`)
    pub fn in_memory() -> Result<Self> {
        Self::with_store(Arc::new(MemoryStore::new()), DEFAULT_TABLE)
    }

    /// Open the SQLite file described by `config`
    ///
    /// Creates the directory and file if needed and provisions the default
    /// table.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the file cannot be opened, and the
    /// config's validation error if it names a bad table.
    #[cfg(feature = "sqlite")]
    pub fn open(config: &DocstoreConfig) -> Result<Self> {
        config.validate()?;
        let store = docstore_storage::SqliteStore::open(config.file_path(), config.wal_mode)?;
        Self::with_store(Arc::new(store), &config.table)
    }

    /// Wrap an existing row store, binding to `table`
    ///
    /// # Errors
    ///
    /// Returns `InvalidTable` for a bad name, or the store's error if the
    /// table cannot be provisioned.
    pub fn with_store(store: Arc<dyn RowStore>, table: &str) -> Result<Self> {
        validate_table_name(table)?;
        store.ensure_table(table)?;
        info!(table, "Opened database");
        Ok(Database {
            store,
            table: table.to_string(),
            locks: Arc::new(LockRegistry::new()),
        })
    }

    /// Handle bound to `name`, sharing this handle's store
    ///
    /// Provisions the table if it does not exist. Returns a clone of this
    /// handle when `name` is already the bound table.
    pub fn table(&self, name: &str) -> Result<Database> {
        if name == self.table {
            return Ok(self.clone());
        }
        validate_table_name(name)?;
        self.store.ensure_table(name)?;
        debug!(from = %self.table, to = name, "Switched table");
        Ok(Database {
            store: Arc::clone(&self.store),
            table: name.to_string(),
            locks: Arc::clone(&self.locks),
        })
    }

    /// Provision a table if it does not exist. Idempotent.
    pub fn ensure_table(&self, name: &str) -> Result<()> {
        validate_table_name(name)?;
        self.store.ensure_table(name)
    }

    /// Name of the bound table
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// The shared backing row store
    pub fn store(&self) -> &Arc<dyn RowStore> {
        &self.store
    }

    /// Number of rows in the bound table
    pub fn row_count(&self) -> Result<usize> {
        self.ensure_bound()?;
        self.store.row_count(&self.table)
    }

    /// Alias of [`row_count`](Self::row_count)
    pub fn len(&self) -> Result<usize> {
        self.row_count()
    }

    /// Whether the bound table has no rows
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.row_count()? == 0)
    }

    /// Size of the backing file in bytes (0 when there is none)
    pub fn size(&self) -> u64 {
        self.store.size_bytes()
    }

    pub(crate) fn ensure_bound(&self) -> Result<()> {
        self.store.ensure_table(&self.table)
    }

    /// Write lock for `table`; see [`registry`]
    pub(crate) fn table_lock(&self, table: &str) -> Arc<Mutex<()>> {
        self.locks.table_lock(table)
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

/// `<Database N>` where N is the bound table's row count
impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row_count() {
            Ok(n) => write!(f, "<Database {}>", n),
            Err(_) => f.write_str("<Database ?>"),
        }
    }
}
