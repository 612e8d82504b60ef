//! SQLite Backend Tests
//!
//! - data and tables survive closing and reopening the file
//! - rows written by older tools (double-encoded) stay readable

use super::*;
use docstore::{DocstoreConfig, RowStore, SqliteStore};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> DocstoreConfig {
    DocstoreConfig {
        path: dir.path().to_string_lossy().into_owned(),
        ..DocstoreConfig::default()
    }
}

#[test]
fn test_reopen_keeps_documents_and_tables() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    {
        let db = Database::open(&config).unwrap();
        db.set("profile.name", "Alice").unwrap();
        db.table("audit").unwrap().push("log", "created").unwrap();
    }

    let db = Database::open(&config).unwrap();
    assert_eq!(db.get("profile.name").unwrap(), Some(jv(json!("Alice"))));
    assert_eq!(db.list_tables().unwrap().tables, vec!["JSON", "audit"]);
    assert_eq!(
        db.table("audit").unwrap().get("log").unwrap(),
        Some(jv(json!(["created"])))
    );
}

#[test]
fn test_drop_table_persists() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    {
        let db = Database::open(&config).unwrap();
        db.table("tmp").unwrap();
        assert!(db.drop_table("tmp"));
        assert!(!db.drop_table("tmp"));
    }
    let db = Database::open(&config).unwrap();
    assert_eq!(db.list_tables().unwrap().tables, vec!["JSON"]);
}

#[test]
fn test_double_encoded_rows_are_readable() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let store = Arc::new(SqliteStore::open(dir.path().join("legacy.sqlite"), false).unwrap());
    store.ensure_table("JSON").unwrap();
    store
        .insert("JSON", "old", &serde_json::to_string(r#"{"v":[1,2]}"#).unwrap())
        .unwrap();

    let db = Database::with_store(store, "JSON").unwrap();
    assert_eq!(db.get("old.v").unwrap(), Some(jv(json!([1, 2]))));
    db.push("old.v", 3i64).unwrap();
    assert_eq!(
        db.store().get("JSON", "old").unwrap().as_deref(),
        Some(r#"{"v":[1,2,3]}"#)
    );
}

#[test]
fn test_size_reports_file_bytes() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let db = Database::open(&config_in(&dir)).unwrap();
    db.set("k", "v").unwrap();
    assert!(db.size() > 0);
}
