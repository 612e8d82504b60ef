//! Table Management Tests
//!
//! - table switching shares one store
//! - listing, dropping and clearing tables
//! - export/import snapshots, single-table and whole-store

use super::*;
use docstore::{Error, ExportOptions, Indent, Snapshot, SnapshotData};
use serde_json::json;

// =============================================================================
// SWITCHING / LISTING
// =============================================================================

#[test]
fn test_tables_are_isolated() {
    let db = create_db();
    let users = db.table("users").unwrap();
    db.set("k", "json-table").unwrap();
    users.set("k", "users-table").unwrap();

    assert_eq!(db.get("k").unwrap(), Some(jv(json!("json-table"))));
    assert_eq!(users.get("k").unwrap(), Some(jv(json!("users-table"))));
}

#[test]
fn test_table_with_invalid_name_rejected() {
    let db = create_db();
    assert!(matches!(db.table("users; --"), Err(Error::InvalidTable { .. })));
    assert!(matches!(db.table(""), Err(Error::InvalidTable { .. })));
}

#[test]
fn test_ensure_table_twice_keeps_rows() {
    let db = create_db();
    db.set("a", 1i64).unwrap();
    db.set("b", 2i64).unwrap();
    db.ensure_table("JSON").unwrap();
    db.ensure_table("JSON").unwrap();
    assert_eq!(db.row_count().unwrap(), 2);
}

#[test]
fn test_list_tables_counts() {
    let db = create_db();
    db.table("a").unwrap();
    db.table("b").unwrap();
    let list = db.list_tables().unwrap();
    assert_eq!(list.count, 3);
    assert_eq!(list.tables, vec!["JSON", "a", "b"]);
}

// =============================================================================
// DROP / CLEAR
// =============================================================================

#[test]
fn test_drop_table_scenario() {
    let db = create_db();
    db.table("X").unwrap().set("row", 1i64).unwrap();

    assert!(db.drop_table("X"));
    assert!(!db.list_tables().unwrap().tables.iter().any(|t| t == "X"));
    assert!(!db.drop_table("X"));
}

#[test]
fn test_delete_all_empties_bound_table_only() {
    let db = create_db();
    let other = db.table("other").unwrap();
    db.set("a", 1i64).unwrap();
    other.set("b", 2i64).unwrap();

    db.delete_all().unwrap();
    assert!(db.is_empty().unwrap());
    assert_eq!(other.row_count().unwrap(), 1);
}

#[test]
fn test_flatten_and_all_tables() {
    let db = create_db();
    db.set("j1", 1i64).unwrap();
    let t = db.table("t").unwrap();
    t.set("t1", 2i64).unwrap();
    t.set("t2", 3i64).unwrap();

    let flat: Vec<String> = db.flatten().unwrap().into_iter().map(|e| e.id).collect();
    assert_eq!(flat, vec!["j1", "t1", "t2"]);

    let all = db.all_tables().unwrap();
    assert_eq!(all.iter().map(|t| t.rows.len()).collect::<Vec<_>>(), vec![1, 2]);
}

// =============================================================================
// EXPORT / IMPORT
// =============================================================================

#[test]
fn test_export_text_round_trip_through_import() {
    let source = create_db();
    source.set("cfg", json!({"theme": "dark"})).unwrap();
    source.table("users").unwrap().set("u1", json!({"name": "Ann"})).unwrap();

    let text = source
        .export_text(&ExportOptions::all_tables(), Indent::Spaces(4))
        .unwrap();
    let snapshot = Snapshot::from_text(&text).unwrap();
    assert_eq!(snapshot.origin, "docstore");
    assert!(matches!(snapshot.data, SnapshotData::Tables(_)));

    let target = create_db();
    assert_eq!(target.import(&snapshot).unwrap(), 2);
    assert_eq!(target.get("cfg.theme").unwrap(), Some(jv(json!("dark"))));
    assert_eq!(
        target.table("users").unwrap().get("u1.name").unwrap(),
        Some(jv(json!("Ann")))
    );
}

#[test]
fn test_export_legacy_row_layout() {
    let db = create_db();
    db.set("k", json!([1, 2])).unwrap();
    let text = db
        .export_text(&ExportOptions::default(), Indent::Compact)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["data"], json!([{"ID": "k", "data": [1, 2]}]));
    assert_eq!(value["mod"], json!("docstore"));
}
