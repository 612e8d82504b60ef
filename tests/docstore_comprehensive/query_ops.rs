//! Query Collection Tests
//!
//! - undecodable rows are skipped, never raised
//! - sequence operations see insertion order
//! - prefix/suffix matching with optional descending sort

use super::*;
use docstore::Entry;
use serde_json::json;

fn leaderboard() -> Database {
    let db = create_db();
    db.set("player_ann", json!({"stats": {"score": 12}})).unwrap();
    db.set("player_bob", json!({"stats": {"score": 40}})).unwrap();
    db.set("guest_cy", json!({"stats": {"score": 99}})).unwrap();
    db.set("player_dee", json!({"stats": {"score": 25}})).unwrap();
    db
}

#[test]
fn test_filter_skips_undecodable_row() {
    let db = create_db();
    db.set("good1", 1i64).unwrap();
    db.store().insert("JSON", "bad", "{\"unterminated\": ").unwrap();
    db.set("good2", 2i64).unwrap();

    let found = db.filter(|_| true).unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(db.row_count().unwrap(), 3);
    assert_eq!(db.key_array().unwrap(), vec!["good1", "good2"]);
}

#[test]
fn test_queries_see_fresh_data() {
    let db = create_db();
    assert!(db.all().unwrap().is_empty());
    db.set("a", 1i64).unwrap();
    assert_eq!(db.all().unwrap().len(), 1);
    db.delete("a").unwrap();
    assert!(db.all().unwrap().is_empty());
}

#[test]
fn test_starts_with_sorted_descending() {
    let db = leaderboard();
    let ranked = db.starts_with("player_", Some(".stats.score")).unwrap();
    let ids: Vec<&str> = ranked.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["player_bob", "player_dee", "player_ann"]);
}

#[test]
fn test_starts_with_unsorted_keeps_scan_order() {
    let db = leaderboard();
    let ids: Vec<String> = db
        .starts_with("player_", None)
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec!["player_ann", "player_bob", "player_dee"]);
}

#[test]
fn test_ends_with() {
    let db = leaderboard();
    let found = db.ends_with("_cy", None).unwrap();
    assert_eq!(found, vec![Entry::new("guest_cy", json!({"stats": {"score": 99}}))]);
}

#[test]
fn test_reduce_sums_scores() {
    let db = leaderboard();
    let total = db
        .reduce(0i64, |acc, e| {
            acc + e.document["stats"]["score"].as_i64().unwrap_or(0)
        })
        .unwrap();
    assert_eq!(total, 176);
}

#[test]
fn test_find_and_index_of() {
    let db = leaderboard();
    let bob = db.find(|e| e.id == "player_bob").unwrap().unwrap();
    assert_eq!(db.index_of(&bob, 0).unwrap(), Some(1));
    assert_eq!(db.find_index(|e| e.id.starts_with("guest")).unwrap(), Some(2));
}

#[test]
fn test_scan_limit_and_value_array() {
    let db = leaderboard();
    assert_eq!(db.scan(Some(1)).unwrap().len(), 1);
    let values = db.value_array().unwrap();
    assert_eq!(values[1], jv(json!({"stats": {"score": 40}})));
}

#[test]
fn test_unset_rows_appear_as_empty_objects() {
    let db = create_db();
    db.set("blank", json!({})).unwrap();
    let all = db.all().unwrap();
    assert_eq!(all, vec![Entry::new("blank", json!({}))]);
}
