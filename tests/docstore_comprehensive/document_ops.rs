//! Document Operation Tests
//!
//! - set/get round-trips through bare and nested keys
//! - has/delete interplay
//! - push/pull on arrays
//! - arithmetic on unset and existing numbers

use super::*;
use docstore::{Error, ValueKind};
use serde_json::json;

// =============================================================================
// SET / GET
// =============================================================================

#[test]
fn test_nested_set_creates_row_named_by_id() {
    let db = create_db();
    db.set("profile.name", "Alice").unwrap();

    assert_eq!(db.get("profile.name").unwrap(), Some(jv(json!("Alice"))));
    assert_eq!(db.get("profile").unwrap(), Some(jv(json!({"name": "Alice"}))));
    assert_eq!(db.key_array().unwrap(), vec!["profile"]);
    assert_eq!(
        db.store().get("JSON", "profile").unwrap().as_deref(),
        Some(r#"{"name":"Alice"}"#)
    );
}

#[test]
fn test_set_returns_whole_document() {
    let db = create_db();
    db.set("cfg.theme", "dark").unwrap();
    let back = db.set("cfg.lang", "en").unwrap();
    assert_eq!(back, Some(jv(json!({"theme": "dark", "lang": "en"}))));
}

#[test]
fn test_round_trip_scalar_and_container_values() {
    let db = create_db();
    let values = [
        json!("text"),
        json!(42),
        json!(-3.25),
        json!(true),
        json!(null),
        json!([1, "two", [3]]),
        json!({"nested": {"deep": [true]}}),
    ];
    for (i, value) in values.iter().enumerate() {
        let bare = format!("bare{}", i);
        db.set(&bare, value.clone()).unwrap();
        assert_eq!(db.get(&bare).unwrap(), Some(jv(value.clone())), "{}", bare);

        let nested = format!("doc{}.field", i);
        db.set(&nested, value.clone()).unwrap();
        assert_eq!(db.get(&nested).unwrap(), Some(jv(value.clone())), "{}", nested);
    }
}

#[test]
fn test_path_on_scalar_document_is_type_mismatch() {
    let db = create_db();
    db.set("count", 3i64).unwrap();
    let err = db.set("count.inner", 1i64).unwrap_err();
    assert_eq!(err, Error::type_mismatch("object", "number"));
    assert_eq!(db.get("count").unwrap(), Some(jv(json!(3))));
}

#[test]
fn test_empty_key_is_invalid() {
    let db = create_db();
    assert!(matches!(db.get(""), Err(Error::InvalidKey { .. })));
    assert!(matches!(db.has(".name"), Err(Error::InvalidKey { .. })));
    assert!(matches!(db.delete(""), Err(Error::InvalidKey { .. })));
}

// =============================================================================
// HAS / DELETE
// =============================================================================

#[test]
fn test_has_false_after_delete() {
    let db = create_db();
    db.set("session", json!({"user": 1})).unwrap();
    assert!(db.has("session").unwrap());
    assert!(db.delete("session").unwrap());
    assert!(!db.has("session").unwrap());
    assert!(!db.has("session.user").unwrap());
}

#[test]
fn test_has_is_presence_not_truthiness() {
    let db = create_db();
    db.set("flags", json!({"off": false, "zero": 0, "empty": ""})).unwrap();
    assert!(db.has("flags.off").unwrap());
    assert!(db.has("flags.zero").unwrap());
    assert!(db.has("flags.empty").unwrap());
    assert!(!db.has("flags.missing").unwrap());
}

#[test]
fn test_delete_nested_field_keeps_row() {
    let db = create_db();
    db.set("user", json!({"name": "A", "tmp": 1})).unwrap();
    assert!(db.delete("user.tmp").unwrap());
    assert!(db.has("user").unwrap());
    assert!(!db.has("user.tmp").unwrap());
}

// =============================================================================
// PUSH / PULL
// =============================================================================

#[test]
fn test_push_pull_scenario() {
    let db = create_db();
    assert_eq!(db.push("tags", "red").unwrap(), Some(jv(json!(["red"]))));
    assert_eq!(db.push("tags", "blue").unwrap(), Some(jv(json!(["red", "blue"]))));
    assert_eq!(db.pull("tags", "red").unwrap(), Some(jv(json!(["blue"]))));
}

#[test]
fn test_push_then_pull_restores_array() {
    let db = create_db();
    db.set("list", json!([1, 2, 3])).unwrap();
    db.push("list", 99i64).unwrap();
    db.pull("list", 99i64).unwrap();
    assert_eq!(db.get("list").unwrap(), Some(jv(json!([1, 2, 3]))));
}

#[test]
fn test_pull_on_non_array_fails() {
    let db = create_db();
    db.set("name", "x").unwrap();
    assert!(matches!(db.pull("name", "x"), Err(Error::TypeMismatch { .. })));
}

// =============================================================================
// ARITHMETIC / TYPE
// =============================================================================

#[test]
fn test_add_then_subtract_returns_original() {
    let db = create_db();
    assert_eq!(db.add("n", 7i64).unwrap(), jv(json!(7)));
    db.set("m", 10i64).unwrap();
    db.add("m", 4i64).unwrap();
    assert_eq!(db.subtract("m", 4i64).unwrap(), jv(json!(10)));
}

#[test]
fn test_arithmetic_on_missing_value_uses_zero() {
    let db = create_db();
    assert_eq!(db.subtract("a", 2i64).unwrap(), jv(json!(-2)));
    assert_eq!(db.multiply("b", 5i64).unwrap(), jv(json!(0)));
    assert_eq!(db.divide("c", 4i64).unwrap(), jv(json!(0)));
    assert_eq!(db.modulus("d", 3i64).unwrap(), jv(json!(0)));
}

#[test]
fn test_non_numeric_delta_rejected() {
    let db = create_db();
    assert!(matches!(
        db.add("n", json!({"x": 1})),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(!db.has("n").unwrap());
}

#[test]
fn test_type_of() {
    let db = create_db();
    db.set("list", json!([])).unwrap();
    db.set("obj", json!({"k": 1})).unwrap();
    assert_eq!(db.type_of("list").unwrap(), ValueKind::Array);
    assert_eq!(db.type_of("obj").unwrap(), ValueKind::Object);
    assert_eq!(db.type_of("obj.k").unwrap(), ValueKind::Number);
    assert_eq!(db.type_of("ghost").unwrap().as_str(), "undefined");
}
