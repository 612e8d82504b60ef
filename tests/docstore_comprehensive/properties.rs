//! Property Tests
//!
//! - keys without `.` parse to themselves
//! - `set` then `get` returns the value for bare and nested keys
//! - `add` then `subtract` is the identity on integers

use super::*;
use docstore::KeyAddress;
use proptest::prelude::*;
use serde_json::json;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        // Leading "s" keeps bare strings from also parsing as JSON text
        "s[a-z ]{0,11}".prop_map(Value::from),
        Just(Value::Null),
    ]
}

fn document() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map("[a-z]{1,6}", inner, 1..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn prop_key_without_dot_is_whole_id(key in "[A-Za-z0-9_-]{1,32}") {
        let address = KeyAddress::parse(&key).unwrap();
        prop_assert_eq!(address.id, key.as_str());
        prop_assert_eq!(address.path, None);
    }

    #[test]
    fn prop_key_splits_on_first_dot(
        id in "[a-z]{1,8}",
        rest in prop::collection::vec("[a-z]{1,8}", 1..4),
    ) {
        let path = rest.join(".");
        let key = format!("{}.{}", id, path);
        let address = KeyAddress::parse(&key).unwrap();
        prop_assert_eq!(address.id, id.as_str());
        prop_assert_eq!(address.path, Some(path.as_str()));
    }

    #[test]
    fn prop_set_get_bare_round_trip(value in document()) {
        let db = create_db();
        db.set("doc", value.clone()).unwrap();
        // An empty object is the unset sentinel and reads as absent
        let expected = if value == json!({}) { None } else { Some(jv(value)) };
        prop_assert_eq!(db.get("doc").unwrap(), expected);
    }

    #[test]
    fn prop_set_get_nested_round_trip(field in "[a-z]{1,8}", value in document()) {
        let db = create_db();
        let key = format!("doc.{}", field);
        db.set(&key, value.clone()).unwrap();
        prop_assert_eq!(db.get(&key).unwrap(), Some(jv(value)));
    }

    #[test]
    fn prop_add_subtract_identity(start in -1_000_000i64..1_000_000, delta in -1_000_000i64..1_000_000) {
        let db = create_db();
        db.set("n", start).unwrap();
        db.add("n", delta).unwrap();
        prop_assert_eq!(db.subtract("n", delta).unwrap(), jv(json!(start)));
    }
}
