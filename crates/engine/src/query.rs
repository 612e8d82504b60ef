//! Query collection: the bound table as a sequence of entries
//!
//! Every call scans the table afresh and decodes each row into an
//! [`Entry`]. Rows that fail to decode are skipped with a warning; a scan
//! never fails because of one bad row. Rows holding the unset sentinel decode
//! to an empty object and are included.
//!
//! Sequence operations are plain methods over the materialized `Vec<Entry>`.

use crate::database::Database;
use docstore_core::codec;
use docstore_core::{Entry, JsonPath, JsonValue, Result};
use serde_json::Value;
use std::cmp::Ordering;
use tracing::warn;

// =============================================================================
// Sort Keys
// =============================================================================

/// Resolve a sort field inside a document
///
/// A leading `.` is ignored. Unparsable fields resolve to nothing.
fn resolve_field<'a>(document: &'a JsonValue, field: &str) -> Option<&'a Value> {
    let path: JsonPath = field.parse().ok()?;
    docstore_core::get_at_path(document, &path)
}

/// Rank of a value kind when two fields have different kinds
fn kind_rank(value: Option<&Value>) -> u8 {
    match value {
        Some(Value::String(_)) => 4,
        Some(Value::Number(_)) => 3,
        Some(Value::Bool(_)) => 2,
        Some(Value::Null) => 1,
        // Missing, arrays and objects are not comparable
        _ => 0,
    }
}

/// Total order over sort fields
///
/// Same-kind scalars compare by value (numbers as f64, strings bytewise).
/// Otherwise kinds order as missing < null < bool < number < string.
pub fn compare_fields(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let fa = a.as_f64().unwrap_or(f64::NAN);
            let fb = b.as_f64().unwrap_or(f64::NAN);
            fa.total_cmp(&fb)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        _ => kind_rank(left).cmp(&kind_rank(right)),
    }
}

/// Sort entries descending by a document field; ties keep their order
fn sort_desc_by_field(entries: &mut [Entry], field: &str) {
    entries.sort_by(|a, b| {
        compare_fields(
            resolve_field(&b.document, field),
            resolve_field(&a.document, field),
        )
    });
}

// =============================================================================
// Query Collection
// =============================================================================

impl Database {
    /// Decoded rows of `table` in insertion order, up to `limit`
    pub(crate) fn materialize(&self, table: &str, limit: Option<usize>) -> Result<Vec<Entry>> {
        self.store().ensure_table(table)?;
        let rows = self.store().scan(table)?;
        let cap = limit.filter(|n| *n > 0).unwrap_or(usize::MAX);

        let mut entries = Vec::with_capacity(rows.len().min(cap));
        for row in rows {
            if entries.len() >= cap {
                break;
            }
            match codec::decode(&row.json) {
                Ok(document) => entries.push(Entry {
                    id: row.id,
                    document,
                }),
                Err(e) => warn!(table, id = %row.id, error = %e, "Skipping undecodable row"),
            }
        }
        Ok(entries)
    }

    /// Every decodable entry, capped at `limit` when given (0 means no cap)
    pub fn scan(&self, limit: Option<usize>) -> Result<Vec<Entry>> {
        self.materialize(self.table_name(), limit)
    }

    /// Every decodable entry of the bound table
    pub fn all(&self) -> Result<Vec<Entry>> {
        self.scan(None)
    }

    /// Alias of [`all`](Self::all)
    pub fn fetch_all(&self) -> Result<Vec<Entry>> {
        self.all()
    }

    /// Owning iterator over a snapshot of the bound table
    pub fn iter(&self) -> Result<std::vec::IntoIter<Entry>> {
        Ok(self.all()?.into_iter())
    }

    /// Entries matching `predicate`
    pub fn filter<F>(&self, mut predicate: F) -> Result<Vec<Entry>>
    where
        F: FnMut(&Entry) -> bool,
    {
        Ok(self.all()?.into_iter().filter(|e| predicate(e)).collect())
    }

    /// `f` applied to every entry
    pub fn map<T, F>(&self, f: F) -> Result<Vec<T>>
    where
        F: FnMut(&Entry) -> T,
    {
        Ok(self.all()?.iter().map(f).collect())
    }

    /// `f` applied to every entry, results flattened one level
    pub fn flat_map<I, F>(&self, f: F) -> Result<Vec<I::Item>>
    where
        I: IntoIterator,
        F: FnMut(&Entry) -> I,
    {
        Ok(self.all()?.iter().flat_map(f).collect())
    }

    /// Entries sorted by `compare` (stable)
    pub fn sort_by<F>(&self, compare: F) -> Result<Vec<Entry>>
    where
        F: FnMut(&Entry, &Entry) -> Ordering,
    {
        let mut entries = self.all()?;
        entries.sort_by(compare);
        Ok(entries)
    }

    /// Fold entries front to back
    pub fn reduce<B, F>(&self, init: B, f: F) -> Result<B>
    where
        F: FnMut(B, &Entry) -> B,
    {
        Ok(self.all()?.iter().fold(init, f))
    }

    /// Fold entries back to front
    pub fn reduce_right<B, F>(&self, init: B, f: F) -> Result<B>
    where
        F: FnMut(B, &Entry) -> B,
    {
        Ok(self.all()?.iter().rev().fold(init, f))
    }

    /// Call `f` on every entry
    pub fn for_each<F>(&self, f: F) -> Result<()>
    where
        F: FnMut(&Entry),
    {
        self.all()?.iter().for_each(f);
        Ok(())
    }

    /// Whether any entry matches
    pub fn some<F>(&self, mut predicate: F) -> Result<bool>
    where
        F: FnMut(&Entry) -> bool,
    {
        Ok(self.all()?.iter().any(|e| predicate(e)))
    }

    /// Whether every entry matches (true for an empty table)
    pub fn every<F>(&self, mut predicate: F) -> Result<bool>
    where
        F: FnMut(&Entry) -> bool,
    {
        Ok(self.all()?.iter().all(|e| predicate(e)))
    }

    /// First matching entry
    pub fn find<F>(&self, mut predicate: F) -> Result<Option<Entry>>
    where
        F: FnMut(&Entry) -> bool,
    {
        Ok(self.all()?.into_iter().find(|e| predicate(e)))
    }

    /// Position of the first matching entry
    pub fn find_index<F>(&self, predicate: F) -> Result<Option<usize>>
    where
        F: FnMut(&Entry) -> bool,
    {
        Ok(self.all()?.iter().position(predicate))
    }

    /// Position of the first entry structurally equal to `entry`, starting at `from`
    pub fn index_of(&self, entry: &Entry, from: usize) -> Result<Option<usize>> {
        Ok(self
            .all()?
            .iter()
            .skip(from)
            .position(|e| e == entry)
            .map(|i| i + from))
    }

    /// Entries whose id starts with `prefix`
    ///
    /// With `sort`, results are ordered descending by that document field
    /// (a dot path, leading `.` ignored).
    ///
    /// # Example
    ///
    /// ```
    /// use docstore_engine::Database;
    /// use serde_json::json;
    ///
    /// let db = Database::in_memory().unwrap();
    /// db.set("user_1", json!({"score": 10})).unwrap();
    /// db.set("user_2", json!({"score": 30})).unwrap();
    /// db.set("admin", json!({"score": 99})).unwrap();
    ///
    /// let top = db.starts_with("user_", Some(".score")).unwrap();
    /// let ids: Vec<&str> = top.iter().map(|e| e.id.as_str()).collect();
    /// assert_eq!(ids, vec!["user_2", "user_1"]);
    /// ```
    pub fn starts_with(&self, prefix: &str, sort: Option<&str>) -> Result<Vec<Entry>> {
        let mut entries = self.filter(|e| e.id.starts_with(prefix))?;
        if let Some(field) = sort {
            sort_desc_by_field(&mut entries, field);
        }
        Ok(entries)
    }

    /// Entries whose id ends with `suffix`; `sort` as in [`starts_with`](Self::starts_with)
    pub fn ends_with(&self, suffix: &str, sort: Option<&str>) -> Result<Vec<Entry>> {
        let mut entries = self.filter(|e| e.id.ends_with(suffix))?;
        if let Some(field) = sort {
            sort_desc_by_field(&mut entries, field);
        }
        Ok(entries)
    }

    /// Every id, in scan order
    pub fn key_array(&self) -> Result<Vec<String>> {
        Ok(self.all()?.into_iter().map(|e| e.id).collect())
    }

    /// Every document, in scan order
    pub fn value_array(&self) -> Result<Vec<JsonValue>> {
        Ok(self.all()?.into_iter().map(|e| e.document).collect())
    }

    /// The bound table as a JSON array of `{"ID", "data"}` objects
    pub fn to_json(&self) -> Result<JsonValue> {
        Ok(JsonValue::from(serde_json::to_value(self.all()?)?))
    }
}
