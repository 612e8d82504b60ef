//! Document operations on the bound table
//!
//! Every key is `id` or `id.path.to.field`. The id selects a row; the path,
//! when present, addresses a field inside the row's document. Paths may use
//! numeric segments (`tags.0`) or brackets (`tags[0]`) for array elements.
//!
//! ## Semantics
//!
//! - A row holding the unset sentinel (`{}`) reads as absent.
//! - A path applied to a document that is not an object or array is a
//!   `TypeMismatch` for `get`, `has`, `set` and `delete`.
//! - `set`, `push` and `pull` return the whole document read back after the
//!   write. Arithmetic returns the new number.
//! - Every write, including a bare-key delete, holds the table's write lock
//!   throughout.

use crate::database::Database;
use docstore_core::codec::{self, UNSET_SENTINEL};
use docstore_core::{
    delete_at_path, get_at_path, set_at_path, Error, JsonPath, JsonValue, KeyAddress,
    PathParseError, Result, ValueKind,
};
use serde_json::{Number, Value};
use tracing::debug;

// =============================================================================
// Key Resolution
// =============================================================================

/// Split a key into its row id and parsed path
fn resolve(key: &str) -> Result<(&str, Option<JsonPath>)> {
    let address = KeyAddress::resolve(key)?;
    let Some(text) = address.path else {
        return Ok((address.id, None));
    };

    let path: JsonPath = text.parse().map_err(|e: PathParseError| {
        Error::invalid_key(format!("key '{}' has a malformed path: {}", key, e))
    })?;
    if path.is_empty() {
        return Err(Error::invalid_key(format!("key '{}' has an empty path", key)));
    }
    path.validate()?;
    Ok((address.id, Some(path)))
}

fn require_container(document: &JsonValue) -> Result<()> {
    if document.is_container() {
        Ok(())
    } else {
        Err(Error::type_mismatch("object", document.kind().as_str()))
    }
}

fn row_vanished(table: &str, id: &str) -> Error {
    Error::storage(format!("row '{}' in table '{}' vanished during write", id, table))
}

// =============================================================================
// Arithmetic
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Arith {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
}

impl Arith {
    fn name(self) -> &'static str {
        match self {
            Arith::Add => "add",
            Arith::Subtract => "subtract",
            Arith::Multiply => "multiply",
            Arith::Divide => "divide",
            Arith::Modulus => "modulus",
        }
    }

    /// Exact integer result, if both sides are integers and it fits
    fn integral(self, a: i64, b: i64) -> Option<i64> {
        match self {
            Arith::Add => a.checked_add(b),
            Arith::Subtract => a.checked_sub(b),
            Arith::Multiply => a.checked_mul(b),
            Arith::Divide => match a.checked_rem(b) {
                Some(0) => a.checked_div(b),
                _ => None,
            },
            Arith::Modulus => a.checked_rem(b),
        }
    }

    fn float(self, a: f64, b: f64) -> f64 {
        match self {
            Arith::Add => a + b,
            Arith::Subtract => a - b,
            Arith::Multiply => a * b,
            Arith::Divide => a / b,
            Arith::Modulus => a % b,
        }
    }

    fn apply(self, current: &Number, delta: &Number) -> Result<Number> {
        if let (Some(a), Some(b)) = (current.as_i64(), delta.as_i64()) {
            if let Some(n) = self.integral(a, b) {
                return Ok(Number::from(n));
            }
        }

        let (Some(a), Some(b)) = (current.as_f64(), delta.as_f64()) else {
            return Err(Error::InvalidInput {
                reason: format!("cannot {} {} and {}", self.name(), current, delta),
            });
        };
        let result = self.float(a, b);
        Number::from_f64(result).ok_or_else(|| Error::InvalidInput {
            reason: format!(
                "{} {} by {} gives {}, which is not a finite number",
                self.name(),
                current,
                delta,
                result
            ),
        })
    }
}

// =============================================================================
// Document Store
// =============================================================================

impl Database {
    /// Value at `key`, or `None` if the row or field is absent
    ///
    /// # Errors
    ///
    /// - `InvalidKey` for an empty key, empty id or malformed path
    /// - `TypeMismatch` for a path into a scalar document
    /// - `Serialization` if the stored row cannot be decoded
    pub fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        let (id, path) = resolve(key)?;
        self.ensure_bound()?;
        self.read_at(id, path.as_ref())
    }

    /// Alias of [`get`](Self::get)
    pub fn fetch(&self, key: &str) -> Result<Option<JsonValue>> {
        self.get(key)
    }

    /// Write `value` at `key` and return the whole document read back
    ///
    /// Without a path the value replaces the document. With a path the value
    /// is written into the existing document, creating intermediate objects
    /// (or arrays, for numeric segments) as needed.
    ///
    /// # Example
    ///
    /// ```
    /// use docstore_engine::Database;
    /// use serde_json::json;
    ///
    /// let db = Database::in_memory().unwrap();
    /// let doc = db.set("profile.name", "Alice").unwrap().unwrap();
    /// assert_eq!(*doc, json!({"name": "Alice"}));
    /// ```
    pub fn set(&self, key: &str, value: impl Into<JsonValue>) -> Result<Option<JsonValue>> {
        let (id, path) = resolve(key)?;
        let value = value.into();
        self.ensure_bound()?;

        let lock = self.table_lock(self.table_name());
        let _guard = lock.lock();
        self.write_at(id, path.as_ref(), value)?;
        self.read_at(id, None)
    }

    /// Whether a value is present at `key`
    ///
    /// A present `null` counts; the unset sentinel does not.
    pub fn has(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Alias of [`has`](Self::has)
    pub fn includes(&self, key: &str) -> Result<bool> {
        self.has(key)
    }

    /// Delete the row (bare key) or the field at the path
    ///
    /// Returns whether anything was removed. Array elements are removed and
    /// the rest shift down.
    pub fn delete(&self, key: &str) -> Result<bool> {
        let (id, path) = resolve(key)?;
        self.ensure_bound()?;
        let table = self.table_name();

        let lock = self.table_lock(table);
        let _guard = lock.lock();

        let Some(path) = path else {
            let existed = self.store().delete(table, id)?;
            debug!(table, id, existed, "Deleted row");
            return Ok(existed);
        };

        let Some(text) = self.store().get(table, id)? else {
            return Ok(false);
        };
        let mut document = codec::decode(&text)?;
        require_container(&document)?;
        if delete_at_path(&mut document, &path).is_none() {
            return Ok(false);
        }
        if !self.store().update(table, id, &codec::encode(&document)?)? {
            return Err(row_vanished(table, id));
        }
        debug!(table, id, path = %path, "Deleted field");
        Ok(true)
    }

    /// Append to the array at `key`
    ///
    /// An array argument is concatenated. When nothing is stored at `key`
    /// yet, the array is created (a scalar argument is wrapped).
    ///
    /// # Errors
    ///
    /// `TypeMismatch` if the current value is not an array.
    pub fn push(&self, key: &str, items: impl Into<JsonValue>) -> Result<Option<JsonValue>> {
        let (id, path) = resolve(key)?;
        let items = items.into().into_inner();
        self.ensure_bound()?;

        let lock = self.table_lock(self.table_name());
        let _guard = lock.lock();

        let next = match self.read_at(id, path.as_ref())? {
            None => match items {
                Value::Array(items) => items,
                item => vec![item],
            },
            Some(current) => {
                let kind = current.kind();
                let Value::Array(mut array) = current.into_inner() else {
                    return Err(Error::type_mismatch("array", kind.as_str()));
                };
                match items {
                    Value::Array(items) => array.extend(items),
                    item => array.push(item),
                }
                array
            }
        };

        self.write_at(id, path.as_ref(), Value::Array(next).into())?;
        self.read_at(id, None)
    }

    /// Remove elements equal to `items` from the array at `key`
    ///
    /// When `items` is an array, every element contained in it is removed.
    /// Equality is structural.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` if the current value is absent or not an array.
    pub fn pull(&self, key: &str, items: impl Into<JsonValue>) -> Result<Option<JsonValue>> {
        let (id, path) = resolve(key)?;
        let items = items.into().into_inner();
        self.ensure_bound()?;

        let lock = self.table_lock(self.table_name());
        let _guard = lock.lock();

        let current = self.read_at(id, path.as_ref())?;
        let kind = ValueKind::of_option(current.as_deref());
        let Some(Value::Array(array)) = current.map(JsonValue::into_inner) else {
            return Err(Error::type_mismatch("array", kind.as_str()));
        };

        let remaining: Vec<Value> = match &items {
            Value::Array(unwanted) => array
                .into_iter()
                .filter(|v| !unwanted.contains(v))
                .collect(),
            unwanted => array.into_iter().filter(|v| v != unwanted).collect(),
        };

        self.write_at(id, path.as_ref(), Value::Array(remaining).into())?;
        self.read_at(id, None)
    }

    /// Add `delta` to the number at `key` (absent counts as 0)
    pub fn add(&self, key: &str, delta: impl Into<JsonValue>) -> Result<JsonValue> {
        self.arithmetic(key, Arith::Add, delta.into())
    }

    /// Subtract `delta` from the number at `key` (absent counts as 0)
    pub fn subtract(&self, key: &str, delta: impl Into<JsonValue>) -> Result<JsonValue> {
        self.arithmetic(key, Arith::Subtract, delta.into())
    }

    /// Multiply the number at `key` by `factor` (absent counts as 0)
    pub fn multiply(&self, key: &str, factor: impl Into<JsonValue>) -> Result<JsonValue> {
        self.arithmetic(key, Arith::Multiply, factor.into())
    }

    /// Divide the number at `key` by `divisor` (absent counts as 0)
    ///
    /// Integers stay integers when the division is exact. Division by zero
    /// is `InvalidInput`.
    pub fn divide(&self, key: &str, divisor: impl Into<JsonValue>) -> Result<JsonValue> {
        self.arithmetic(key, Arith::Divide, divisor.into())
    }

    /// Remainder of the number at `key` divided by `divisor`
    pub fn modulus(&self, key: &str, divisor: impl Into<JsonValue>) -> Result<JsonValue> {
        self.arithmetic(key, Arith::Modulus, divisor.into())
    }

    /// Kind of the value at `key`; [`ValueKind::Undefined`] when absent
    pub fn type_of(&self, key: &str) -> Result<ValueKind> {
        Ok(ValueKind::of_option(self.get(key)?.as_deref()))
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn arithmetic(&self, key: &str, op: Arith, delta: JsonValue) -> Result<JsonValue> {
        let Value::Number(delta) = &*delta else {
            return Err(Error::type_mismatch("number", delta.kind().as_str()));
        };
        let (id, path) = resolve(key)?;
        self.ensure_bound()?;

        let lock = self.table_lock(self.table_name());
        let _guard = lock.lock();

        let current = match self.read_at(id, path.as_ref())?.map(JsonValue::into_inner) {
            None | Some(Value::Null) => Number::from(0),
            Some(Value::Number(n)) => n,
            Some(other) => {
                return Err(Error::type_mismatch("number", ValueKind::of(&other).as_str()))
            }
        };

        let result = JsonValue::from(Value::Number(op.apply(&current, delta)?));
        self.write_at(id, path.as_ref(), result.clone())?;
        debug!(table = self.table_name(), key, op = op.name(), "Applied arithmetic");
        Ok(result)
    }

    /// Decoded value at `id` / `path`, honoring the unset sentinel
    fn read_at(&self, id: &str, path: Option<&JsonPath>) -> Result<Option<JsonValue>> {
        let Some(text) = self.store().get(self.table_name(), id)? else {
            return Ok(None);
        };
        if codec::is_unset(&text) {
            return Ok(None);
        }
        let document = codec::decode(&text)?;
        match path {
            None => Ok(Some(document)),
            Some(path) => {
                require_container(&document)?;
                Ok(get_at_path(&document, path).cloned().map(JsonValue::from))
            }
        }
    }

    /// Persist `value` at `id` / `path`. Caller holds the table lock.
    ///
    /// An unseen id starts from the unset sentinel. The row is written once,
    /// after the new document is built and validated; a failed write leaves
    /// the table untouched.
    fn write_at(&self, id: &str, path: Option<&JsonPath>, value: JsonValue) -> Result<()> {
        let table = self.table_name();
        let existing = self.store().get(table, id)?;

        let document = match path {
            None => value,
            Some(path) => {
                let mut document =
                    codec::decode(existing.as_deref().unwrap_or(UNSET_SENTINEL))?;
                require_container(&document)?;
                set_at_path(&mut document, path, value)?;
                document
            }
        };

        document.validate()?;
        let text = codec::encode(&document)?;
        match existing {
            None => self.store().insert(table, id, &text)?,
            Some(_) => {
                if !self.store().update(table, id, &text)? {
                    return Err(row_vanished(table, id));
                }
            }
        }
        debug!(table, id, path = ?path.map(|p| p.to_string()), "Wrote document");
        Ok(())
    }
}
