//! JSON document types and path operations
//!
//! - JsonValue: the value every document is stored as
//! - JsonPath / PathSegment: a field address inside a document
//!   (`user.name`, `items.0`, `items[0]`)
//! - ValueKind: runtime kind of a resolved value, arrays distinct from objects
//!
//! Reads, writes and deletes descend through `serde_json::Value` one segment
//! at a time. A segment that looks like a non-negative integer addresses an
//! element when the current container is an array and a field name
//! otherwise. Writes create missing intermediate containers by the same
//! rule: an index-like next segment creates an array, anything else an
//! object.

use crate::limits::{self, LimitError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// JsonValue
// =============================================================================

/// A JSON document or a value inside one
///
/// Derefs to `serde_json::Value`, so the usual accessors (`as_str`,
/// `is_object`, indexing) are available directly.
///
/// ```
/// use docstore_core::JsonValue;
///
/// let n = JsonValue::from(42i64);
/// assert_eq!(n.as_i64(), Some(42));
/// assert!(JsonValue::from(serde_json::json!({"a": 1})).is_container());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonValue(Value);

impl JsonValue {
    /// Unwrap into the underlying `serde_json::Value`
    pub fn into_inner(self) -> Value {
        self.0
    }

    /// Whether a path can descend into this value (object or array)
    pub fn is_container(&self) -> bool {
        matches!(self.0, Value::Object(_) | Value::Array(_))
    }

    /// Runtime kind of this value
    pub fn kind(&self) -> ValueKind {
        ValueKind::of(&self.0)
    }

    /// Check the document against the bounds in [`crate::limits`]
    pub fn validate(&self) -> Result<(), LimitError> {
        limits::check_document(&self.0)
    }
}

impl FromStr for JsonValue {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map(JsonValue)
    }
}

impl Deref for JsonValue {
    type Target = Value;

    fn deref(&self) -> &Value {
        &self.0
    }
}

impl DerefMut for JsonValue {
    fn deref_mut(&mut self) -> &mut Value {
        &mut self.0
    }
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<Value> for JsonValue {
    fn from(v: Value) -> Self {
        JsonValue(v)
    }
}

impl From<JsonValue> for Value {
    fn from(v: JsonValue) -> Self {
        v.0
    }
}

macro_rules! from_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for JsonValue {
                fn from(v: $t) -> Self {
                    JsonValue(Value::from(v))
                }
            }
        )*
    };
}

from_scalar!(bool, i32, i64, u32, u64, &str, String);

/// Non-finite floats have no JSON form and become null
impl From<f64> for JsonValue {
    fn from(v: f64) -> Self {
        JsonValue(serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number))
    }
}

impl<T: Into<JsonValue>> From<Vec<T>> for JsonValue {
    fn from(items: Vec<T>) -> Self {
        JsonValue(Value::Array(
            items.into_iter().map(|item| item.into().0).collect(),
        ))
    }
}

impl<T: Into<JsonValue>> From<Option<T>> for JsonValue {
    fn from(v: Option<T>) -> Self {
        v.map_or_else(JsonValue::default, Into::into)
    }
}

// =============================================================================
// ValueKind
// =============================================================================

/// Runtime kind of a resolved value
///
/// Arrays are distinguished from plain objects; an absent value is
/// [`ValueKind::Undefined`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// JSON string
    String,
    /// JSON number
    Number,
    /// JSON boolean
    Boolean,
    /// JSON object
    Object,
    /// JSON array
    Array,
    /// JSON null
    Null,
    /// No value at the key
    Undefined,
}

impl ValueKind {
    /// Kind of a present value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Kind of a possibly absent value
    pub fn of_option(value: Option<&Value>) -> Self {
        value.map_or(ValueKind::Undefined, ValueKind::of)
    }

    /// Lowercase tag name
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::Object => "object",
            ValueKind::Array => "array",
            ValueKind::Null => "null",
            ValueKind::Undefined => "undefined",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// JsonPath and PathSegment
// =============================================================================

/// Malformed field path; `at` is a byte offset into the path text
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// A `.` with nothing after it (`a..b`, `a.`)
    #[error("empty field name at byte {at}")]
    EmptyKey {
        /// Offset of the missing name
        at: usize,
    },
    /// `[` without its `]`
    #[error("unclosed bracket at byte {at}")]
    UnclosedBracket {
        /// Offset of the `[`
        at: usize,
    },
    /// Bracket contents are not a non-negative integer
    #[error("invalid array index {text:?} at byte {at}")]
    InvalidIndex {
        /// Offset of the bracket contents
        at: usize,
        /// Bracket contents
        text: String,
    },
    /// A character that cannot appear here
    #[error("unexpected {found:?} at byte {at}")]
    UnexpectedChar {
        /// The character
        found: char,
        /// Its offset
        at: usize,
    },
}

/// One step of a [`JsonPath`]
///
/// Dot-separated tokens are [`PathSegment::Key`] even when numeric;
/// bracketed tokens are [`PathSegment::Index`]. Either addresses an element
/// when it is index-like and the container is an array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    /// `.name`
    Key(String),
    /// `[n]`
    Index(usize),
}

impl PathSegment {
    /// Element index this segment addresses, if it is index-like
    ///
    /// Keys count only in canonical form: `"0"` and `"12"` are indices,
    /// `"01"`, `"-1"` and `"1.5"` are not.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Index(i) => Some(*i),
            PathSegment::Key(k) => {
                let digits = !k.is_empty() && k.bytes().all(|b| b.is_ascii_digit());
                let canonical = digits && (k.len() == 1 || !k.starts_with('0'));
                canonical.then(|| k.parse().ok()).flatten()
            }
        }
    }

    /// Field name this segment addresses in an object
    pub fn field_name(&self) -> Cow<'_, str> {
        match self {
            PathSegment::Key(k) => Cow::Borrowed(k.as_str()),
            PathSegment::Index(i) => Cow::Owned(i.to_string()),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, ".{}", k),
            PathSegment::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// A field address inside a document
///
/// | Text | Meaning |
/// |------|---------|
/// | `user` | field `user` |
/// | `user.name` | nested field |
/// | `items.0` | field `0`, or element 0 when `items` is an array |
/// | `items[0]` | element 0 |
/// | (empty) | the whole document |
///
/// A leading `.` is ignored. Field names may hold any character except
/// `.`, `[` and `]`.
///
/// ```
/// use docstore_core::json::JsonPath;
///
/// let path: JsonPath = "items[0].sku".parse().unwrap();
/// assert_eq!(path, JsonPath::root().field("items").element(0).field("sku"));
/// assert_eq!(path.to_string(), "items[0].sku");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// The empty path, addressing the whole document
    pub fn root() -> Self {
        JsonPath::default()
    }

    /// Append a field step
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(name.into()));
        self
    }

    /// Append an element step
    pub fn element(mut self, index: usize) -> Self {
        self.segments.push(PathSegment::Index(index));
        self
    }

    /// Steps in order
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether this addresses the whole document
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Check the segment count against [`limits::MAX_PATH_SEGMENTS`]
    pub fn validate(&self) -> Result<(), LimitError> {
        limits::check_path_len(self.segments.len())
    }
}

impl FromStr for JsonPath {
    type Err = PathParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let body = text.strip_prefix('.').unwrap_or(text);
        let offset = text.len() - body.len();

        let mut segments = Vec::new();
        let mut chars = body.char_indices().peekable();
        // Set after a '.' until the field name that must follow it
        let mut need_key = false;

        while let Some((pos, c)) = chars.next() {
            let at = offset + pos;
            match c {
                '[' if !need_key => {
                    let mut inner = String::new();
                    loop {
                        match chars.next() {
                            Some((_, ']')) => break,
                            Some((_, d)) => inner.push(d),
                            None => return Err(PathParseError::UnclosedBracket { at }),
                        }
                    }
                    match inner.parse() {
                        Ok(index) => segments.push(PathSegment::Index(index)),
                        Err(_) => {
                            return Err(PathParseError::InvalidIndex {
                                at: at + 1,
                                text: inner,
                            })
                        }
                    }
                }
                '.' if !need_key && !segments.is_empty() => need_key = true,
                '.' | '[' => return Err(PathParseError::EmptyKey { at }),
                ']' => return Err(PathParseError::UnexpectedChar { found: c, at }),
                _ if need_key || segments.is_empty() => {
                    let mut name = String::from(c);
                    while let Some(&(_, next)) = chars.peek() {
                        if matches!(next, '.' | '[' | ']') {
                            break;
                        }
                        name.push(next);
                        chars.next();
                    }
                    segments.push(PathSegment::Key(name));
                    need_key = false;
                }
                _ => return Err(PathParseError::UnexpectedChar { found: c, at }),
            }
        }

        if need_key {
            return Err(PathParseError::EmptyKey { at: text.len() });
        }
        Ok(JsonPath { segments })
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(k) if i == 0 => f.write_str(k)?,
                other => fmt::Display::fmt(other, f)?,
            }
        }
        Ok(())
    }
}

// =============================================================================
// Path Operations
// =============================================================================

/// Error type for path operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JsonPathError {
    /// A container on the path has the wrong kind for the next segment
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Expected type
        expected: &'static str,
        /// Actual type found
        found: &'static str,
    },

    /// Write would grow an array past the limit
    #[error(transparent)]
    Limit(#[from] LimitError),
}

fn step<'a>(current: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match current {
        Value::Object(obj) => obj.get(&*segment.field_name()),
        Value::Array(arr) => arr.get(segment.as_index()?),
        _ => None,
    }
}

fn step_mut<'a>(current: &'a mut Value, segment: &PathSegment) -> Option<&'a mut Value> {
    match current {
        Value::Object(obj) => obj.get_mut(&*segment.field_name()),
        Value::Array(arr) => arr.get_mut(segment.as_index()?),
        _ => None,
    }
}

/// Get the value at a path within a document
///
/// Returns `None` when any segment is missing or runs into a scalar.
///
/// ```
/// use docstore_core::json::{get_at_path, JsonPath, JsonValue};
///
/// let doc: JsonValue = serde_json::json!({"user": {"scores": [100, 95]}}).into();
/// let path: JsonPath = "user.scores.1".parse().unwrap();
/// assert_eq!(get_at_path(&doc, &path).and_then(|v| v.as_i64()), Some(95));
/// ```
pub fn get_at_path<'a>(value: &'a JsonValue, path: &JsonPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(&value.0, |current, segment| step(current, segment))
}

/// Set the value at a path, creating intermediate containers as needed
///
/// A missing or scalar intermediate is replaced by an array when the next
/// segment is index-like and by an object otherwise. Writing past the end of
/// an array pads the gap with nulls. A non-index key into an array is a type
/// mismatch, as is any path into a scalar root.
///
/// ```
/// use docstore_core::json::{set_at_path, JsonPath, JsonValue};
///
/// let mut doc = JsonValue::from(serde_json::json!({}));
/// let path: JsonPath = "user.tags.0".parse().unwrap();
/// set_at_path(&mut doc, &path, JsonValue::from("red")).unwrap();
/// assert_eq!(doc.to_string(), r#"{"user":{"tags":["red"]}}"#);
/// ```
pub fn set_at_path(
    root: &mut JsonValue,
    path: &JsonPath,
    value: JsonValue,
) -> Result<(), JsonPathError> {
    assign(&mut root.0, path.segments(), value.0)
}

fn assign(current: &mut Value, segments: &[PathSegment], value: Value) -> Result<(), JsonPathError> {
    let Some((segment, rest)) = segments.split_first() else {
        *current = value;
        return Ok(());
    };

    let slot = match current {
        Value::Object(obj) => obj
            .entry(segment.field_name().into_owned())
            .or_insert(Value::Null),
        Value::Array(arr) => {
            let idx = segment.as_index().ok_or(JsonPathError::TypeMismatch {
                expected: "array index",
                found: "key",
            })?;
            limits::check_array_index(idx)?;
            if idx >= arr.len() {
                arr.resize(idx + 1, Value::Null);
            }
            &mut arr[idx]
        }
        other => {
            return Err(JsonPathError::TypeMismatch {
                expected: "object",
                found: ValueKind::of(other).as_str(),
            })
        }
    };

    if let Some(next) = rest.first() {
        if !slot.is_object() && !slot.is_array() {
            *slot = if next.as_index().is_some() {
                Value::Array(Vec::new())
            } else {
                Value::Object(Map::new())
            };
        }
    }
    assign(slot, rest, value)
}

/// Delete the value at a path
///
/// For objects this removes the field; for arrays it removes the element and
/// shifts the rest down. Deleting the root takes the whole value and leaves
/// null behind.
///
/// Returns the removed value, or `None` if nothing was at the path.
///
/// ```
/// use docstore_core::json::{delete_at_path, JsonValue};
///
/// let mut doc: JsonValue = r#"{"name": "Alice", "age": 30}"#.parse().unwrap();
/// let removed = delete_at_path(&mut doc, &"name".parse().unwrap());
/// assert_eq!(removed.unwrap().as_str(), Some("Alice"));
/// assert_eq!(doc.to_string(), r#"{"age":30}"#);
/// ```
pub fn delete_at_path(root: &mut JsonValue, path: &JsonPath) -> Option<JsonValue> {
    let Some((last, parents)) = path.segments().split_last() else {
        return Some(std::mem::take(root));
    };

    let mut parent = &mut root.0;
    for segment in parents {
        parent = step_mut(parent, segment)?;
    }

    let removed = match parent {
        Value::Object(obj) => obj.remove(&*last.field_name()),
        Value::Array(arr) => {
            let idx = last.as_index()?;
            (idx < arr.len()).then(|| arr.remove(idx))
        }
        _ => None,
    };
    removed.map(JsonValue)
}
