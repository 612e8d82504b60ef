//! Bounds every persisted document must stay within
//!
//! | Bound | Value |
//! |-------|-------|
//! | Encoded size | 16 MiB |
//! | Container nesting | 100 levels |
//! | Path segments | 256 |
//! | Array length | 1,000,000 |

use serde_json::Value;
use std::io;
use thiserror::Error;

/// Largest encoded document, in bytes
pub const MAX_DOCUMENT_BYTES: usize = 16 * 1024 * 1024;

/// Deepest container nesting; scalars sit at depth 0
pub const MAX_DEPTH: usize = 100;

/// Most segments a field path may have
pub const MAX_PATH_SEGMENTS: usize = 256;

/// Longest array anywhere in a document
pub const MAX_ARRAY_LEN: usize = 1_000_000;

/// A document or path is outside the bounds above
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LimitError {
    /// Encoded document is too large
    #[error("document is {actual} bytes, limit is {max}")]
    DocumentBytes {
        /// Measured size
        actual: usize,
        /// Bound
        max: usize,
    },

    /// Containers nest too deeply
    #[error("document nests {actual} levels deep, limit is {max}")]
    Depth {
        /// Measured depth
        actual: usize,
        /// Bound
        max: usize,
    },

    /// Field path has too many segments
    #[error("path has {actual} segments, limit is {max}")]
    PathSegments {
        /// Segment count
        actual: usize,
        /// Bound
        max: usize,
    },

    /// An array is too long
    #[error("array holds {actual} elements, limit is {max}")]
    ArrayLen {
        /// Element count
        actual: usize,
        /// Bound
        max: usize,
    },
}

/// Structural measurements of a value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shape {
    /// Container nesting depth
    pub depth: usize,
    /// Length of the longest array
    pub widest_array: usize,
}

impl Shape {
    /// Measure `value` without recursing, so hostile nesting cannot blow the stack
    pub fn of(value: &Value) -> Shape {
        let mut shape = Shape::default();
        let mut pending = vec![(value, 0usize)];

        while let Some((current, level)) = pending.pop() {
            match current {
                Value::Array(items) => {
                    shape.depth = shape.depth.max(level + 1);
                    shape.widest_array = shape.widest_array.max(items.len());
                    pending.extend(items.iter().map(|item| (item, level + 1)));
                }
                Value::Object(fields) => {
                    shape.depth = shape.depth.max(level + 1);
                    pending.extend(fields.values().map(|field| (field, level + 1)));
                }
                _ => {}
            }
        }
        shape
    }
}

struct ByteCounter(usize);

impl io::Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0 += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Length of the compact encoding of `value`, without building the text
pub fn encoded_len(value: &Value) -> usize {
    let mut counter = ByteCounter(0);
    match serde_json::to_writer(&mut counter, value) {
        Ok(()) => counter.0,
        Err(_) => usize::MAX,
    }
}

/// Check a whole document
///
/// Shape is checked before size so a deeply nested value is rejected
/// before the serializer walks it.
pub fn check_document(value: &Value) -> Result<(), LimitError> {
    let shape = Shape::of(value);
    if shape.depth > MAX_DEPTH {
        return Err(LimitError::Depth {
            actual: shape.depth,
            max: MAX_DEPTH,
        });
    }
    if shape.widest_array > MAX_ARRAY_LEN {
        return Err(LimitError::ArrayLen {
            actual: shape.widest_array,
            max: MAX_ARRAY_LEN,
        });
    }

    let bytes = encoded_len(value);
    if bytes > MAX_DOCUMENT_BYTES {
        return Err(LimitError::DocumentBytes {
            actual: bytes,
            max: MAX_DOCUMENT_BYTES,
        });
    }
    Ok(())
}

/// Check a field path's segment count
pub fn check_path_len(segments: usize) -> Result<(), LimitError> {
    if segments > MAX_PATH_SEGMENTS {
        Err(LimitError::PathSegments {
            actual: segments,
            max: MAX_PATH_SEGMENTS,
        })
    } else {
        Ok(())
    }
}

/// Check that writing element `index` keeps an array within bounds
pub fn check_array_index(index: usize) -> Result<(), LimitError> {
    if index >= MAX_ARRAY_LEN {
        Err(LimitError::ArrayLen {
            actual: index.saturating_add(1),
            max: MAX_ARRAY_LEN,
        })
    } else {
        Ok(())
    }
}
