//! Key addressing for docstore
//!
//! A key names a document and, optionally, a field inside it:
//!
//! | Key | Document id | Path |
//! |-----|-------------|------|
//! | `profile` | `profile` | none |
//! | `profile.name` | `profile` | `name` |
//! | `profile.address.city` | `profile` | `address.city` |
//! | `scores.0` | `scores` | `0` |
//!
//! The key is split on the FIRST `.` only; the remainder is kept verbatim and
//! parsed later into a [`JsonPath`](crate::json::JsonPath).
//!
//! ## Rules
//!
//! - Keys must not be empty
//! - The document id (text before the first `.`) must not be empty
//! - Keys must not exceed [`MAX_KEY_BYTES`]
//! - A trailing `.` leaves an empty remainder, which means "no path"

use thiserror::Error;

/// Maximum key length in bytes
pub const MAX_KEY_BYTES: usize = 1024;

/// A key split into its document id and optional nested path
///
/// Borrowed from the caller's key string; parsing never allocates.
///
/// # Examples
///
/// ```
/// use docstore_core::key::KeyAddress;
///
/// let addr = KeyAddress::parse("profile.name").unwrap();
/// assert_eq!(addr.id, "profile");
/// assert_eq!(addr.path, Some("name"));
///
/// let addr = KeyAddress::parse("profile").unwrap();
/// assert_eq!(addr.path, None);
///
/// assert!(KeyAddress::parse("").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyAddress<'a> {
    /// Row identifier
    pub id: &'a str,
    /// Dot-delimited path inside the document, if any
    pub path: Option<&'a str>,
}

impl<'a> KeyAddress<'a> {
    /// Split a key into id and path
    ///
    /// Returns `None` when the key cannot address a document (empty key or
    /// empty id). Callers surface that as an invalid-key error.
    pub fn parse(key: &'a str) -> Option<Self> {
        let (id, path) = match key.split_once('.') {
            Some((id, rest)) => (id, Some(rest).filter(|p| !p.is_empty())),
            None => (key, None),
        };
        if id.is_empty() {
            return None;
        }
        Some(KeyAddress { id, path })
    }

    /// Validate and split a key, reporting why it was rejected
    pub fn resolve(key: &'a str) -> Result<Self, KeyError> {
        validate_key(key)?;
        Self::parse(key).ok_or(KeyError::EmptyId)
    }

    /// Whether the key addresses a nested field
    pub fn has_path(&self) -> bool {
        self.path.is_some()
    }
}

/// Validate a key before parsing
///
/// # Examples
///
/// ```
/// use docstore_core::key::validate_key;
///
/// assert!(validate_key("user").is_ok());
/// assert!(validate_key("user.name").is_ok());
/// assert!(validate_key("").is_err());
/// ```
pub fn validate_key(key: &str) -> Result<(), KeyError> {
    if key.is_empty() {
        return Err(KeyError::Empty);
    }

    let len = key.len();
    if len > MAX_KEY_BYTES {
        return Err(KeyError::TooLong {
            actual: len,
            max: MAX_KEY_BYTES,
        });
    }

    Ok(())
}

/// Key validation errors
///
/// These map to [`Error::InvalidKey`](crate::Error::InvalidKey).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Key is empty
    #[error("key is empty")]
    Empty,

    /// Nothing precedes the first `.`
    #[error("key has an empty document id")]
    EmptyId,

    /// Key exceeds maximum length
    #[error("key too long: {actual} bytes exceeds maximum {max}")]
    TooLong {
        /// Actual key length in bytes
        actual: usize,
        /// Maximum allowed
        max: usize,
    },
}
