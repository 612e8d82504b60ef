//! Error types for docstore
//!
//! Every failure that can surface from the document store, the table manager
//! or a backing row store is represented by [`Error`]. We use `thiserror` for
//! automatic `Display` and `Error` trait implementations.
//!
//! # Categories
//!
//! | Category | Variants | Description |
//! |----------|----------|-------------|
//! | Validation | `InvalidKey`, `InvalidTable`, `InvalidInput` | Bad caller input |
//! | Type | `TypeMismatch` | Operation does not fit the stored value |
//! | Limits | `LimitExceeded` | Document or path over a size limit |
//! | Store | `StoreUnavailable`, `Storage` | Backing row store failures |
//! | System | `Serialization`, `Config` | Encoding and configuration failures |
//!
//! A missing document is never an error: reads return `Ok(None)` or `Ok(false)`.

use crate::json::JsonPathError;
use crate::limits::LimitError;
use crate::key::KeyError;
use thiserror::Error;

/// Result type alias for docstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for docstore
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    // ==================== Validation ====================
    /// Key is empty, has an empty identifier, or carries a malformed path
    #[error("invalid key: {reason}")]
    InvalidKey {
        /// Why the key was rejected
        reason: String,
    },

    /// Table name cannot be used by the backing store
    #[error("invalid table name: {reason}")]
    InvalidTable {
        /// Why the table name was rejected
        reason: String,
    },

    /// Invalid argument (e.g. an arithmetic result that is not a finite number)
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Why the input was rejected
        reason: String,
    },

    // ==================== Type ====================
    /// The stored value (or an operand) has the wrong kind for the operation
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Kind the operation needs
        expected: String,
        /// Kind that was found
        actual: String,
    },

    // ==================== Limits ====================
    /// Document or path exceeds a size limit
    #[error("limit exceeded: {0}")]
    LimitExceeded(#[from] LimitError),

    // ==================== Store ====================
    /// Backing row store could not be opened or a table could not be provisioned
    #[error("store unavailable: {reason}")]
    StoreUnavailable {
        /// Underlying failure
        reason: String,
    },

    /// A single backing-store call failed
    #[error("storage error: {reason}")]
    Storage {
        /// Underlying failure
        reason: String,
    },

    // ==================== System ====================
    /// Encoding or decoding a document failed
    #[error("serialization error: {reason}")]
    Serialization {
        /// Underlying failure
        reason: String,
    },

    /// Configuration file could not be read, parsed or written
    #[error("config error: {reason}")]
    Config {
        /// Underlying failure
        reason: String,
    },
}

impl Error {
    /// Build an `InvalidKey` error
    pub fn invalid_key(reason: impl Into<String>) -> Self {
        Error::InvalidKey {
            reason: reason.into(),
        }
    }

    /// Build a `TypeMismatch` error
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Error::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Build a `Storage` error
    pub fn storage(reason: impl Into<String>) -> Self {
        Error::Storage {
            reason: reason.into(),
        }
    }

    /// Build a `StoreUnavailable` error
    pub fn store_unavailable(reason: impl Into<String>) -> Self {
        Error::StoreUnavailable {
            reason: reason.into(),
        }
    }

    /// Whether this error came from the backing store rather than the caller
    pub fn is_store_error(&self) -> bool {
        matches!(self, Error::StoreUnavailable { .. } | Error::Storage { .. })
    }
}

impl From<KeyError> for Error {
    fn from(e: KeyError) -> Self {
        Error::invalid_key(e.to_string())
    }
}

impl From<JsonPathError> for Error {
    fn from(e: JsonPathError) -> Self {
        match e {
            JsonPathError::TypeMismatch { expected, found } => Error::type_mismatch(expected, found),
            JsonPathError::Limit(limit) => Error::LimitExceeded(limit),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization {
            reason: e.to_string(),
        }
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::storage(e.to_string())
    }
}
