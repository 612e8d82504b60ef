//! docstore Comprehensive Test Suite
//!
//! End-to-end coverage of the public `docstore` API over the in-memory store
//! (and the SQLite store with the `sqlite` feature).
//!
//! ## Modules
//!
//! - `document_ops`: get/set/has/delete/push/pull/arithmetic by key
//! - `table_ops`: table switching, listing, dropping, export/import
//! - `query_ops`: filter/map/reduce/sort and prefix/suffix matches
//! - `properties`: proptest properties for keys and round-trips
//! - `sqlite_backend`: persistence across reopen (`sqlite` feature)
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test docstore_comprehensive
//! cargo test --test docstore_comprehensive --features sqlite
//! cargo test --test docstore_comprehensive query_ops::
//! ```

use docstore::{Database, JsonValue};
use serde_json::Value;

pub mod document_ops;
pub mod properties;
pub mod query_ops;
#[cfg(feature = "sqlite")]
pub mod sqlite_backend;
pub mod table_ops;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Route `tracing` output to the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Fresh in-memory database bound to the default table
pub fn create_db() -> Database {
    init_tracing();
    Database::in_memory().expect("in-memory database should open")
}

/// Shorthand for comparing against `json!` literals
pub fn jv(value: Value) -> JsonValue {
    JsonValue::from(value)
}
