//! Storage layer for docstore
//!
//! This crate implements the backing row stores behind `RowStore`:
//! - MemoryStore: insertion-ordered tables under a parking_lot RwLock
//! - SqliteStore: one SQLite table per docstore table (`sqlite` feature)
//!
//! Stores only see raw `(id, text)` rows. Encoding, key parsing and path
//! semantics live in the engine.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
