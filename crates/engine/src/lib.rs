//! Document engine for docstore
//!
//! This crate turns a raw row store into a document store:
//! - Database: handle bound to one table, sharing a backing store
//! - Document operations: get/set/has/delete/push/pull/arithmetic by key
//! - Table management: list, drop, clear, flatten
//! - Export/import snapshots
//! - Query collection: filter/map/reduce/sort over a table
//!
//! Keys address a row by id and optionally a field inside it:
//! `profile` is the whole document, `profile.name` one field.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod database;
pub mod document;
pub mod export;
pub mod query;
pub mod tables;

pub use database::{Database, DocstoreConfig, CONFIG_FILE_NAME};
pub use export::{ExportOptions, Indent, Snapshot, SnapshotData, EXPORT_ORIGIN};
pub use query::compare_fields;
pub use tables::{TableList, TableRows};
