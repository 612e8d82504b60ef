//! Snapshot export and import
//!
//! An export is `{"data": ..., "mod": "docstore", "generatedTimestamp": ms}`.
//! `data` holds either the decoded rows of one table (`[{"ID", "data"}]`) or,
//! for a whole-store export, one `{"index", "table", "rows"}` object per table.

use crate::database::Database;
use crate::tables::TableRows;
use docstore_core::codec;
use docstore_core::{validate_table_name, Entry, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Origin tag written into every snapshot
pub const EXPORT_ORIGIN: &str = "docstore";

/// What to export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Table to export; the bound table when `None`
    pub table: Option<String>,
    /// Export every table instead of one
    pub all_tables: bool,
}

impl ExportOptions {
    /// Export one named table
    pub fn table(name: impl Into<String>) -> Self {
        ExportOptions {
            table: Some(name.into()),
            all_tables: false,
        }
    }

    /// Export every table
    pub fn all_tables() -> Self {
        ExportOptions {
            table: None,
            all_tables: true,
        }
    }
}

/// Text layout for [`Snapshot::to_text`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Indent {
    /// Single line
    #[default]
    Compact,
    /// Pretty-printed with tabs
    Tab,
    /// Pretty-printed with N spaces
    Spaces(usize),
}

/// Exported rows
///
/// Untagged; `Rows` is tried first so an empty array reads back as an empty
/// single-table export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotData {
    /// Single-table export
    Rows(Vec<Entry>),
    /// Whole-store export
    Tables(Vec<TableRows>),
}

impl SnapshotData {
    /// Number of rows across all tables
    pub fn row_count(&self) -> usize {
        match self {
            SnapshotData::Tables(tables) => tables.iter().map(|t| t.rows.len()).sum(),
            SnapshotData::Rows(rows) => rows.len(),
        }
    }
}

/// A point-in-time export of one table or the whole store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Exported rows
    pub data: SnapshotData,
    /// Tool that wrote the snapshot
    #[serde(rename = "mod")]
    pub origin: String,
    /// Creation time, milliseconds since the Unix epoch
    #[serde(rename = "generatedTimestamp")]
    pub generated_timestamp: i64,
}

impl Snapshot {
    fn new(data: SnapshotData) -> Self {
        Snapshot {
            data,
            origin: EXPORT_ORIGIN.to_string(),
            generated_timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Parse exported text
    pub fn from_text(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize with the given layout
    pub fn to_text(&self, indent: Indent) -> Result<String> {
        let spaces;
        let indent_bytes: &[u8] = match indent {
            Indent::Compact => return Ok(serde_json::to_string(self)?),
            Indent::Tab => b"\t",
            Indent::Spaces(n) => {
                spaces = " ".repeat(n);
                spaces.as_bytes()
            }
        };

        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent_bytes);
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        String::from_utf8(out).map_err(|e| Error::Serialization {
            reason: e.to_string(),
        })
    }
}

impl Database {
    /// Snapshot of one table or, with `all_tables`, of every table
    pub fn export(&self, options: &ExportOptions) -> Result<Snapshot> {
        let data = if options.all_tables {
            SnapshotData::Tables(self.all_tables()?)
        } else {
            let table = options.table.as_deref().unwrap_or(self.table_name());
            validate_table_name(table)?;
            SnapshotData::Rows(self.materialize(table, None)?)
        };
        Ok(Snapshot::new(data))
    }

    /// [`export`](Self::export) serialized to text
    pub fn export_text(&self, options: &ExportOptions, indent: Indent) -> Result<String> {
        self.export(options)?.to_text(indent)
    }

    /// Write a snapshot back into the store
    ///
    /// Single-table data goes into the bound table; whole-store data goes
    /// into each named table, provisioning it as needed. Existing rows with
    /// the same id are replaced. Returns the number of rows written.
    pub fn import(&self, snapshot: &Snapshot) -> Result<usize> {
        let written = match &snapshot.data {
            SnapshotData::Rows(rows) => self.import_rows(self.table_name(), rows)?,
            SnapshotData::Tables(tables) => {
                let mut total = 0;
                for t in tables {
                    total += self.import_rows(&t.table, &t.rows)?;
                }
                total
            }
        };
        info!(
            table = self.table_name(),
            rows = written,
            origin = %snapshot.origin,
            "Imported snapshot"
        );
        Ok(written)
    }

    fn import_rows(&self, table: &str, rows: &[Entry]) -> Result<usize> {
        validate_table_name(table)?;
        self.store().ensure_table(table)?;

        let lock = self.table_lock(table);
        let _guard = lock.lock();
        for entry in rows {
            entry.document.validate()?;
            self.store()
                .upsert(table, &entry.id, &codec::encode(&entry.document)?)?;
        }
        Ok(rows.len())
    }
}
