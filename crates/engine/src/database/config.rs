//! Store configuration via `docstore.toml`
//!
//! A config file names the backing database file, the table handles bind to
//! by default, and whether the backing store should use WAL journaling.

use docstore_core::{validate_table_name, Error, Result, DEFAULT_TABLE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file name conventionally placed next to the database file.
pub const CONFIG_FILE_NAME: &str = "docstore.toml";

/// Store configuration loaded from `docstore.toml`.
///
/// # Example
///
/// ```toml
/// name = "json.sqlite"
/// path = "./data"
/// table = "JSON"
/// wal_mode = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocstoreConfig {
    /// Database file name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Directory holding the database file. Created on open if missing.
    #[serde(default = "default_path")]
    pub path: String,
    /// Table that new handles are bound to.
    #[serde(default = "default_table")]
    pub table: String,
    /// Ask the backing store for WAL journaling. Passed through as-is.
    #[serde(default)]
    pub wal_mode: bool,
}

fn default_name() -> String {
    "json.sqlite".to_string()
}

fn default_path() -> String {
    "./".to_string()
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

impl Default for DocstoreConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            path: default_path(),
            table: default_table(),
            wal_mode: false,
        }
    }
}

impl DocstoreConfig {
    /// Full path of the database file (`path` joined with `name`).
    pub fn file_path(&self) -> PathBuf {
        Path::new(&self.path).join(&self.name)
    }

    /// Check the values a store cannot open with.
    ///
    /// # Errors
    ///
    /// Returns `Config` for an empty file name and `InvalidTable` for a bad
    /// default table.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Config {
                reason: "database file name is empty".into(),
            });
        }
        validate_table_name(&self.table)
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# docstore configuration
#
# Database file name and the directory it lives in.
# The directory is created on open if it does not exist.
name = "json.sqlite"
path = "./"

# Table new handles are bound to (default: "JSON").
# Letters, digits, "_" and "-" only.
table = "JSON"

# Request WAL journaling from the backing store (default: false).
wal_mode = false
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            reason: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;
        let config: DocstoreConfig = toml::from_str(&content).map_err(|e| Error::Config {
            reason: format!("Failed to parse config file '{}': {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| Error::Config {
                reason: format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ),
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config {
            reason: format!("Failed to serialize config: {}", e),
        })?;
        std::fs::write(path, content).map_err(|e| Error::Config {
            reason: format!("Failed to write config file '{}': {}", path.display(), e),
        })
    }
}
