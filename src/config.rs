//! Database configuration and durability levels
//!
//! Every field has a default, so a JSON config file only needs to name the
//! settings it changes.

use crate::error::{DbError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const METADATA_TEMP_EXTENSION: &str = "tmp";

/// Durability level for writes
///
/// Trades write latency against how much survives a crash:
/// - NoSync: data is flushed to the OS but never fsynced
/// - Synchronous: every append and catalog rewrite is fsynced before returning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DurabilityLevel {
    /// Flush only. A crash mid-append can leave a torn trailing line, which
    /// the table reader skips.
    #[default]
    NoSync,

    /// `sync_all` after every row append and every catalog rewrite.
    Synchronous,
}

impl DurabilityLevel {
    pub fn requires_immediate_sync(&self) -> bool {
        matches!(self, Self::Synchronous)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::NoSync => "flush only (no fsync)",
            Self::Synchronous => "fsync on every write",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DBConfig {
    /// Directory holding the metadata file and all table files
    pub data_dir: PathBuf,

    /// Catalog file name inside `data_dir`
    pub metadata_file: String,

    /// Extension of per-table data files (`<table>.<ext>`)
    pub table_extension: String,

    /// Minimum rendered width of a SELECT result column
    pub min_column_width: usize,

    pub durability_level: DurabilityLevel,
}

impl Default for DBConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            metadata_file: "metadata.db".to_string(),
            table_extension: "tbl".to_string(),
            min_column_width: 10,
            durability_level: DurabilityLevel::default(),
        }
    }
}

impl DBConfig {
    /// Load a config from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            DbError::Config(format!("cannot read {}: {}", path.as_ref().display(), e))
        })?;
        let config: DBConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_data_dir<P: Into<PathBuf>>(mut self, data_dir: P) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_durability(mut self, level: DurabilityLevel) -> Self {
        self.durability_level = level;
        self
    }

    /// Config rooted at `data_dir` with defaults elsewhere (used by tests)
    pub fn for_testing<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self::default().with_data_dir(data_dir)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir.join(&self.metadata_file)
    }

    /// Scratch file the catalog is written to before being renamed into place
    pub fn metadata_temp_path(&self) -> PathBuf {
        self.metadata_path().with_extension(METADATA_TEMP_EXTENSION)
    }

    pub fn table_file_path(&self, table_name: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", table_name, self.table_extension))
    }

    pub fn validate(&self) -> Result<()> {
        if self.metadata_file.is_empty() {
            return Err(DbError::Config("metadata_file cannot be empty".to_string()));
        }
        if self.table_extension.is_empty() {
            return Err(DbError::Config("table_extension cannot be empty".to_string()));
        }
        if self.table_extension.contains(['.', '/', '\\']) {
            return Err(DbError::Config(format!(
                "table_extension must be a bare extension, got {:?}",
                self.table_extension
            )));
        }
        // `<metadata stem>.<ext>` must stay distinct from both the catalog and
        // its `.tmp` rewrite file
        let metadata_ext = Path::new(&self.metadata_file)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");
        if self.table_extension == METADATA_TEMP_EXTENSION || self.table_extension == metadata_ext {
            return Err(DbError::Config(format!(
                "table_extension {:?} collides with the metadata files",
                self.table_extension
            )));
        }
        Ok(())
    }
}
