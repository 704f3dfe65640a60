//! Per-table row store
//!
//! Rows live in `<data_dir>/<table>.<ext>`, one serialized row per line,
//! after a `# Table data for <table>` header. Inserts append; reads scan the
//! whole file. Lines that fail to decode (torn appends, hand edits) are
//! skipped rather than failing the scan.

use super::row_codec;
use crate::catalog::TableRegistry;
use crate::error::{DbError, Result};
use crate::sql::ast::WhereCondition;
use crate::types::{ColumnDef, Row, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Row storage for one table, borrowing the catalog for schema lookups
pub struct TableFile<'a> {
    table_name: String,
    registry: &'a TableRegistry,
    path: PathBuf,
}

impl<'a> TableFile<'a> {
    /// Bind to `table_name`, creating its data file if it does not exist
    pub fn open(table_name: &str, registry: &'a TableRegistry) -> Result<Self> {
        let path = registry.table_file_path(table_name);
        let table_file = Self {
            table_name: table_name.to_string(),
            registry,
            path,
        };
        table_file.ensure_file()?;
        Ok(table_file)
    }

    pub fn file_path(&self) -> &Path {
        &self.path
    }

    fn ensure_file(&self) -> Result<()> {
        match OpenOptions::new().write(true).create_new(true).open(&self.path) {
            Ok(mut file) => {
                writeln!(file, "# Table data for {}", self.table_name).map_err(|e| {
                    DbError::Storage(format!(
                        "Cannot create table file {}: {}",
                        self.path.display(),
                        e
                    ))
                })?;
                tracing::debug!(path = %self.path.display(), "table file created");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(DbError::Storage(format!(
                "Cannot create table file {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn columns(&self) -> Result<&'a [ColumnDef]> {
        self.registry.get_columns(&self.table_name)
    }

    /// Validate `values` against the schema and append them as one line
    pub fn insert_row(&self, values: &[Value]) -> Result<()> {
        self.registry
            .validate_insert_values(&self.table_name, values)?;
        let line = row_codec::serialize_row(values, self.columns()?)?;

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                DbError::Storage(format!(
                    "Cannot open table file for writing {}: {}",
                    self.path.display(),
                    e
                ))
            })?;
        writeln!(file, "{}", line)?;
        file.flush()?;
        if self.registry.config().durability_level.requires_immediate_sync() {
            file.sync_all()?;
        }

        tracing::debug!(table = %self.table_name, "row appended");
        Ok(())
    }

    /// Every decodable row, in file order
    pub fn select_all(&self) -> Result<Vec<Row>> {
        let columns = self.columns()?;
        let file = File::open(&self.path).map_err(|e| {
            DbError::Storage(format!(
                "Cannot open table file for reading {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let mut rows = Vec::new();
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = match line {
                Ok(line) => line,
                // Invalid UTF-8 is treated like any other malformed line
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    tracing::warn!(table = %self.table_name, line = line_no + 1, "skipping undecodable line");
                    continue;
                }
                Err(e) => return Err(DbError::Io(e)),
            };
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match row_codec::deserialize_row(&line, columns) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    tracing::warn!(
                        table = %self.table_name,
                        line = line_no + 1,
                        error = %e,
                        "skipping malformed row"
                    );
                }
            }
        }

        Ok(rows)
    }

    /// Rows whose value in `condition.column` satisfies the condition.
    ///
    /// The condition is validated against the schema before the scan.
    pub fn select_where(&self, condition: &WhereCondition) -> Result<Vec<Row>> {
        self.registry
            .validate_where_condition(&self.table_name, condition)?;
        let Some(index) = self
            .registry
            .get_column_index(&self.table_name, &condition.column)
        else {
            return Ok(Vec::new());
        };

        let rows = self.select_all()?;
        Ok(rows
            .into_iter()
            .filter(|row| row.get(index).is_some_and(|v| condition.matches(v)))
            .collect())
    }

    /// Number of decodable rows
    pub fn row_count(&self) -> Result<usize> {
        Ok(self.select_all()?.len())
    }
}
