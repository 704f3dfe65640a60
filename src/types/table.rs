/// Table metadata and schema definitions
use super::Value;
use crate::error::{DbError, Result};
use ahash::AHashMap;
use std::fmt;

/// Column data type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// 32-bit signed integer
    Integer,
    /// Text with a maximum length in characters
    Varchar(usize),
    /// Boolean
    Boolean,
}

impl ColumnType {
    /// Bare type keyword, without the VARCHAR length
    pub fn keyword(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Varchar(_) => "VARCHAR",
            ColumnType::Boolean => "BOOLEAN",
        }
    }

    /// VARCHAR length, or 0 for the other types
    pub fn varchar_len(&self) -> usize {
        match self {
            ColumnType::Varchar(len) => *len,
            _ => 0,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Varchar(len) => write!(f, "VARCHAR({})", len),
            other => f.write_str(other.keyword()),
        }
    }
}

/// Column definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name
    pub name: String,
    /// Column data type
    pub col_type: ColumnType,
    pub primary_key: bool,
    /// Stored and persisted; there is no NULL literal, so nothing to enforce
    pub not_null: bool,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, col_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            col_type,
            primary_key: false,
            not_null: false,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.col_type)?;
        if self.primary_key {
            f.write_str(" PRIMARY KEY")?;
        }
        if self.not_null {
            f.write_str(" NOT NULL")?;
        }
        Ok(())
    }
}

/// Table schema definition
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// Table name
    pub name: String,
    /// Column definitions (ordered)
    pub columns: Vec<ColumnDef>,
    /// Column name -> position mapping
    column_map: AHashMap<String, usize>,
}

impl PartialEq for TableSchema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.columns == other.columns
    }
}

impl Eq for TableSchema {}

impl TableSchema {
    /// Create a new table schema
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        let mut schema = Self {
            name: name.into(),
            columns,
            column_map: AHashMap::new(),
        };
        schema.rebuild_column_map();
        schema
    }

    /// Get column by name
    pub fn get_column(&self, name: &str) -> Option<&ColumnDef> {
        self.get_column_position(name).map(|i| &self.columns[i])
    }

    /// Get column position by name
    pub fn get_column_position(&self, name: &str) -> Option<usize> {
        self.column_map.get(name).copied()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn primary_key(&self) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.primary_key)
    }

    /// Rebuild column map (call after deserialization)
    pub fn rebuild_column_map(&mut self) {
        self.column_map.clear();
        for (i, col) in self.columns.iter().enumerate() {
            // First definition wins if a loaded schema carries duplicates
            self.column_map.entry(col.name.clone()).or_insert(i);
        }
    }

    /// Validate a row of INSERT values against this schema
    pub fn validate_row(&self, row: &[Value]) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(DbError::Validation(format!(
                "INSERT has {} values, expected {}",
                row.len(),
                self.columns.len()
            )));
        }

        for (col, value) in self.columns.iter().zip(row) {
            if !value.matches_type(&col.col_type) {
                return Err(DbError::TypeMismatch(format!(
                    "Type mismatch for column '{}'",
                    col.name
                )));
            }

            if let (ColumnType::Varchar(max_len), Value::Text(s)) = (&col.col_type, value) {
                if s.chars().count() > *max_len {
                    return Err(DbError::Validation(format!(
                        "String too long for column '{}', max length is {}",
                        col.name, max_len
                    )));
                }
            }
        }

        Ok(())
    }
}
