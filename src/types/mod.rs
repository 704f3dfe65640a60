//! Value and schema types shared by the SQL layer, the catalog and storage

mod table;

pub use table::{ColumnDef, ColumnType, TableSchema};

use crate::error::{DbError, Result};
use std::cmp::Ordering;
use std::fmt;

/// A single typed value, used both for stored data and for SQL literals
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// 32-bit signed integer
    Integer(i32),

    /// Text string
    Text(String),

    /// Boolean value
    Bool(bool),
}

/// Ordering exists only within a variant; mixed variants are incomparable.
impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Text(_) => "VARCHAR",
            Value::Bool(_) => "BOOLEAN",
        }
    }

    /// Compare two values of the same variant.
    ///
    /// Returns `DbError::TypeMismatch` when the variants differ.
    pub fn try_cmp(&self, other: &Value) -> Result<Ordering> {
        self.partial_cmp(other).ok_or_else(|| {
            DbError::TypeMismatch(format!(
                "Cannot compare {} with {}",
                self.type_name(),
                other.type_name()
            ))
        })
    }

    /// Whether this value's variant fits a column type (length is not checked)
    pub fn matches_type(&self, col_type: &ColumnType) -> bool {
        matches!(
            (col_type, self),
            (ColumnType::Integer, Value::Integer(_))
                | (ColumnType::Varchar(_), Value::Text(_))
                | (ColumnType::Boolean, Value::Bool(_))
        )
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
        }
    }
}

/// A row is positionally aligned to its table's columns
pub type Row = Vec<Value>;
