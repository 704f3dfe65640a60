//! Row serialization for table data files
//!
//! One row per line, fields separated by `|`, in schema column order:
//! - Integer: decimal text
//! - Boolean: `1` / `0`
//! - Text: raw characters with `|`, `\`, newline and carriage return written
//!   as `\|`, `\\`, `\n`, `\r`. A leading `#` is written as `\#` so the line
//!   is never mistaken for a comment.
//!
//! Decoding treats `\x` for any other `x` as a literal `x`.

use crate::error::{DbError, Result};
use crate::types::{ColumnDef, ColumnType, Row, Value};

pub const FIELD_SEPARATOR: char = '|';
const ESCAPE: char = '\\';

pub fn serialize_value(value: &Value) -> String {
    match value {
        Value::Integer(n) => n.to_string(),
        Value::Bool(b) => (if *b { "1" } else { "0" }).to_string(),
        Value::Text(s) => escape_text(s),
    }
}

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    if s.starts_with('#') {
        out.push(ESCAPE);
    }
    for c in s.chars() {
        match c {
            '|' => out.push_str("\\|"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

fn unescape_text(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut chars = field.chars();
    while let Some(c) = chars.next() {
        if c != ESCAPE {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            // Dangling escape at end of field
            None => out.push(ESCAPE),
        }
    }
    out
}

/// Serialize a row positionally against `columns`
pub fn serialize_row(row: &[Value], columns: &[ColumnDef]) -> Result<String> {
    if row.len() != columns.len() {
        return Err(DbError::Storage(format!(
            "Row has {} values but table has {} columns",
            row.len(),
            columns.len()
        )));
    }

    let line = row
        .iter()
        .map(serialize_value)
        .collect::<Vec<_>>()
        .join("|");
    // Blank lines are skipped on read, so such a row could never come back
    if line.is_empty() {
        return Err(DbError::Validation(
            "Cannot store a row whose only value is an empty string".to_string(),
        ));
    }
    Ok(line)
}

/// Split a data line on unescaped `|`. Escape sequences are kept verbatim
/// for `deserialize_value` to resolve.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut escaped = false;

    for c in line.chars() {
        if escaped {
            current.push(c);
            escaped = false;
        } else if c == ESCAPE {
            current.push(c);
            escaped = true;
        } else if c == FIELD_SEPARATOR {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    fields.push(current);

    fields
}

pub fn deserialize_value(field: &str, col_type: &ColumnType) -> Result<Value> {
    match col_type {
        ColumnType::Integer => field
            .parse::<i32>()
            .map(Value::Integer)
            .map_err(|_| DbError::Corruption(format!("Bad integer field: {:?}", field))),
        ColumnType::Boolean => match field {
            "1" => Ok(Value::Bool(true)),
            "0" => Ok(Value::Bool(false)),
            other => Err(DbError::Corruption(format!("Bad boolean field: {:?}", other))),
        },
        ColumnType::Varchar(_) => Ok(Value::Text(unescape_text(field))),
    }
}

/// Decode one data line against `columns`
pub fn deserialize_row(line: &str, columns: &[ColumnDef]) -> Result<Row> {
    let fields = split_fields(line);
    if fields.len() != columns.len() {
        return Err(DbError::Corruption(format!(
            "Row has {} fields, expected {}",
            fields.len(),
            columns.len()
        )));
    }

    fields
        .iter()
        .zip(columns)
        .map(|(field, column)| deserialize_value(field, &column.col_type))
        .collect()
}
