/// Abstract Syntax Tree for SQL statements
use crate::error::Result;
use crate::types::{ColumnDef, Value};
use std::cmp::Ordering;
use std::fmt;

/// Top-level SQL statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateTable(CreateTableStmt),
    DropTable(DropTableStmt),
    Insert(InsertStmt),
    Select(SelectStmt),
}

/// CREATE TABLE statement
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStmt {
    pub table: String,
    pub columns: Vec<ColumnDef>,
}

/// DROP TABLE statement
#[derive(Debug, Clone, PartialEq)]
pub struct DropTableStmt {
    pub table: String,
}

/// INSERT statement (one row, all columns in schema order)
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStmt {
    pub table: String,
    pub values: Vec<Value>,
}

/// SELECT statement
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStmt {
    pub table: String,
    /// `SELECT *`; the only select list the grammar accepts
    pub select_all: bool,
    pub where_clause: Option<WhereCondition>,
}

/// Single `column <op> literal` predicate
#[derive(Debug, Clone, PartialEq)]
pub struct WhereCondition {
    pub column: String,
    pub op: CompareOp,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq, // =
    Ne, // != or <>
    Lt, // <
    Gt, // >
    Le, // <=
    Ge, // >=
}

impl CompareOp {
    /// Apply the operator to two values of the same variant.
    ///
    /// Mixed variants yield `DbError::TypeMismatch`.
    pub fn evaluate(&self, left: &Value, right: &Value) -> Result<bool> {
        let ordering = left.try_cmp(right)?;
        Ok(match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
        })
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl WhereCondition {
    pub fn new(column: impl Into<String>, op: CompareOp, value: Value) -> Self {
        Self {
            column: column.into(),
            op,
            value,
        }
    }

    /// Evaluate against a row value; type mismatches count as "no match"
    pub fn matches(&self, row_value: &Value) -> bool {
        self.op.evaluate(row_value, &self.value).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_ops() {
        let one = Value::Integer(1);
        let two = Value::Integer(2);

        assert!(CompareOp::Lt.evaluate(&one, &two).unwrap());
        assert!(CompareOp::Le.evaluate(&one, &one).unwrap());
        assert!(CompareOp::Ge.evaluate(&two, &one).unwrap());
        assert!(!CompareOp::Gt.evaluate(&one, &one).unwrap());
        assert!(CompareOp::Ne.evaluate(&one, &two).unwrap());
        assert!(CompareOp::Eq.evaluate(&Value::Text("a".into()), &Value::Text("a".into())).unwrap());
    }

    #[test]
    fn test_mismatch_is_error_but_condition_false() {
        assert!(CompareOp::Ne
            .evaluate(&Value::Integer(1), &Value::Bool(true))
            .is_err());

        let cond = WhereCondition::new("x", CompareOp::Ne, Value::Bool(true));
        assert!(!cond.matches(&Value::Integer(1)));
        assert!(cond.matches(&Value::Bool(false)));
    }
}
