/// Query executor - runs parsed statements against the catalog and row store
use super::ast::*;
use crate::catalog::TableRegistry;
use crate::config::DBConfig;
use crate::error::Result;
use crate::storage::TableFile;
use crate::types::{Row, Value};
use std::fmt::Write as _;
use std::path::Path;

/// Query result
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// SELECT result
    Select {
        columns: Vec<String>,
        rows: Vec<Row>,
    },

    /// INSERT result
    Modification {
        affected_rows: usize,
        message: String,
    },

    /// CREATE/DROP result
    Definition {
        message: String,
    },
}

impl QueryResult {
    /// Get columns and rows from SELECT result
    /// Returns None if not a SELECT result
    pub fn select_rows(&self) -> Option<(&[String], &[Row])> {
        match self {
            QueryResult::Select { columns, rows } => Some((columns.as_slice(), rows.as_slice())),
            _ => None,
        }
    }

    /// Render as shell output. SELECT results become an ASCII table whose
    /// columns are at least `min_width` wide, followed by a row count.
    pub fn render(&self, min_width: usize) -> String {
        match self {
            QueryResult::Definition { message } => message.clone(),
            QueryResult::Modification { message, .. } => message.clone(),
            QueryResult::Select { columns, rows } => render_table(columns, rows, min_width),
        }
    }
}

fn render_table(columns: &[String], rows: &[Row], min_width: usize) -> String {
    if columns.is_empty() {
        return "No columns defined.".to_string();
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(Value::to_string).collect())
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    for width in &mut widths {
        *width = (*width).max(min_width);
    }

    let mut out = String::new();

    out.push('|');
    for (name, width) in columns.iter().zip(&widths) {
        let _ = write!(out, " {:<width$} |", name, width = width);
    }
    out.push('\n');

    out.push('+');
    for width in &widths {
        out.push_str(&"-".repeat(width + 2));
        out.push('+');
    }
    out.push('\n');

    for row in &cells {
        out.push('|');
        for (i, width) in widths.iter().enumerate() {
            let cell = row.get(i).map(String::as_str).unwrap_or("");
            let _ = write!(out, " {:<width$} |", cell, width = width);
        }
        out.push('\n');
    }

    let _ = write!(out, "{} rows returned.", rows.len());
    out
}

const HELP_TEXT: &str = r"flatdb - Help
=============

Supported SQL Commands:
-----------------------

CREATE TABLE table_name (
    column_name data_type [constraints],
    ...
);

DROP TABLE table_name;

Data Types:
  INTEGER        - 32-bit signed integers
  VARCHAR(n)     - Variable-length strings (max n characters)
  BOOLEAN        - True/false values

Constraints:
  PRIMARY KEY    - Designates primary key (max one per table)
  NOT NULL       - Column cannot be null

INSERT INTO table_name VALUES (value1, value2, ...);

SELECT * FROM table_name [WHERE column operator value];

Operators:
  =, !=, <>, <, >, <=, >=

Meta Commands:
--------------
\l, \list      - List all tables and their schemas
\h, help       - Show this help message
\c, clear      - Clear the terminal screen
\q, exit, quit - Exit the application

Examples:
---------
CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR(50), active BOOLEAN);
INSERT INTO users VALUES (1, 'Alice', true);
SELECT * FROM users WHERE id = 1;
DROP TABLE users;
";

/// Executes statements against one data directory.
///
/// Owns the catalog; row stores are opened per statement and borrow it.
pub struct QueryExecutor {
    registry: TableRegistry,
}

impl QueryExecutor {
    /// Open (or initialize) the data directory described by `config`
    pub fn new(config: DBConfig) -> Result<Self> {
        Ok(Self {
            registry: TableRegistry::open(config)?,
        })
    }

    pub fn with_data_dir<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        Self::new(DBConfig::default().with_data_dir(data_dir.as_ref()))
    }

    pub fn registry(&self) -> &TableRegistry {
        &self.registry
    }

    /// Execute one statement, rendering any failure as `Error: <message>`
    pub fn execute(&mut self, stmt: Statement) -> String {
        match self.execute_statement(stmt) {
            Ok(result) => result.render(self.registry.config().min_column_width),
            Err(e) => format!("Error: {}", e),
        }
    }

    /// Execute one statement, returning the typed result
    pub fn execute_statement(&mut self, stmt: Statement) -> Result<QueryResult> {
        tracing::debug!(?stmt, "executing statement");
        match stmt {
            Statement::CreateTable(c) => self.execute_create_table(c),
            Statement::DropTable(d) => self.execute_drop_table(d),
            Statement::Insert(i) => self.execute_insert(i),
            Statement::Select(s) => self.execute_select(s),
        }
    }

    fn execute_create_table(&mut self, stmt: CreateTableStmt) -> Result<QueryResult> {
        self.registry.create_table(&stmt.table, stmt.columns)?;
        Ok(QueryResult::Definition {
            message: format!("Table '{}' created successfully.", stmt.table),
        })
    }

    fn execute_drop_table(&mut self, stmt: DropTableStmt) -> Result<QueryResult> {
        self.registry.validate_table_name(&stmt.table)?;
        self.registry.drop_table(&stmt.table)?;
        Ok(QueryResult::Definition {
            message: format!("Table '{}' dropped successfully.", stmt.table),
        })
    }

    fn execute_insert(&mut self, stmt: InsertStmt) -> Result<QueryResult> {
        self.registry.validate_table_name(&stmt.table)?;
        let table = TableFile::open(&stmt.table, &self.registry)?;
        table.insert_row(&stmt.values)?;
        Ok(QueryResult::Modification {
            affected_rows: 1,
            message: format!("1 row inserted into '{}'.", stmt.table),
        })
    }

    fn execute_select(&mut self, stmt: SelectStmt) -> Result<QueryResult> {
        self.registry.validate_table_name(&stmt.table)?;
        let columns = self
            .registry
            .get_columns(&stmt.table)?
            .iter()
            .map(|c| c.name.clone())
            .collect();

        let table = TableFile::open(&stmt.table, &self.registry)?;
        let rows = match &stmt.where_clause {
            Some(condition) => table.select_where(condition)?,
            None => table.select_all()?,
        };

        Ok(QueryResult::Select { columns, rows })
    }

    /// Schema dump of every table, in name order
    pub fn list_tables(&self) -> String {
        let names = self.registry.table_names();
        if names.is_empty() {
            return "No tables found.".to_string();
        }

        let mut out = String::from("Tables:\n=======\n");
        for name in &names {
            let _ = writeln!(out, "  {}", name);
            out.push_str("    Columns:\n");
            if let Ok(columns) = self.registry.get_columns(name) {
                for column in columns {
                    let _ = writeln!(out, "      {}", column);
                }
            }
            out.push('\n');
        }
        out
    }

    pub fn show_help(&self) -> &'static str {
        HELP_TEXT
    }
}
