//! Error types for the flatdb engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // SQL front-end errors
    #[error("Lex error: {0}")]
    LexError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    // Schema-aware validation errors. These render the bare message so the
    // executor can prefix them uniformly.
    #[error("{0}")]
    Validation(String),

    #[error("Table '{0}' does not exist")]
    TableNotFound(String),

    #[error("Column '{column}' does not exist in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    #[error("{0}")]
    TypeMismatch(String),

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Data corruption: {0}")]
    Corruption(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl DbError {
    /// True for failures raised before execution (lexing or parsing).
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, DbError::LexError(_) | DbError::ParseError(_))
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Config(err.to_string())
    }
}
