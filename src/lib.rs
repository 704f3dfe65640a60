//! flatdb - a minimal flat-file SQL engine
//!
//! Accepts a small SQL dialect (CREATE TABLE, DROP TABLE, INSERT, SELECT *
//! with a single-predicate WHERE) and stores each table as an append-only,
//! pipe-delimited text file next to a text schema catalog.
//!
//! ## Architecture
//! - SQL layer: Lexer -> Parser -> `Statement` -> `QueryExecutor`
//! - Catalog: `TableRegistry`, persisted to `metadata.db`
//! - Storage: one `<table>.tbl` file per table, linear-scan reads
//!
//! Single-threaded; a data directory must be used by one process at a time.

pub mod catalog;
pub mod config;
pub mod sql;
pub mod storage;
pub mod types;

mod error;

pub use catalog::TableRegistry;
pub use config::{DBConfig, DurabilityLevel};
pub use error::{DbError, Result};
pub use sql::{execute_sql, QueryExecutor, QueryResult};
pub use storage::TableFile;
pub use types::{ColumnDef, ColumnType, Row, TableSchema, Value};
