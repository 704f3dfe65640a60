//! Row storage
//!
//! Each table is a flat, append-only text file; `row_codec` defines the line
//! format and `table_file` the per-table read/write operations.

pub mod row_codec;
pub mod table_file;

pub use row_codec::{deserialize_row, serialize_row};
pub use table_file::TableFile;
