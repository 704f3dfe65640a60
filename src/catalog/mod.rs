//! Schema catalog
//!
//! Owns every `TableSchema` of a data directory and the validation rules
//! applied before rows are written or scanned.

pub mod registry;

pub use registry::TableRegistry;
