//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the Tabula table engine.
//! CONTEXT: Re-exports public types and modules for use by other crates.
//!
//! Layers:
//! - `cell`: typed field values and their comparison/coercion rules
//! - `row`: one record, keyed by column name
//! - `table`: ordered columns + ordered rows, structural edits and projection
//! - `transform`: filter and sort, producing new tables

pub mod cell;
pub mod error;
pub mod row;
pub mod table;
pub mod transform;

// Re-export commonly used types at the crate root
pub use cell::CellValue;
pub use error::EngineError;
pub use row::Row;
pub use table::{ColumnType, Table};
pub use transform::{CompareOp, Predicate, SortOrder};
