//! FILENAME: core/group-engine/src/lib.rs
//! Group-by / aggregation subsystem for Tabula.
//!
//! This crate provides the aggregation engine as a standalone module,
//! separate from the core table engine. It depends on `engine` only for
//! shared types (CellValue, Row, Table, EngineError).
//!
//! Layers:
//! - `definition`: Serializable configuration (WHAT to aggregate)
//! - `stats`: Statistics over value sequences (HOW each number is computed)
//! - `engine`: Partitioning and per-partition aggregation (HOW rows are grouped)

pub mod definition;
pub mod engine;
pub mod stats;

pub use definition::*;
pub use self::engine::{
    compute_aggregate, group_by, group_by_columns, group_key, partition, GroupKey, Partition,
};
pub use stats::{
    calculate_mean, calculate_median, calculate_mode, calculate_std_dev, NumericAccumulator,
};
