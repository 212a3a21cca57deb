//! FILENAME: core/persistence/src/error.rs

use engine::EngineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed record at line {line}: expected {expected} fields, found {found}")]
    MalformedRecord {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("Invalid delimiter {0:?}: expected a single ASCII character other than a line break")]
    InvalidDelimiter(char),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Table error: {0}")]
    Engine(#[from] EngineError),
}
