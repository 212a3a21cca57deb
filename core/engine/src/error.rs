//! FILENAME: core/engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Type mismatch: cannot compare {left} with {right}")]
    TypeMismatch {
        left: &'static str,
        right: &'static str,
    },

    #[error("Not numeric: {found} value{}", column_suffix(.column))]
    NotNumeric {
        column: Option<String>,
        found: &'static str,
    },

    #[error("Filter failed at row {row}: {source}")]
    FilterEvaluation {
        row: usize,
        #[source]
        source: Box<EngineError>,
    },

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Invalid predicate: {0}")]
    InvalidPredicate(String),
}

impl EngineError {
    /// Attaches a column name to a `NotNumeric` error raised at the value level.
    pub fn in_column(self, name: &str) -> Self {
        match self {
            EngineError::NotNumeric { column: None, found } => EngineError::NotNumeric {
                column: Some(name.to_string()),
                found,
            },
            other => other,
        }
    }
}

fn column_suffix(column: &Option<String>) -> String {
    match column {
        Some(name) => format!(" in column '{}'", name),
        None => String::new(),
    }
}
