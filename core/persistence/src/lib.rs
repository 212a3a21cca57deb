//! FILENAME: core/persistence/src/lib.rs
//! Tabula Persistence Module
//!
//! Handles importing and exporting tables as delimited text and as JSON
//! arrays of objects. Decoders hand the engine an ordered column list plus
//! type-inferred rows; encoders write one record per row and one field per
//! declared column.

mod csv_reader;
mod csv_writer;
mod error;
mod json_reader;
mod json_writer;
mod options;

pub use csv_reader::{load_csv, parse_csv};
pub use csv_writer::{save_csv, to_csv_string, write_csv};
pub use error::PersistenceError;
pub use json_reader::{load_json, parse_json};
pub use json_writer::{save_json, to_json_string, write_json};
pub use options::{CsvOptions, Delimiter, ExchangeOptions, JsonOptions, MalformedPolicy, NullRendering};

use engine::Table;
use std::path::Path;

// ============================================================================
// IMPORT RESULT
// ============================================================================

/// Counts gathered while decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Records that became rows.
    pub records_read: usize,
    /// 1-based line numbers of records dropped as malformed.
    pub skipped_lines: Vec<usize>,
}

impl ImportReport {
    pub fn records_skipped(&self) -> usize {
        self.skipped_lines.len()
    }
}

/// A decoded table together with its import report.
#[derive(Debug, Clone)]
pub struct Import {
    pub table: Table,
    pub report: ImportReport,
}

// ============================================================================
// FORMAT DISPATCH
// ============================================================================

/// File formats understood by [`load_table`] and [`save_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
}

impl Format {
    /// Picks the format from the file extension (`.csv`, `.txt`, `.json`).
    pub fn from_path(path: &Path) -> Result<Format, PersistenceError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") | Some("txt") => Ok(Format::Csv),
            Some("json") => Ok(Format::Json),
            _ => Err(PersistenceError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Loads a table, choosing the codec by file extension.
pub fn load_table(path: &Path, options: &ExchangeOptions) -> Result<Import, PersistenceError> {
    match Format::from_path(path)? {
        Format::Csv => load_csv(path, &options.csv),
        Format::Json => {
            let table = load_json(path)?;
            let report = ImportReport {
                records_read: table.row_count(),
                skipped_lines: Vec::new(),
            };
            Ok(Import { table, report })
        }
    }
}

/// Saves a table, choosing the codec by file extension.
pub fn save_table(table: &Table, path: &Path, options: &ExchangeOptions) -> Result<(), PersistenceError> {
    match Format::from_path(path)? {
        Format::Csv => save_csv(table, path, &options.csv),
        Format::Json => save_json(table, path, &options.json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a.CSV")).unwrap(), Format::Csv);
        assert_eq!(Format::from_path(Path::new("dir/b.json")).unwrap(), Format::Json);
        assert!(matches!(
            Format::from_path(Path::new("c.xlsx")),
            Err(PersistenceError::UnsupportedFormat(_))
        ));
        assert!(Format::from_path(Path::new("noext")).is_err());
    }
}
