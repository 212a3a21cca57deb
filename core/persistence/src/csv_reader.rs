//! FILENAME: core/persistence/src/csv_reader.rs

use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use engine::{CellValue, Row, Table};

use crate::options::{CsvOptions, MalformedPolicy, NullRendering};
use crate::{Import, ImportReport, PersistenceError};

pub fn load_csv(path: &Path, options: &CsvOptions) -> Result<Import, PersistenceError> {
    let text = fs::read_to_string(path)?;
    log::debug!(target: "CSV", "loading {}", path.display());
    parse_csv(&text, options)
}

/// Parses delimited text: a header line of column names, then one record per line.
///
/// Quote characters have no special meaning. Each field is type-inferred; an
/// empty field (or `null` under `NullRendering::Literal`) becomes Null. Blank
/// lines are skipped. A record whose field count differs from the header is
/// handled by `options.on_malformed`.
pub fn parse_csv(text: &str, options: &CsvOptions) -> Result<Import, PersistenceError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .quoting(false)
        .flexible(true)
        .delimiter(options.delimiter.as_byte())
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.is_empty() {
        return Ok(Import {
            table: Table::default(),
            report: ImportReport::default(),
        });
    }
    let mut table = Table::new(columns, Vec::new())?;
    let mut report = ImportReport::default();

    for result in reader.records() {
        let record = result?;
        let line_number = record.position().map_or(0, |p| p.line() as usize);

        if record.len() != table.column_count() {
            match options.on_malformed {
                MalformedPolicy::Fail => {
                    return Err(PersistenceError::MalformedRecord {
                        line: line_number,
                        expected: table.column_count(),
                        found: record.len(),
                    });
                }
                MalformedPolicy::Skip => {
                    log::warn!(
                        target: "CSV",
                        "skipping line {}: expected {} fields, found {}",
                        line_number,
                        table.column_count(),
                        record.len()
                    );
                    report.skipped_lines.push(line_number);
                    continue;
                }
            }
        }

        let row: Row = table
            .columns()
            .iter()
            .zip(record.iter())
            .map(|(column, field)| (column.clone(), parse_field(field, options.null_rendering)))
            .collect();
        table.push_row(row)?;
        report.records_read += 1;
    }

    log::debug!(
        target: "CSV",
        "parsed {} records ({} skipped)",
        report.records_read,
        report.skipped_lines.len()
    );
    Ok(Import { table, report })
}

fn parse_field(field: &str, nulls: NullRendering) -> CellValue {
    if field.is_empty() || (nulls == NullRendering::Literal && field == nulls.text()) {
        CellValue::Null
    } else {
        CellValue::infer(field)
    }
}
