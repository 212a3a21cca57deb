//! FILENAME: core/persistence/src/csv_writer.rs

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use engine::{CellValue, Table};

use crate::options::CsvOptions;
use crate::PersistenceError;

pub fn save_csv(table: &Table, path: &Path, options: &CsvOptions) -> Result<(), PersistenceError> {
    let file = File::create(path)?;
    write_csv(table, file, options)?;
    log::debug!(target: "CSV", "saved {} rows to {}", table.row_count(), path.display());
    Ok(())
}

pub fn to_csv_string(table: &Table, options: &CsvOptions) -> Result<String, PersistenceError> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf, options)?;
    String::from_utf8(buf).map_err(|e| PersistenceError::InvalidFormat(e.to_string()))
}

/// Writes a header line, then one line per row with one field per declared column.
/// Fields are never quoted.
pub fn write_csv<W: Write>(table: &Table, writer: W, options: &CsvOptions) -> Result<(), PersistenceError> {
    if table.column_count() == 0 {
        return Ok(());
    }

    let delimiter = options.delimiter.as_char();
    let mut out = WriterBuilder::new()
        .delimiter(options.delimiter.as_byte())
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    out.write_record(table.columns())?;

    for (idx, row) in table.rows().iter().enumerate() {
        let fields: Vec<String> = table
            .columns()
            .iter()
            .map(|column| match row.value(column) {
                CellValue::Null => options.null_rendering.text().to_string(),
                value => {
                    let text = value.canonical_text();
                    if text.contains(delimiter) || text.contains('\n') || text.contains('\r') {
                        log::warn!(
                            target: "CSV",
                            "row {} column '{}' contains a delimiter or line break and will not re-import cleanly",
                            idx,
                            column
                        );
                    }
                    text
                }
            })
            .collect();
        if fields.iter().all(String::is_empty) {
            log::warn!(target: "CSV", "row {} has no values and will be dropped on re-import", idx);
        }
        out.write_record(&fields)?;
    }

    out.flush()?;
    Ok(())
}
