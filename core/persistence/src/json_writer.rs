//! FILENAME: core/persistence/src/json_writer.rs

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use engine::{CellValue, Table};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Number, Value};

use crate::options::JsonOptions;
use crate::PersistenceError;

pub fn save_json(table: &Table, path: &Path, options: &JsonOptions) -> Result<(), PersistenceError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_json(table, &mut writer, options)?;
    writer.flush()?;
    log::debug!(target: "JSON", "saved {} rows to {}", table.row_count(), path.display());
    Ok(())
}

pub fn to_json_string(table: &Table, options: &JsonOptions) -> Result<String, PersistenceError> {
    let mut buf = Vec::new();
    write_json(table, &mut buf, options)?;
    String::from_utf8(buf).map_err(|e| PersistenceError::InvalidFormat(e.to_string()))
}

/// Writes the table as a pretty-printed array of objects, one object per row,
/// each holding exactly the declared columns in column order.
pub fn write_json<W: Write>(table: &Table, writer: W, options: &JsonOptions) -> Result<(), PersistenceError> {
    let items: Vec<Value> = table
        .rows()
        .iter()
        .map(|row| {
            let object: Map<String, Value> = table
                .columns()
                .iter()
                .map(|column| (column.clone(), to_json(row.value(column))))
                .collect();
            Value::Object(object)
        })
        .collect();

    let indent = " ".repeat(options.indent);
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    Value::Array(items).serialize(&mut serializer)?;
    Ok(())
}

// Non-finite floats have no JSON form and are written as null.
fn to_json(value: &CellValue) -> Value {
    match value {
        CellValue::Null => Value::Null,
        CellValue::Integer(i) => Value::Number((*i).into()),
        CellValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        CellValue::Text(s) => Value::String(s.clone()),
    }
}
