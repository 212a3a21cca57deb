//! FILENAME: core/persistence/src/json_reader.rs

use std::fs;
use std::path::Path;

use engine::{CellValue, Row, Table};
use serde_json::Value;

use crate::PersistenceError;

pub fn load_json(path: &Path) -> Result<Table, PersistenceError> {
    let text = fs::read_to_string(path)?;
    log::debug!(target: "JSON", "loading {}", path.display());
    parse_json(&text)
}

/// Parses a top-level array of objects.
///
/// The columns are the keys of the first object, in document order. Every row
/// holds exactly those columns: keys missing from a later object become Null
/// and keys it adds are ignored.
pub fn parse_json(text: &str) -> Result<Table, PersistenceError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(items) = value else {
        return Err(PersistenceError::InvalidFormat(
            "expected a top-level JSON array".to_string(),
        ));
    };

    let columns: Vec<String> = match items.first() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        Some(_) => return Err(not_an_object(0)),
        None => Vec::new(),
    };
    let mut table = Table::new(columns, Vec::new())?;

    for (idx, item) in items.iter().enumerate() {
        let Value::Object(object) = item else {
            return Err(not_an_object(idx));
        };
        let mut row = Row::with_capacity(table.column_count());
        for column in table.columns() {
            let value = match object.get(column) {
                Some(v) => to_cell(v, idx, column)?,
                None => CellValue::Null,
            };
            row.insert(column.clone(), value);
        }
        table.push_row(row)?;
    }

    log::debug!(target: "JSON", "parsed {} records", table.row_count());
    Ok(table)
}

fn to_cell(value: &Value, idx: usize, column: &str) -> Result<CellValue, PersistenceError> {
    match value {
        Value::Null => Ok(CellValue::Null),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(CellValue::Integer(i)),
            None => n.as_f64().map(CellValue::Float).ok_or_else(|| {
                PersistenceError::InvalidFormat(format!(
                    "element {} field '{}': number {} is out of range",
                    idx, column, n
                ))
            }),
        },
        Value::String(s) => Ok(CellValue::Text(s.clone())),
        Value::Bool(b) => Ok(CellValue::Text(b.to_string())),
        Value::Array(_) | Value::Object(_) => Err(PersistenceError::InvalidFormat(format!(
            "element {} field '{}': nested values are not supported",
            idx, column
        ))),
    }
}

fn not_an_object(idx: usize) -> PersistenceError {
    PersistenceError::InvalidFormat(format!("element {} is not a JSON object", idx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_come_from_first_object_in_order() {
        let table = parse_json(
            r#"[{"name": "Alice", "age": 30, "score": 1.5},
                {"age": 25, "name": "Bob", "extra": true}]"#,
        )
        .unwrap();
        assert_eq!(table.columns(), &["name", "age", "score"]);
        assert_eq!(table.rows()[1].value("score"), &CellValue::Null);
        assert!(!table.rows()[1].contains("extra"));
        assert_eq!(table.rows()[0].value("age"), &CellValue::Integer(30));
        assert_eq!(table.rows()[0].value("score"), &CellValue::Float(1.5));
    }

    #[test]
    fn float_literals_stay_float() {
        let table = parse_json(r#"[{"v": 15.0}]"#).unwrap();
        assert_eq!(table.rows()[0].value("v"), &CellValue::Float(15.0));
    }

    #[test]
    fn strings_are_not_inferred() {
        let table = parse_json(r#"[{"v": "42", "b": false}]"#).unwrap();
        assert_eq!(table.rows()[0].value("v"), &CellValue::from("42"));
        assert_eq!(table.rows()[0].value("b"), &CellValue::from("false"));
    }

    #[test]
    fn rejects_non_array_and_nested_values() {
        assert!(matches!(
            parse_json(r#"{"a": 1}"#),
            Err(PersistenceError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_json(r#"[{"a": [1, 2]}]"#),
            Err(PersistenceError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_json(r#"[{"a": 1}, 3]"#),
            Err(PersistenceError::InvalidFormat(_))
        ));
        assert!(matches!(parse_json("[{"), Err(PersistenceError::Json(_))));
    }

    #[test]
    fn empty_array_is_empty_table() {
        assert_eq!(parse_json("[]").unwrap().shape(), (0, 0));
    }
}
