//! FILENAME: core/engine/src/table.rs
//! PURPOSE: The row-oriented table that every operation consumes and produces.
//! CONTEXT: A `Table` owns an ordered list of column names and an ordered list of
//! rows. Column order is significant (it is the field order used by the codecs)
//! and never contains duplicates. Structural edits that change the owning table
//! (`rename_column`, `drop_column`) live here; operations that produce a new table
//! live here (`select_columns`) or in `transform.rs`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;
use crate::error::EngineError;
use crate::row::Row;

// ============================================================================
// COLUMN TYPE
// ============================================================================

/// Summary of the non-null values stored in one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// Only Null (or absent) values.
    Empty,
    Integer,
    Float,
    /// A mix of Integer and Float values.
    Numeric,
    Text,
    /// Numbers mixed with text.
    Mixed,
}

impl ColumnType {
    /// Whether every non-null value coerces to a number.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float | ColumnType::Numeric)
    }

    fn merge(self, value: &CellValue) -> ColumnType {
        let seen = match value {
            CellValue::Null => return self,
            CellValue::Integer(_) => ColumnType::Integer,
            CellValue::Float(_) => ColumnType::Float,
            CellValue::Text(_) => ColumnType::Text,
        };
        match (self, seen) {
            (ColumnType::Empty, t) => t,
            (a, b) if a == b => a,
            (ColumnType::Mixed, _) => ColumnType::Mixed,
            (a, b) if a.is_numeric() && b.is_numeric() => ColumnType::Numeric,
            _ => ColumnType::Mixed,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Empty => "Empty",
            ColumnType::Integer => "Integer",
            ColumnType::Float => "Float",
            ColumnType::Numeric => "Numeric",
            ColumnType::Text => "Text",
            ColumnType::Mixed => "Mixed",
        };
        f.write_str(name)
    }
}

// ============================================================================
// TABLE
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableParts")]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

/// Unchecked wire form of a [`Table`]; deserialization goes through [`Table::new`].
#[derive(Deserialize)]
struct TableParts {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Row>,
}

impl TryFrom<TableParts> for Table {
    type Error = EngineError;

    fn try_from(parts: TableParts) -> Result<Self, Self::Error> {
        Table::new(parts.columns, parts.rows)
    }
}

impl Table {
    /// Creates a table from a column list and rows.
    /// Fails if the column list repeats a name or a row holds an undeclared key.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Result<Self, EngineError> {
        check_unique(&columns)?;
        for row in &rows {
            check_keys(&columns, row)?;
        }
        Ok(Table { columns, rows })
    }

    /// Creates a table with columns and no rows.
    pub fn with_columns<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Result<Self, EngineError> {
        Table::new(columns.into_iter().map(Into::into).collect(), Vec::new())
    }

    /// Builds a table from positional records, each aligned with `columns`.
    /// Records shorter than the column list leave the trailing fields absent;
    /// extra values are ignored.
    pub fn from_records<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        records: impl IntoIterator<Item = Vec<CellValue>>,
    ) -> Result<Self, EngineError> {
        let mut table = Table::with_columns(columns)?;
        for record in records {
            let mut row = Row::with_capacity(table.columns.len());
            for (column, value) in table.columns.iter().zip(record) {
                row.insert(column.clone(), value);
            }
            table.rows.push(row);
        }
        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Appends a row. Every key the row holds must be a declared column;
    /// declared columns the row lacks read as Null.
    pub fn push_row(&mut self, row: Row) -> Result<(), EngineError> {
        check_keys(&self.columns, &row)?;
        self.rows.push(row);
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// The first `n` rows (fewer if the table is shorter).
    pub fn head(&self, n: usize) -> &[Row] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Values of one column in row order, absent keys read as Null.
    pub fn column_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a CellValue> + 'a {
        self.rows.iter().map(move |row| row.value(name))
    }

    /// Infers the type of a declared column from its values.
    /// Returns `None` if the column is not declared.
    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        if !self.has_column(name) {
            return None;
        }
        Some(
            self.column_values(name)
                .fold(ColumnType::Empty, |acc, value| acc.merge(value)),
        )
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Row>) {
        (self.columns, self.rows)
    }

    // ========================================================================
    // STRUCTURAL EDITS (in place)
    // ========================================================================

    /// Renames a column in the column list and in every row.
    ///
    /// Renaming a column that does not exist is a no-op. Renaming onto another
    /// declared column fails with `DuplicateColumn` and leaves the table untouched.
    pub fn rename_column(&mut self, old: &str, new: &str) -> Result<(), EngineError> {
        let Some(index) = self.column_index(old) else {
            log::debug!(target: "TABLE", "rename_column: no column '{}'", old);
            return Ok(());
        };
        if old == new {
            return Ok(());
        }
        if self.has_column(new) {
            return Err(EngineError::DuplicateColumn(new.to_string()));
        }
        self.columns[index] = new.to_string();
        for row in &mut self.rows {
            row.rename_key(old, new);
        }
        Ok(())
    }

    /// Removes a column from the column list and from every row.
    /// Dropping a column that does not exist is a no-op.
    pub fn drop_column(&mut self, name: &str) {
        let Some(index) = self.column_index(name) else {
            log::debug!(target: "TABLE", "drop_column: no column '{}'", name);
            return;
        };
        self.columns.remove(index);
        for row in &mut self.rows {
            row.remove(name);
        }
    }

    // ========================================================================
    // PROJECTION
    // ========================================================================

    /// Returns a new table holding only the listed columns, in the listed order.
    ///
    /// Names that are not declared columns are skipped (and logged); names listed
    /// twice are kept once. Fields absent from a source row stay absent.
    pub fn select_columns<S: AsRef<str>>(&self, names: &[S]) -> Table {
        let mut columns: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if !self.has_column(name) {
                log::warn!(target: "TABLE", "select_columns: ignoring unknown column '{}'", name);
                continue;
            }
            if !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
            }
        }

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut out = Row::with_capacity(columns.len());
                for column in &columns {
                    if let Some(value) = row.get(column) {
                        out.insert(column.clone(), value.clone());
                    }
                }
                out
            })
            .collect();

        Table { columns, rows }
    }

    /// Builds a table from parts the caller has already validated.
    pub(crate) fn from_parts_unchecked(columns: Vec<String>, rows: Vec<Row>) -> Table {
        Table { columns, rows }
    }
}

fn check_unique(columns: &[String]) -> Result<(), EngineError> {
    for (i, column) in columns.iter().enumerate() {
        if columns[..i].contains(column) {
            return Err(EngineError::DuplicateColumn(column.clone()));
        }
    }
    Ok(())
}

fn check_keys(columns: &[String], row: &Row) -> Result<(), EngineError> {
    match row.iter().find(|(key, _)| !columns.iter().any(|c| c.as_str() == *key)) {
        Some((key, _)) => Err(EngineError::UnknownColumn(key.to_string())),
        None => Ok(()),
    }
}
