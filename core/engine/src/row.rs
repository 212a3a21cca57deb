//! FILENAME: core/engine/src/row.rs
//! PURPOSE: A single record of a table, keyed by column name.
//! CONTEXT: Rows are sparse: a codec may omit a field instead of storing an
//! explicit Null. Readers that need a value for every declared column use
//! `Row::value`, which resolves absent keys to Null.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cell::{CellValue, NULL};
use crate::error::EngineError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    values: FxHashMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Row {
            values: FxHashMap::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Row {
            values: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Sets a field, returning the previous value if there was one.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Option<CellValue> {
        self.values.insert(column.into(), value.into())
    }

    /// Returns the stored value, or `None` when the row has no such key.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.values.get(column)
    }

    /// Returns the stored value, treating an absent key as Null.
    pub fn value(&self, column: &str) -> &CellValue {
        self.values.get(column).unwrap_or(&NULL)
    }

    pub fn remove(&mut self, column: &str) -> Option<CellValue> {
        self.values.remove(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Moves the value stored under `old` to `new`. Does nothing if `old` is absent.
    pub fn rename_key(&mut self, old: &str, new: &str) {
        if let Some(value) = self.values.remove(old) {
            self.values.insert(new.to_string(), value);
        }
    }

    /// Number of keys actually stored (not the table's column count).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates stored fields in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    // ========================================================================
    // PREDICATE HELPERS
    // ========================================================================

    /// Looks up a field that must be present and non-null.
    pub fn require(&self, column: &str) -> Result<&CellValue, EngineError> {
        match self.values.get(column) {
            Some(CellValue::Null) | None => Err(EngineError::MissingField(column.to_string())),
            Some(value) => Ok(value),
        }
    }

    pub fn integer(&self, column: &str) -> Result<i64, EngineError> {
        self.require(column)?.as_integer()
    }

    pub fn number(&self, column: &str) -> Result<f64, EngineError> {
        self.require(column)?
            .to_number()
            .map_err(|e| e.in_column(column))
    }

    pub fn text(&self, column: &str) -> Result<&str, EngineError> {
        self.require(column)?.as_text()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}
