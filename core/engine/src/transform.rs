//! FILENAME: core/engine/src/transform.rs
//! PURPOSE: Row-level transforms that produce a new table from an existing one.
//! CONTEXT: `filter` and `sort_by` never mutate their input. Output rows are
//! clones of the input rows, so the two tables share no row storage.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;
use crate::error::EngineError;
use crate::row::Row;
use crate::table::Table;

// ============================================================================
// SORT
// ============================================================================

/// Sorting order for [`Table::sort_by_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Null first, then ascending.
    #[default]
    Ascending,
    /// Descending, Null last.
    Descending,
}

impl Table {
    /// Stable ascending sort on one column. Null sorts before every other value.
    pub fn sort_by(&self, column: &str) -> Result<Table, EngineError> {
        self.sort_by_with(column, SortOrder::Ascending)
    }

    /// Stable sort on one column in the given order.
    ///
    /// The column must hold at most one non-null tag; otherwise the sort fails
    /// with `TypeMismatch` before any row is moved.
    pub fn sort_by_with(&self, column: &str, order: SortOrder) -> Result<Table, EngineError> {
        check_sortable(self, column)?;

        let mut rows: Vec<Row> = self.rows().to_vec();
        rows.sort_by(|a, b| {
            let ord = a
                .value(column)
                .compare_nulls_first(b.value(column))
                .unwrap_or(Ordering::Equal);
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });

        log::debug!(target: "TRANSFORM", "sort_by '{}' {:?} over {} rows", column, order, rows.len());
        Ok(Table::from_parts_unchecked(self.columns().to_vec(), rows))
    }

    // ========================================================================
    // FILTER
    // ========================================================================

    /// Keeps the rows for which `predicate` returns `true`, in input order.
    ///
    /// The first predicate error aborts the whole filter and is reported as
    /// `FilterEvaluation` with the index of the failing row.
    pub fn filter<F>(&self, mut predicate: F) -> Result<Table, EngineError>
    where
        F: FnMut(&Row) -> Result<bool, EngineError>,
    {
        let mut rows = Vec::new();
        for (index, row) in self.rows().iter().enumerate() {
            let keep = predicate(row).map_err(|source| EngineError::FilterEvaluation {
                row: index,
                source: Box::new(source),
            })?;
            if keep {
                rows.push(row.clone());
            }
        }

        log::debug!(target: "TRANSFORM", "filter kept {} of {} rows", rows.len(), self.row_count());
        Ok(Table::from_parts_unchecked(self.columns().to_vec(), rows))
    }
}

fn check_sortable(table: &Table, column: &str) -> Result<(), EngineError> {
    let mut seen: Option<&CellValue> = None;
    for value in table.column_values(column) {
        if value.is_null() {
            continue;
        }
        match seen {
            None => seen = Some(value),
            Some(first) => {
                first.compare(value)?;
            }
        }
    }
    Ok(())
}

// ============================================================================
// DECLARATIVE PREDICATES
// ============================================================================

/// Comparison operators for [`Predicate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `=` or `==`
    Eq,
    /// `!=`
    Ne,
}

impl CompareOp {
    fn holds(self, ord: Ordering) -> bool {
        match self {
            CompareOp::Lt => ord == Ordering::Less,
            CompareOp::Le => ord != Ordering::Greater,
            CompareOp::Gt => ord == Ordering::Greater,
            CompareOp::Ge => ord != Ordering::Less,
            CompareOp::Eq => ord == Ordering::Equal,
            CompareOp::Ne => ord != Ordering::Equal,
        }
    }
}

/// A single-column comparison against a constant, e.g. `age > 25`.
///
/// Integer and Float operands are compared numerically; every other pairing
/// follows [`CellValue::compare`]. A missing or Null field is an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub column: String,
    pub op: CompareOp,
    pub value: CellValue,
}

impl Predicate {
    pub fn new(column: impl Into<String>, op: CompareOp, value: impl Into<CellValue>) -> Self {
        Predicate {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// Parses `"<column><op><value>"`, where op is one of `< <= > >= = == !=`.
    ///
    /// The value is type-inferred like an imported field; wrapping it in single
    /// or double quotes forces text.
    pub fn parse(expr: &str) -> Result<Predicate, EngineError> {
        let invalid = || EngineError::InvalidPredicate(expr.to_string());

        let start = expr.find(['<', '>', '=', '!']).ok_or_else(invalid)?;
        let rest = &expr[start..];
        let (op, len) = if rest.starts_with("<=") {
            (CompareOp::Le, 2)
        } else if rest.starts_with(">=") {
            (CompareOp::Ge, 2)
        } else if rest.starts_with("!=") {
            (CompareOp::Ne, 2)
        } else if rest.starts_with("==") {
            (CompareOp::Eq, 2)
        } else if rest.starts_with('<') {
            (CompareOp::Lt, 1)
        } else if rest.starts_with('>') {
            (CompareOp::Gt, 1)
        } else if rest.starts_with('=') {
            (CompareOp::Eq, 1)
        } else {
            return Err(invalid());
        };

        let column = expr[..start].trim();
        let raw = rest[len..].trim();
        if column.is_empty() || raw.is_empty() {
            return Err(invalid());
        }

        let value = strip_quotes(raw)
            .map(CellValue::from)
            .unwrap_or_else(|| CellValue::infer(raw));
        Ok(Predicate::new(column, op, value))
    }

    pub fn eval(&self, row: &Row) -> Result<bool, EngineError> {
        let field = row.require(&self.column)?;
        let ord = match (field, &self.value) {
            (CellValue::Integer(_), CellValue::Float(_)) | (CellValue::Float(_), CellValue::Integer(_)) => {
                field.to_number()?.total_cmp(&self.value.to_number()?)
            }
            _ => field.compare(&self.value)?,
        };
        Ok(self.op.holds(ord))
    }
}

fn strip_quotes(raw: &str) -> Option<&str> {
    ['\'', '"']
        .iter()
        .find_map(|&q| raw.strip_prefix(q).and_then(|s| s.strip_suffix(q)))
}
