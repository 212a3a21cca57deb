//! FILENAME: core/engine/src/cell.rs
//! PURPOSE: Defines the typed value held by a single field of a row.
//! CONTEXT: This file contains the `CellValue` enum together with its comparison,
//! numeric-coercion, type-inference and canonical-text rules. Every other part of
//! the engine (sorting, grouping, codecs) goes through these rules so that a value
//! behaves the same way everywhere.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The runtime value of one field.
///
/// Equality is tag-sensitive: `Integer(10)` is not equal to `Float(10.0)`.
/// Floats compare equal when their numeric values are equal, and NaN equals NaN,
/// so the type can serve as a hash-map key (group keys, mode counting).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Shared Null used when a row has no entry for a column.
pub static NULL: CellValue = CellValue::Null;

impl CellValue {
    /// Short lowercase name of the value's tag, used in error messages and type display.
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Null => "null",
            CellValue::Integer(_) => "integer",
            CellValue::Float(_) => "float",
            CellValue::Text(_) => "text",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Integer(_) | CellValue::Float(_))
    }

    /// Compares two values of the same tag.
    ///
    /// Text compares lexicographically (by bytes), floats by IEEE total order,
    /// and Null only equals Null. Any other pairing is a `TypeMismatch`.
    pub fn compare(&self, other: &CellValue) -> Result<Ordering, EngineError> {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => Ok(Ordering::Equal),
            (CellValue::Integer(a), CellValue::Integer(b)) => Ok(a.cmp(b)),
            (CellValue::Float(a), CellValue::Float(b)) => Ok(a.total_cmp(b)),
            (CellValue::Text(a), CellValue::Text(b)) => Ok(a.cmp(b)),
            (a, b) => Err(EngineError::TypeMismatch {
                left: a.type_name(),
                right: b.type_name(),
            }),
        }
    }

    /// Ordering used for sorting: Null sorts before every non-null value,
    /// non-null values follow [`CellValue::compare`].
    pub fn compare_nulls_first(&self, other: &CellValue) -> Result<Ordering, EngineError> {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => Ok(Ordering::Equal),
            (CellValue::Null, _) => Ok(Ordering::Less),
            (_, CellValue::Null) => Ok(Ordering::Greater),
            (a, b) => a.compare(b),
        }
    }

    /// Coerces a numeric value to `f64`. Text and Null are `NotNumeric`.
    pub fn to_number(&self) -> Result<f64, EngineError> {
        match self {
            CellValue::Integer(i) => Ok(*i as f64),
            CellValue::Float(f) => Ok(*f),
            other => Err(EngineError::NotNumeric {
                column: None,
                found: other.type_name(),
            }),
        }
    }

    pub fn as_integer(&self) -> Result<i64, EngineError> {
        match self {
            CellValue::Integer(i) => Ok(*i),
            other => Err(EngineError::TypeMismatch {
                left: other.type_name(),
                right: "integer",
            }),
        }
    }

    pub fn as_text(&self) -> Result<&str, EngineError> {
        match self {
            CellValue::Text(s) => Ok(s),
            other => Err(EngineError::TypeMismatch {
                left: other.type_name(),
                right: "text",
            }),
        }
    }

    /// Infers a typed value from a raw text field.
    ///
    /// An optional sign followed only by digits is an `Integer` (when it fits in
    /// `i64`), anything else that reads as a decimal number is a `Float`, and the
    /// rest stays `Text`. Empty-field handling is left to the caller.
    pub fn infer(raw: &str) -> CellValue {
        if is_integer_literal(raw) {
            if let Ok(i) = raw.parse::<i64>() {
                return CellValue::Integer(i);
            }
        }
        if is_decimal_literal(raw) {
            if let Ok(f) = raw.parse::<f64>() {
                return CellValue::Float(f);
            }
        }
        CellValue::Text(raw.to_string())
    }

    /// Canonical text form used by delimited-text export.
    ///
    /// Integers print in decimal, floats always carry a fractional part
    /// (`15.0`), text is verbatim and Null is the empty string.
    pub fn canonical_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(f) => format_float(*f),
            CellValue::Text(s) => s.clone(),
        }
    }
}

fn is_integer_literal(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

// Restricts float parsing to plain decimal/scientific notation so that words
// like "inf" or "NaN" stay text.
fn is_decimal_literal(raw: &str) -> bool {
    raw.bytes().any(|b| b.is_ascii_digit())
        && raw
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}

fn format_float(f: f64) -> String {
    let s = f.to_string();
    if f.is_finite() && !s.contains('.') {
        format!("{}.0", s)
    } else {
        s
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Integer(a), CellValue::Integer(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => (a.is_nan() && b.is_nan()) || a == b,
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Null => {}
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => {
                if f.is_nan() {
                    u64::MAX.hash(state);
                } else if *f == 0.0 {
                    // 0.0 and -0.0 are equal and must hash alike
                    0u64.hash(state);
                } else {
                    f.to_bits().hash(state);
                }
            }
            CellValue::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for CellValue {
    /// Display form for console output; Null shows as `null`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str("null"),
            other => f.write_str(&other.canonical_text()),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Null
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Integer(value as i64)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}
