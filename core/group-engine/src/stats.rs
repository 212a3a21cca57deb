//! FILENAME: core/group-engine/src/stats.rs
//! Statistics over a sequence of cell values.
//!
//! Numeric statistics (sum, mean, median, standard deviation) skip Null and
//! fail with `NotNumeric` on any Text value: a mixed column is an error, never
//! silently coerced. Mode works on any values and compares by equality, so
//! `Integer(2)` and `Float(2.0)` are counted separately.

use rustc_hash::FxHashMap;

use engine::{CellValue, EngineError, Table};

// ============================================================================
// NUMERIC ACCUMULATOR
// ============================================================================

/// Running numeric state for sum/mean/variance in a single pass.
/// Uses Welford's algorithm for numerical stability.
#[derive(Debug, Clone, Default)]
pub struct NumericAccumulator {
    pub count: u64,
    pub sum: f64,
    mean: f64,
    m2: f64,
}

impl NumericAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;

        let delta = value - self.mean;
        self.mean += delta / (self.count as f64);
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    /// Arithmetic mean; 0.0 when nothing was added.
    pub fn mean(&self) -> f64 {
        if self.count > 0 {
            self.sum / (self.count as f64)
        } else {
            0.0
        }
    }

    /// Sample standard deviation; `None` for fewer than two values.
    pub fn std_dev(&self) -> Option<f64> {
        if self.count > 1 {
            Some((self.m2 / ((self.count - 1) as f64)).sqrt())
        } else {
            None
        }
    }
}

// ============================================================================
// VALUE-LEVEL STATISTICS
// ============================================================================

/// Collects the non-null values as `f64`, failing on the first Text value.
pub fn numeric_values<'a, I>(values: I) -> Result<Vec<f64>, EngineError>
where
    I: IntoIterator<Item = &'a CellValue>,
{
    values
        .into_iter()
        .filter(|v| !v.is_null())
        .map(CellValue::to_number)
        .collect()
}

pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Arithmetic mean; 0.0 for an empty input.
pub fn mean(values: &[f64]) -> f64 {
    let mut acc = NumericAccumulator::new();
    values.iter().for_each(|&v| acc.add(v));
    acc.mean()
}

/// Median of the values; `None` for an empty input.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let count = sorted.len();
    if count % 2 == 0 {
        Some((sorted[count / 2 - 1] + sorted[count / 2]) / 2.0)
    } else {
        Some(sorted[count / 2])
    }
}

/// Sample standard deviation; `None` for fewer than two values.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let mut acc = NumericAccumulator::new();
    values.iter().for_each(|&v| acc.add(v));
    acc.std_dev()
}

/// Most frequent non-null value.
///
/// When several values share the highest frequency, the one that appears
/// first in the input wins. Returns Null when there are no non-null values.
pub fn mode<'a, I>(values: I) -> CellValue
where
    I: IntoIterator<Item = &'a CellValue>,
{
    // value -> (frequency, first position)
    let mut counts: FxHashMap<&CellValue, (usize, usize)> = FxHashMap::default();
    for (position, value) in values.into_iter().filter(|v| !v.is_null()).enumerate() {
        counts.entry(value).or_insert((0, position)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value.clone())
        .unwrap_or(CellValue::Null)
}

// ============================================================================
// WHOLE-TABLE STATISTICS
// ============================================================================

/// Mean of one column over the whole table (0.0 if it has no numeric values).
pub fn calculate_mean(table: &Table, column: &str) -> Result<f64, EngineError> {
    let values = numeric_values(table.column_values(column)).map_err(|e| e.in_column(column))?;
    Ok(mean(&values))
}

/// Median of one column over the whole table, Null when it has no numeric values.
pub fn calculate_median(table: &Table, column: &str) -> Result<CellValue, EngineError> {
    let values = numeric_values(table.column_values(column)).map_err(|e| e.in_column(column))?;
    Ok(median(&values).into())
}

/// Sample standard deviation of one column, Null for fewer than two values.
pub fn calculate_std_dev(table: &Table, column: &str) -> Result<CellValue, EngineError> {
    let values = numeric_values(table.column_values(column)).map_err(|e| e.in_column(column))?;
    Ok(std_dev(&values).into())
}

pub fn calculate_mode(table: &Table, column: &str) -> CellValue {
    mode(table.column_values(column))
}
