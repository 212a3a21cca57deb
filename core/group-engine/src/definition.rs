//! FILENAME: core/group-engine/src/definition.rs
//! Group Definition - The serializable description of an aggregation.
//!
//! This module contains the types needed to DESCRIBE a group-by:
//! which columns form the group key and which statistic is computed
//! for which input column. These structures are designed to be:
//! - Serializable (so aggregation requests can be stored or sent as JSON)
//! - Immutable snapshots of caller intent

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// AGGREGATION
// ============================================================================

/// Supported aggregation functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationType {
    /// Number of rows in the partition.
    Count,
    /// Sum of numeric values (0.0 when there are none).
    Sum,
    /// Arithmetic mean of numeric values (0.0 when there are none).
    Mean,
    /// Middle numeric value; mean of the two middle values for even counts.
    Median,
    /// Most frequent non-null value, compared by equality.
    Mode,
    /// Sample standard deviation (n - 1 denominator).
    StdDev,
}

impl AggregationType {
    /// Resolves a column name used by the name-driven grouping contract,
    /// where a column literally called `mean` receives the mean, and so on.
    pub fn from_column_name(name: &str) -> Option<AggregationType> {
        match name {
            "count" => Some(AggregationType::Count),
            "sum" => Some(AggregationType::Sum),
            "mean" => Some(AggregationType::Mean),
            "median" => Some(AggregationType::Median),
            "mode" => Some(AggregationType::Mode),
            "stddev" => Some(AggregationType::StdDev),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AggregationType::Count => "count",
            AggregationType::Sum => "sum",
            AggregationType::Mean => "mean",
            AggregationType::Median => "median",
            AggregationType::Mode => "mode",
            AggregationType::StdDev => "stddev",
        }
    }

    /// Whether the aggregation needs every non-null input to be numeric.
    pub fn requires_numbers(self) -> bool {
        !matches!(self, AggregationType::Count | AggregationType::Mode)
    }
}

impl fmt::Display for AggregationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggregationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "avg" | "average" => Ok(AggregationType::Mean),
            "std" | "stdev" | "std_dev" => Ok(AggregationType::StdDev),
            other => AggregationType::from_column_name(other)
                .ok_or_else(|| format!("unknown aggregation '{}'", s)),
        }
    }
}

// ============================================================================
// FIELD DEFINITIONS
// ============================================================================

/// One aggregated output column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateField {
    /// Input column the statistic reads.
    pub column: String,

    /// The aggregation function to apply.
    pub aggregation: AggregationType,

    /// Output column name (defaults to `<column>_<aggregation>`).
    pub output: String,
}

impl AggregateField {
    pub fn new(column: impl Into<String>, aggregation: AggregationType) -> Self {
        let column = column.into();
        let output = format!("{}_{}", column, aggregation);
        AggregateField {
            column,
            aggregation,
            output,
        }
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }
}

// ============================================================================
// GROUP DEFINITION
// ============================================================================

/// Explicit description of a group-by: key columns plus aggregate fields.
///
/// The output table has the `group_by` columns (in order) followed by each
/// field's `output` column (in order).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDefinition {
    /// Group-by key columns.
    #[serde(default)]
    pub group_by: Vec<String>,

    /// Aggregated fields.
    #[serde(default)]
    pub aggregates: Vec<AggregateField>,
}

impl GroupDefinition {
    pub fn new<S: Into<String>>(group_by: impl IntoIterator<Item = S>) -> Self {
        GroupDefinition {
            group_by: group_by.into_iter().map(Into::into).collect(),
            aggregates: Vec::new(),
        }
    }

    /// Adds an aggregate field (builder style).
    pub fn aggregate(mut self, field: AggregateField) -> Self {
        self.aggregates.push(field);
        self
    }

    /// Output column names in output order.
    pub fn output_columns(&self) -> Vec<String> {
        self.group_by
            .iter()
            .cloned()
            .chain(self.aggregates.iter().map(|f| f.output.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_names_resolve() {
        assert_eq!(AggregationType::from_column_name("count"), Some(AggregationType::Count));
        assert_eq!(AggregationType::from_column_name("median"), Some(AggregationType::Median));
        assert_eq!(AggregationType::from_column_name("Mean"), None);
        assert_eq!(AggregationType::from_column_name("salary"), None);
    }

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!("AVG".parse::<AggregationType>(), Ok(AggregationType::Mean));
        assert_eq!("mode".parse::<AggregationType>(), Ok(AggregationType::Mode));
        assert_eq!("stdev".parse::<AggregationType>(), Ok(AggregationType::StdDev));
        assert!("total".parse::<AggregationType>().is_err());
    }

    #[test]
    fn output_columns_follow_definition_order() {
        let def = GroupDefinition::new(["city"])
            .aggregate(AggregateField::new("age", AggregationType::Mean))
            .aggregate(AggregateField::new("age", AggregationType::Count).with_output("n"));
        assert_eq!(def.output_columns(), vec!["city", "age_mean", "n"]);
    }

    #[test]
    fn definition_round_trips_through_json() {
        let def = GroupDefinition::new(["city"])
            .aggregate(AggregateField::new("age", AggregationType::Median));
        let json = serde_json::to_string(&def).unwrap();
        let back: GroupDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, def);
    }
}
