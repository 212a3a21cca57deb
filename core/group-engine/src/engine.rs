//! FILENAME: core/group-engine/src/engine.rs
//! Group Engine - partitions a table by a group key and aggregates each partition.
//!
//! Algorithm:
//! 1. Build each row's group key from the grouping columns (absent field -> Null)
//! 2. Assign rows to partitions; partitions keep the order in which their key
//!    first appears in the input
//! 3. Emit one output row per partition: key values verbatim, then one value
//!    per aggregated column
//!
//! Two entry points share steps 1-2:
//! - `group_by` takes an explicit `GroupDefinition`
//! - `group_by_columns` is the name-driven contract, where the aggregation applied
//!   to a non-grouping column is chosen by that column's name

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use engine::{CellValue, ColumnType, EngineError, Row, Table};

use crate::definition::{AggregationType, GroupDefinition};
use crate::stats;

// ============================================================================
// PARTITIONS
// ============================================================================

/// The identity of a partition: one value per grouping column.
/// Equality is element-wise and tag-sensitive (`Integer(10) != Float(10.0)`).
pub type GroupKey = SmallVec<[CellValue; 4]>;

/// One group of rows sharing a key.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub key: GroupKey,
    /// Indices into the source table's rows, in input order.
    pub rows: Vec<usize>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of `column` for the rows of this partition.
    pub fn values<'a>(&'a self, table: &'a Table, column: &'a str) -> impl Iterator<Item = &'a CellValue> + 'a {
        self.rows.iter().map(move |&i| table.rows()[i].value(column))
    }
}

/// Builds the group key of one row.
pub fn group_key<S: AsRef<str>>(row: &Row, columns: &[S]) -> GroupKey {
    columns
        .iter()
        .map(|c| row.value(c.as_ref()).clone())
        .collect()
}

/// Splits the table's rows into partitions by group key, in order of first appearance.
///
/// Every row lands in exactly one partition. With no grouping columns the whole
/// table is one partition (or none, if the table is empty).
pub fn partition<S: AsRef<str>>(table: &Table, columns: &[S]) -> Vec<Partition> {
    let mut index: FxHashMap<GroupKey, usize> = FxHashMap::default();
    let mut partitions: Vec<Partition> = Vec::new();

    for (row_idx, row) in table.rows().iter().enumerate() {
        let key = group_key(row, columns);
        match index.get(&key) {
            Some(&p) => partitions[p].rows.push(row_idx),
            None => {
                index.insert(key.clone(), partitions.len());
                partitions.push(Partition {
                    key,
                    rows: vec![row_idx],
                });
            }
        }
    }

    log::debug!(
        target: "GROUP",
        "partitioned {} rows into {} groups",
        table.row_count(),
        partitions.len()
    );
    partitions
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Computes one aggregation over `column` within a partition.
pub fn compute_aggregate(
    table: &Table,
    partition: &Partition,
    column: &str,
    aggregation: AggregationType,
) -> Result<CellValue, EngineError> {
    let numbers = || {
        stats::numeric_values(partition.values(table, column)).map_err(|e| e.in_column(column))
    };

    let result = match aggregation {
        AggregationType::Count => CellValue::Integer(partition.len() as i64),
        AggregationType::Mode => stats::mode(partition.values(table, column)),
        AggregationType::Sum => CellValue::Float(stats::sum(&numbers()?)),
        AggregationType::Mean => CellValue::Float(stats::mean(&numbers()?)),
        AggregationType::Median => stats::median(&numbers()?).into(),
        AggregationType::StdDev => stats::std_dev(&numbers()?).into(),
    };
    Ok(result)
}

/// Groups `table` according to an explicit definition.
///
/// Every grouping and input column must be declared by the table
/// (`MissingField` otherwise) and output names must be unique
/// (`DuplicateColumn`). A numeric aggregation over a partition holding text
/// fails with `NotNumeric`.
pub fn group_by(table: &Table, definition: &GroupDefinition) -> Result<Table, EngineError> {
    let referenced = definition
        .group_by
        .iter()
        .chain(definition.aggregates.iter().map(|f| &f.column));
    for column in referenced {
        if !table.has_column(column) {
            return Err(EngineError::MissingField(column.clone()));
        }
    }

    let mut output = Table::new(definition.output_columns(), Vec::new())?;

    for part in partition(table, &definition.group_by) {
        let mut row = Row::with_capacity(output.column_count());
        for (column, value) in definition.group_by.iter().zip(part.key.iter()) {
            row.insert(column.clone(), value.clone());
        }
        for field in &definition.aggregates {
            let value = compute_aggregate(table, &part, &field.column, field.aggregation)?;
            row.insert(field.output.clone(), value);
        }
        output.push_row(row)?;
    }

    Ok(output)
}

/// Name-driven grouping.
///
/// The output keeps the input's column order. Grouping columns carry the key
/// values. A non-grouping column named `count`, `sum`, `mean`, `median`, `mode`
/// or `stddev` receives that statistic computed over its own values; when the
/// column holds no numbers (only text, or only Null) it receives Null instead.
/// A column mixing numbers and text fails with `NotNumeric`. Every other column
/// is Null.
pub fn group_by_columns<S: AsRef<str>>(table: &Table, grouping: &[S]) -> Result<Table, EngineError> {
    let is_grouping = |c: &str| grouping.iter().any(|g| g.as_ref() == c);

    // Resolve each column's treatment once for the whole table.
    let mut plan: Vec<(usize, Option<AggregationType>)> = Vec::new();
    for (idx, column) in table.columns().iter().enumerate() {
        if is_grouping(column) {
            continue;
        }
        let aggregation = match AggregationType::from_column_name(column) {
            Some(AggregationType::Count) => Some(AggregationType::Count),
            Some(agg) => match table.column_type(column) {
                Some(ColumnType::Mixed) => {
                    return Err(EngineError::NotNumeric {
                        column: Some(column.clone()),
                        found: "text",
                    })
                }
                Some(t) if t.is_numeric() => Some(agg),
                _ => None,
            },
            None => None,
        };
        plan.push((idx, aggregation));
    }

    let mut output = Table::new(table.columns().to_vec(), Vec::new())?;

    for part in partition(table, grouping) {
        let mut row = Row::with_capacity(output.column_count());
        for (column, value) in grouping.iter().zip(part.key.iter()) {
            if table.has_column(column.as_ref()) {
                row.insert(column.as_ref(), value.clone());
            }
        }
        for &(idx, aggregation) in &plan {
            let column = &table.columns()[idx];
            let value = match aggregation {
                Some(agg) => compute_aggregate(table, &part, column, agg)?,
                None => CellValue::Null,
            };
            row.insert(column.clone(), value);
        }
        output.push_row(row)?;
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::AggregateField;

    fn numeric_table() -> Table {
        let mut table = Table::with_columns(["numericColumn"]).unwrap();
        table.push_row([("numericColumn", 10)].into_iter().collect()).unwrap();
        table.push_row([("numericColumn", 20)].into_iter().collect()).unwrap();
        table
    }

    #[test]
    fn partitions_follow_first_appearance() {
        let table = Table::from_records(
            ["city"],
            vec![
                vec!["Oslo".into()],
                vec!["Paris".into()],
                vec!["Oslo".into()],
                vec![CellValue::Null],
            ],
        )
        .unwrap();
        let parts = partition(&table, &["city"]);
        let keys: Vec<_> = parts.iter().map(|p| p.key[0].clone()).collect();
        assert_eq!(
            keys,
            vec![CellValue::from("Oslo"), CellValue::from("Paris"), CellValue::Null]
        );
        assert_eq!(parts[0].rows, vec![0, 2]);
    }

    #[test]
    fn integer_and_float_keys_stay_apart() {
        let table = Table::from_records(["k"], vec![vec![10.into()], vec![10.0.into()]]).unwrap();
        assert_eq!(partition(&table, &["k"]).len(), 2);
    }

    #[test]
    fn missing_field_groups_with_null() {
        let mut table = Table::with_columns(["k", "v"]).unwrap();
        table.push_row([("v", 1)].into_iter().collect()).unwrap();
        table.push_row([("k", CellValue::Null), ("v", CellValue::Integer(2))].into_iter().collect()).unwrap();
        assert_eq!(partition(&table, &["k"]).len(), 1);
    }

    #[test]
    fn explicit_definition_over_whole_table() {
        let def = GroupDefinition::new(Vec::<String>::new())
            .aggregate(AggregateField::new("numericColumn", AggregationType::Mean).with_output("mean"))
            .aggregate(AggregateField::new("numericColumn", AggregationType::Median).with_output("median"))
            .aggregate(AggregateField::new("numericColumn", AggregationType::Count).with_output("count"));
        let out = group_by(&numeric_table(), &def).unwrap();
        assert_eq!(out.columns(), &["mean", "median", "count"]);
        assert_eq!(out.row_count(), 1);
        let row = &out.rows()[0];
        assert_eq!(row.value("mean"), &CellValue::Float(15.0));
        assert_eq!(row.value("median"), &CellValue::Float(15.0));
        assert_eq!(row.value("count"), &CellValue::Integer(2));
    }

    #[test]
    fn explicit_definition_rejects_unknown_columns() {
        let def = GroupDefinition::new(["nope"]);
        assert_eq!(
            group_by(&numeric_table(), &def).unwrap_err(),
            EngineError::MissingField("nope".into())
        );
    }

    #[test]
    fn explicit_numeric_aggregation_on_text_fails() {
        let table = Table::from_records(["g", "v"], vec![vec![1.into(), "x".into()]]).unwrap();
        let def = GroupDefinition::new(["g"]).aggregate(AggregateField::new("v", AggregationType::Sum));
        assert!(matches!(
            group_by(&table, &def),
            Err(EngineError::NotNumeric { .. })
        ));

        let def = GroupDefinition::new(["g"]).aggregate(AggregateField::new("v", AggregationType::Mode));
        let out = group_by(&table, &def).unwrap();
        assert_eq!(out.rows()[0].value("v_mode"), &CellValue::from("x"));
    }

    #[test]
    fn empty_partition_statistics() {
        let table = Table::from_records(
            ["g", "v"],
            vec![vec!["a".into(), CellValue::Null]],
        )
        .unwrap();
        let def = GroupDefinition::new(["g"])
            .aggregate(AggregateField::new("v", AggregationType::Mean))
            .aggregate(AggregateField::new("v", AggregationType::Median))
            .aggregate(AggregateField::new("v", AggregationType::Mode))
            .aggregate(AggregateField::new("v", AggregationType::StdDev));
        let out = group_by(&table, &def).unwrap();
        let row = &out.rows()[0];
        assert_eq!(row.value("v_mean"), &CellValue::Float(0.0));
        assert_eq!(row.value("v_median"), &CellValue::Null);
        assert_eq!(row.value("v_mode"), &CellValue::Null);
        assert_eq!(row.value("v_stddev"), &CellValue::Null);
    }

    #[test]
    fn name_driven_grouping_keeps_column_order() {
        let table = Table::from_records(
            ["mean", "city", "count", "name"],
            vec![
                vec![10.into(), "Oslo".into(), CellValue::Null, "a".into()],
                vec![20.into(), "Paris".into(), CellValue::Null, "b".into()],
                vec![30.into(), "Oslo".into(), CellValue::Null, "c".into()],
            ],
        )
        .unwrap();
        let out = group_by_columns(&table, &["city"]).unwrap();
        assert_eq!(out.columns(), table.columns());
        assert_eq!(out.row_count(), 2);

        let oslo = &out.rows()[0];
        assert_eq!(oslo.value("city"), &CellValue::from("Oslo"));
        assert_eq!(oslo.value("mean"), &CellValue::Float(20.0));
        assert_eq!(oslo.value("count"), &CellValue::Integer(2));
        assert_eq!(oslo.value("name"), &CellValue::Null);
    }

    #[test]
    fn name_driven_text_column_yields_null() {
        let table = Table::from_records(
            ["g", "mode"],
            vec![vec![1.into(), "x".into()], vec![1.into(), "x".into()]],
        )
        .unwrap();
        let out = group_by_columns(&table, &["g"]).unwrap();
        assert_eq!(out.rows()[0].value("mode"), &CellValue::Null);
    }

    #[test]
    fn name_driven_mixed_column_fails() {
        let table = Table::from_records(
            ["g", "median"],
            vec![vec![1.into(), 5.into()], vec![1.into(), "x".into()]],
        )
        .unwrap();
        assert_eq!(
            group_by_columns(&table, &["g"]).unwrap_err(),
            EngineError::NotNumeric {
                column: Some("median".into()),
                found: "text"
            }
        );
    }
}
