//! FILENAME: tests/test_grouping.rs
//! Integration tests for partitioning and aggregation.

mod common;

use common::SalesFixture;
use engine::{CellValue, EngineError, Table};
use group_engine::{
    calculate_mean, calculate_median, calculate_mode, calculate_std_dev, group_by,
    group_by_columns, partition, stats, AggregateField, AggregationType, GroupDefinition,
};

// ============================================================================
// PARTITION PROPERTIES
// ============================================================================

#[test]
fn test_partitions_are_exhaustive_and_disjoint() {
    let table = SalesFixture::table();
    for columns in [vec![], vec!["region"], vec!["region", "product"], vec!["quarter", "units"]] {
        let parts = partition(&table, &columns);
        let total: usize = parts.iter().map(|p| p.len()).sum();
        assert_eq!(total, table.row_count());

        let mut seen: Vec<usize> = parts.iter().flat_map(|p| p.rows.clone()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), table.row_count());
    }
}

#[test]
fn test_count_column_sums_to_row_count() {
    let table = SalesFixture::table();
    let def = GroupDefinition::new(["region", "product"])
        .aggregate(AggregateField::new("sales", AggregationType::Count).with_output("n"));
    let out = group_by(&table, &def).unwrap();

    let total: i64 = out.rows().iter().map(|r| r.integer("n").unwrap()).sum();
    assert_eq!(total as usize, table.row_count());
}

// ============================================================================
// EXPLICIT DEFINITIONS
// ============================================================================

#[test]
fn test_group_by_region_statistics() {
    let table = SalesFixture::table();
    let def = GroupDefinition::new(["region"])
        .aggregate(AggregateField::new("sales", AggregationType::Sum))
        .aggregate(AggregateField::new("sales", AggregationType::Mean))
        .aggregate(AggregateField::new("units", AggregationType::Median))
        .aggregate(AggregateField::new("product", AggregationType::Mode));
    let out = group_by(&table, &def).unwrap();

    assert_eq!(
        out.columns(),
        &["region", "sales_sum", "sales_mean", "units_median", "product_mode"]
    );
    let regions: Vec<&str> = out.rows().iter().map(|r| r.text("region").unwrap()).collect();
    assert_eq!(regions, vec!["North", "South", "East"]);

    let north = &out.rows()[0];
    assert_eq!(north.value("sales_sum"), &CellValue::Float(500.0));
    assert_eq!(north.value("sales_mean"), &CellValue::Float(125.0));
    // units 10, 15, 12, 10 -> sorted 10, 10, 12, 15
    assert_eq!(north.value("units_median"), &CellValue::Float(11.0));
    assert_eq!(north.value("product_mode"), &CellValue::from("Apples"));
}

#[test]
fn test_group_by_output_is_independent_of_input() {
    let table = SalesFixture::table();
    let def = GroupDefinition::new(["region"]);
    let mut out = group_by(&table, &def).unwrap();
    out.rename_column("region", "area").unwrap();
    assert!(table.has_column("region"));
}

#[test]
fn test_duplicate_output_names_fail() {
    let table = SalesFixture::table();
    let def = GroupDefinition::new(["region"])
        .aggregate(AggregateField::new("sales", AggregationType::Sum).with_output("region"));
    assert_eq!(
        group_by(&table, &def).unwrap_err(),
        EngineError::DuplicateColumn("region".into())
    );
}

// ============================================================================
// NAME-DRIVEN GROUPING
// ============================================================================

#[test]
fn test_name_driven_virtual_columns() {
    for (name, expected) in [
        ("mean", CellValue::Float(15.0)),
        ("median", CellValue::Float(15.0)),
        ("count", CellValue::Integer(2)),
    ] {
        let mut table = common::numeric_column();
        table.rename_column("numericColumn", name).unwrap();
        let out = group_by_columns(&table, &Vec::<String>::new()).unwrap();
        assert_eq!(out.row_count(), 1);
        assert_eq!(out.rows()[0].value(name), &expected, "column {}", name);
    }
}

#[test]
fn test_name_driven_unknown_columns_are_null() {
    let table = SalesFixture::table();
    let out = group_by_columns(&table, &["region"]).unwrap();
    assert_eq!(out.columns(), table.columns());
    assert_eq!(out.row_count(), 3);
    for row in out.rows() {
        assert_eq!(row.value("sales"), &CellValue::Null);
        assert_eq!(row.value("product"), &CellValue::Null);
    }
}

#[test]
fn test_empty_table_groups_to_nothing() {
    let table = Table::with_columns(["a", "count"]).unwrap();
    let out = group_by_columns(&table, &["a"]).unwrap();
    assert_eq!(out.row_count(), 0);
    assert_eq!(out.columns(), table.columns());
}

// ============================================================================
// WHOLE-TABLE STATISTICS
// ============================================================================

#[test]
fn test_calculate_statistics() {
    let table = common::numeric_column();
    assert!((calculate_mean(&table, "numericColumn").unwrap() - 15.0).abs() < 0.001);
    assert_eq!(calculate_median(&table, "numericColumn").unwrap(), CellValue::Float(15.0));
    let sd = calculate_std_dev(&table, "numericColumn").unwrap().to_number().unwrap();
    assert!((sd - 7.071).abs() < 0.001);
    assert_eq!(calculate_mode(&table, "numericColumn"), CellValue::Integer(10));
}

#[test]
fn test_mode_examples() {
    let values: Vec<CellValue> = [1, 2, 2, 3].into_iter().map(CellValue::from).collect();
    assert_eq!(stats::mode(&values), CellValue::Integer(2));
    assert_eq!(stats::mode(&Vec::<CellValue>::new()), CellValue::Null);
}
