//! FILENAME: tests/common/mod.rs
//! Fixtures shared by the group-engine integration tests.

use engine::{CellValue, Table};

/// Sales records: (region, product, quarter, sales, units).
pub struct SalesFixture;

impl SalesFixture {
    pub fn headers() -> Vec<&'static str> {
        vec!["region", "product", "quarter", "sales", "units"]
    }

    pub fn data() -> Vec<(&'static str, &'static str, &'static str, f64, i64)> {
        vec![
            ("North", "Apples", "Q1", 100.0, 10),
            ("North", "Oranges", "Q1", 150.0, 15),
            ("South", "Apples", "Q1", 200.0, 20),
            ("North", "Apples", "Q2", 120.0, 12),
            ("South", "Oranges", "Q2", 250.0, 25),
            ("East", "Apples", "Q2", 90.0, 9),
            ("North", "Apples", "Q3", 130.0, 10),
        ]
    }

    pub fn table() -> Table {
        let records = Self::data().into_iter().map(|(region, product, quarter, sales, units)| {
            vec![
                CellValue::from(region),
                CellValue::from(product),
                CellValue::from(quarter),
                CellValue::Float(sales),
                CellValue::Integer(units),
            ]
        });
        Table::from_records(Self::headers(), records).expect("fixture columns are unique")
    }
}

/// The two-row table used by the statistics examples.
pub fn numeric_column() -> Table {
    Table::from_records(
        ["numericColumn"],
        vec![vec![10.into()], vec![20.into()]],
    )
    .expect("fixture columns are unique")
}
