//! FILENAME: tests/common/mod.rs
//! Fixtures shared by the persistence integration tests.

use engine::{CellValue, Table};

/// Sample people dataset with Integer, Float and Text columns.
pub fn people() -> Table {
    Table::from_records(
        ["name", "age", "city", "salary"],
        vec![
            vec!["Alice".into(), 30.into(), "New York".into(), 75000.5.into()],
            vec!["Bob".into(), 25.into(), "Los Angeles".into(), 65000.0.into()],
            vec!["Charlie".into(), 35.into(), "Chicago".into(), 85000.25.into()],
            vec!["Diana".into(), (-28).into(), "Houston".into(), 70000.0.into()],
        ],
    )
    .expect("fixture columns are unique")
}

/// Same shape as `people`, with a Null and an absent field.
pub fn people_with_gaps() -> Table {
    let mut table = people();
    let mut row = engine::Row::new();
    row.insert("name", "Eve");
    row.insert("age", CellValue::Null);
    table.push_row(row).expect("fixture keys are declared columns");
    table
}
