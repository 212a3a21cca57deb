//! FILENAME: app/cli/src/demo.rs
//! Built-in sample data and the walkthrough run by `tabula demo`.

use std::fmt::Write;

use anyhow::{Context, Result};

use engine::{Predicate, Table};
use group_engine::group_by_columns;

use crate::display::{render_data_types, render_rows, render_shape};

const DEMO_ROWS: usize = 3;

pub fn sample_people() -> Result<Table> {
    let table = Table::from_records(
        ["name", "age", "city"],
        vec![
            vec!["Alice".into(), 30.into(), "New York".into()],
            vec!["Bob".into(), 25.into(), "Los Angeles".into()],
            vec!["Charlie".into(), 35.into(), "New York".into()],
            vec!["Diana".into(), 28.into(), "Chicago".into()],
            vec!["Evan".into(), 22.into(), "Los Angeles".into()],
            vec!["Fiona".into(), 41.into(), "Chicago".into()],
        ],
    )?;
    Ok(table)
}

/// Runs the walkthrough: inspect, filter `age > 25`, sort by name, group by city.
pub fn run() -> Result<String> {
    let table = sample_people()?;
    let mut out = String::new();

    let _ = writeln!(out, "== Sample data");
    out.push_str(&render_rows(&table, DEMO_ROWS));
    let _ = writeln!(out, "{}", render_shape(&table));
    out.push_str(&render_data_types(&table));

    let older = Predicate::parse("age>25")?;
    let filtered = table
        .filter(|row| older.eval(row))
        .context("Demo filter failed")?;
    let _ = writeln!(out, "\n== Filtered (age > 25)");
    out.push_str(&render_rows(&filtered, DEMO_ROWS));

    let sorted = table.sort_by("name").context("Demo sort failed")?;
    let _ = writeln!(out, "\n== Sorted by name");
    out.push_str(&render_rows(&sorted, DEMO_ROWS));

    let grouped = group_by_columns(&table, &["city"]).context("Demo grouping failed")?;
    let _ = writeln!(out, "\n== Grouped by city");
    out.push_str(&render_rows(&grouped, DEMO_ROWS));

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_runs_every_step() {
        let text = run().unwrap();
        assert!(text.contains("Rows: 6, Columns: 3"));
        assert!(text.contains("age: Integer"));
        assert!(text.contains("== Grouped by city"));
    }

    #[test]
    fn demo_groups_cover_all_cities() {
        let table = sample_people().unwrap();
        let grouped = group_by_columns(&table, &["city"]).unwrap();
        assert_eq!(grouped.row_count(), 3);
        assert_eq!(grouped.columns(), table.columns());
    }
}
