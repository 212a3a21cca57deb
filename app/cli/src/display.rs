//! FILENAME: app/cli/src/display.rs
//! Console rendering of tables: leading rows, shape and column types.

use std::fmt::Write;

use engine::Table;

/// Renders the first `n` rows as an aligned text grid under a header line.
/// Absent and Null fields both print as `null`.
pub fn render_rows(table: &Table, n: usize) -> String {
    let rows = table.head(n);
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            table
                .columns()
                .iter()
                .map(|c| row.value(c).to_string())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, table.columns().iter().map(String::as_str), &widths);
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    push_line(&mut out, rule.iter().map(String::as_str), &widths);
    for row in &cells {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    if table.row_count() > rows.len() {
        let _ = writeln!(out, "... {} more rows", table.row_count() - rows.len());
    }
    out
}

fn push_line<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = fields
        .zip(widths)
        .map(|(f, &w)| format!("{:<w$}", f, w = w))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

/// `Rows: r, Columns: c`
pub fn render_shape(table: &Table) -> String {
    let (rows, columns) = table.shape();
    format!("Rows: {}, Columns: {}", rows, columns)
}

/// One `column: type` line per declared column.
pub fn render_data_types(table: &Table) -> String {
    let mut out = String::new();
    for column in table.columns() {
        if let Some(kind) = table.column_type(column) {
            let _ = writeln!(out, "{}: {}", column, kind);
        }
    }
    out
}
