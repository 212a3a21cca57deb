//! Benchmarks for the group-by engine.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use engine::{CellValue, Table};
use group_engine::{group_by, group_by_columns, AggregateField, AggregationType, GroupDefinition};

const CITIES: [&str; 8] = [
    "Oslo", "Paris", "Lima", "Quito", "Accra", "Hanoi", "Perth", "Cairo",
];

fn build_table(rows: usize) -> Table {
    let records = (0..rows).map(|i| {
        vec![
            CellValue::from(CITIES[i % CITIES.len()]),
            CellValue::Integer((i % 97) as i64),
            CellValue::Float((i % 1013) as f64 * 0.5),
        ]
    });
    Table::from_records(["city", "age", "salary"], records).expect("unique columns")
}

fn bench_group_by(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_by");

    for &rows in &[1_000usize, 10_000, 100_000] {
        let table = build_table(rows);
        let definition = GroupDefinition::new(["city"])
            .aggregate(AggregateField::new("age", AggregationType::Mean))
            .aggregate(AggregateField::new("salary", AggregationType::Median))
            .aggregate(AggregateField::new("age", AggregationType::Mode));

        group.bench_with_input(BenchmarkId::new("explicit", rows), &table, |b, table| {
            b.iter(|| group_by(black_box(table), black_box(&definition)).expect("group_by"))
        });
    }

    group.finish();
}

fn bench_name_driven(c: &mut Criterion) {
    let table = build_table(10_000);
    let mut renamed = table.clone();
    renamed.rename_column("age", "mean").expect("rename");
    renamed.rename_column("salary", "median").expect("rename");

    c.bench_function("group_by_columns_10k", |b| {
        b.iter(|| group_by_columns(black_box(&renamed), &["city"]).expect("group_by_columns"))
    });
}

criterion_group!(benches, bench_group_by, bench_name_driven);
criterion_main!(benches);
