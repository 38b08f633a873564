use criterion::{black_box, criterion_group, criterion_main, Criterion};
use eurobase::metabase::{resolve, Column, MetabaseRow, MetabaseTable};

/// Synthetic catalog roughly shaped like the real metabase: many datasets,
/// few dimensions, a moderate label universe per dimension.
fn synthetic_table(rows: usize) -> MetabaseTable {
    let mut data = Vec::with_capacity(rows);
    for i in 0..rows {
        data.push(MetabaseRow::new(
            &format!("ds{:04}", i % 500),
            &format!("dim{:02}", i % 20),
            &format!("lbl{:03}", i % 200),
        ));
    }
    MetabaseTable::new(data)
}

fn bench_resolver(c: &mut Criterion) {
    let table = synthetic_table(50_000);

    c.bench_function("resolve_all_datasets", |b| {
        b.iter(|| resolve(black_box(&table), Column::Dataset, &[]).unwrap())
    });

    let one = [(Column::Dimension, "dim07".to_string())];
    c.bench_function("resolve_datasets_by_dimension", |b| {
        b.iter(|| resolve(black_box(&table), Column::Dataset, black_box(&one)).unwrap())
    });

    let two = [
        (Column::Dataset, "ds0042".to_string()),
        (Column::Dimension, "dim02".to_string()),
    ];
    c.bench_function("resolve_labels_two_constraints", |b| {
        b.iter(|| resolve(black_box(&table), Column::Label, black_box(&two)).unwrap())
    });
}

criterion_group!(benches, bench_resolver);
criterion_main!(benches);
