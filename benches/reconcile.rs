//! Reconciliation benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spendview::{apply_batch, ChangeEvent, Expense, ExpenseId, MirrorMetrics};

fn snapshot(n: usize) -> Vec<Expense> {
    (0..n)
        .map(|i| Expense::new(format!("id{}", i), format!("item{}", i), (i % 500) as f64))
        .collect()
}

/// Benchmark rebuilding a snapshot from a pure stream of adds.
fn bench_rebuild_from_adds(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild_from_adds");

    for size in [100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &n| {
            let events: Vec<ChangeEvent> = (0..n)
                .map(|i| ChangeEvent::Added {
                    expense: Expense::new(format!("id{}", i), format!("item{}", i), i as f64),
                })
                .collect();
            let metrics = MirrorMetrics::new();

            b.iter(|| {
                black_box(apply_batch(Vec::new(), events.clone(), &metrics));
            });
        });
    }

    group.finish();
}

/// Benchmark applying a mixed batch against an existing snapshot.
fn bench_mixed_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_batch");

    for size in [100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &n| {
            let state = snapshot(n);
            let metrics = MirrorMetrics::new();
            let events = vec![
                ChangeEvent::Modified {
                    expense: Expense::new(format!("id{}", n / 2), "updated", 999.0),
                },
                ChangeEvent::Removed {
                    id: ExpenseId::new(format!("id{}", n - 1)),
                },
                ChangeEvent::Added {
                    expense: Expense::new("fresh", "New", 42.0),
                },
            ];

            b.iter(|| {
                black_box(apply_batch(state.clone(), events.clone(), &metrics));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rebuild_from_adds, bench_mixed_batch);
criterion_main!(benches);
