use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kempner::engine::kernel;
use kempner::{partition, sequential_total, Interval};

fn bench_kernel(c: &mut Criterion) {
    c.bench_function("evaluate 1..=100_000", |b| {
        b.iter(|| kernel::evaluate(black_box(&Interval::new(1, 100_000))))
    });

    c.bench_function("contains_nine", |b| {
        b.iter(|| (1..=10_000u64).filter(|i| kernel::contains_nine(black_box(*i))).count())
    });
}

fn bench_aggregate(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let intervals = partition(1_000_000, 8).unwrap();

    c.bench_function("sequential 1_000_000", |b| {
        b.iter(|| sequential_total(black_box(&intervals)))
    });

    c.bench_function("aggregate 1_000_000 over 8 tasks", |b| {
        b.iter(|| runtime.block_on(kempner::aggregate(intervals.clone(), 8)).unwrap())
    });
}

criterion_group!(benches, bench_kernel, bench_aggregate);
criterion_main!(benches);
