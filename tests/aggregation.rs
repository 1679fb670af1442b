use kempner::engine::kernel;
use kempner::{aggregate, partition, sequential_total, Interval, KempnerError, ParallelExecutor, RunConfig};

fn assert_close(a: f64, b: f64) {
    let scale = a.abs().max(b.abs()).max(1.0);
    assert!((a - b).abs() <= 1e-9 * scale, "{} != {}", a, b);
}

fn filtered_harmonic(n: u64) -> f64 {
    let mut total = 0.0;
    for i in 1..=n {
        if !i.to_string().contains('9') {
            total += 1.0 / i as f64;
        }
    }
    total
}

#[test]
fn scenario_b_remainder_absorbed() {
    let set = partition(7, 3).unwrap();
    let pairs: Vec<(u64, u64)> = set.iter().map(|i| (i.start, i.end)).collect();
    assert_eq!(pairs, vec![(1, 2), (3, 4), (5, 7)]);
}

#[test]
fn partition_is_pure() {
    assert_eq!(partition(1_000, 7).unwrap(), partition(1_000, 7).unwrap());
}

#[test]
fn kernel_excludes_every_nine() {
    let expected: f64 = (1..=20u64)
        .filter(|i| *i != 9 && *i != 19)
        .fold(0.0, |acc, i| acc + 1.0 / i as f64);
    assert_eq!(kernel::evaluate(&Interval::new(1, 20)), expected);
}

#[tokio::test]
async fn scenario_a_split_matches_whole() {
    let split = aggregate(partition(10, 2).unwrap(), 2).await.unwrap();
    let whole = aggregate(partition(10, 1).unwrap(), 1).await.unwrap();
    assert_close(split, whole);
}

#[tokio::test]
async fn nine_only_drops_nine() {
    let total = aggregate(partition(9, 1).unwrap(), 1).await.unwrap();
    let expected = (1..=8u64).fold(0.0, |acc, i| acc + 1.0 / i as f64);
    assert_eq!(total, expected);
}

#[tokio::test]
async fn total_is_invariant_to_task_count() {
    let n = 100_000;
    let expected = filtered_harmonic(n);

    for ntasks in [1, 2, 3, 4, 7, 16, 33] {
        let total = aggregate(partition(n, ntasks).unwrap(), 4).await.unwrap();
        assert_close(total, expected);
    }
}

#[tokio::test]
async fn repeated_runs_are_identical() {
    let intervals = RunConfig::new(50_000, 6).partition().unwrap();
    let executor = ParallelExecutor::new(6).unwrap();

    let first = executor.aggregate(intervals.clone()).await.unwrap();
    for _ in 0..3 {
        let again = executor.aggregate(intervals.clone()).await.unwrap();
        assert_eq!(again, first);
    }
    assert_eq!(first.total, sequential_total(&intervals));
}

#[tokio::test]
async fn more_tasks_than_terms() {
    let intervals = partition(4, 10).unwrap();
    assert_eq!(intervals.len(), 10);
    assert_eq!(intervals.covered(), 4);

    let total = aggregate(intervals, 3).await.unwrap();
    assert_close(total, filtered_harmonic(4));
}

#[tokio::test]
async fn invalid_configuration_is_rejected_before_dispatch() {
    assert!(matches!(RunConfig::new(0, 1).partition(), Err(KempnerError::InvalidConfiguration(_))));
    assert!(matches!(RunConfig::new(5, 0).partition(), Err(KempnerError::InvalidConfiguration(_))));

    let result = aggregate(partition(10, 2).unwrap(), 0).await;
    assert!(matches!(result, Err(KempnerError::InvalidConfiguration(_))));
}
