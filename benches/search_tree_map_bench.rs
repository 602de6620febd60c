//! Benchmark for SearchTreeMap vs standard BTreeMap.
//!
//! Keys are fed in a scrambled order so the unbalanced tree stays shallow,
//! except in the `balance` group which starts from a sorted chain.

use bstmap::tree::SearchTreeMap;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeMap;
use std::hint::black_box;

/// Visits every key in `0..size` exactly once in a scattered order.
/// 7919 is prime, so the stride is coprime with every benchmarked size.
fn scrambled(size: i32) -> impl Iterator<Item = i32> {
    (0..size).map(move |index| index * 7919 % size)
}

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert");

    for size in [100, 1000, 10000] {
        group.bench_with_input(
            BenchmarkId::new("SearchTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = SearchTreeMap::new();
                    for key in scrambled(size) {
                        map.insert((black_box(key), black_box(key * 2)));
                    }
                    black_box(map)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = BTreeMap::new();
                    for key in scrambled(size) {
                        map.entry(black_box(key)).or_insert(black_box(key * 2));
                    }
                    black_box(map)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// find Benchmark
// =============================================================================

fn benchmark_find(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("find");

    for size in [100, 1000, 10000] {
        let tree_map: SearchTreeMap<i32, i32> = scrambled(size).map(|key| (key, key * 2)).collect();
        let standard_map: BTreeMap<i32, i32> = (0..size).map(|key| (key, key * 2)).collect();

        group.bench_with_input(
            BenchmarkId::new("SearchTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in 0..size {
                        if let Some(&value) = tree_map.find(&black_box(key)).value() {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in 0..size {
                        if let Some(&value) = standard_map.get(&black_box(key)) {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// erase Benchmark
// =============================================================================

fn benchmark_erase(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("erase");

    for size in [100, 1000, 10000] {
        let tree_map: SearchTreeMap<i32, i32> = scrambled(size).map(|key| (key, key * 2)).collect();
        let standard_map: BTreeMap<i32, i32> = (0..size).map(|key| (key, key * 2)).collect();

        group.bench_with_input(
            BenchmarkId::new("SearchTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter_batched(
                    || tree_map.clone(),
                    |mut map| {
                        for key in 0..size {
                            let _ = map.erase(&black_box(key));
                        }
                        black_box(map)
                    },
                    criterion::BatchSize::LargeInput,
                );
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter_batched(
                    || standard_map.clone(),
                    |mut map| {
                        for key in 0..size {
                            map.remove(&black_box(key));
                        }
                        black_box(map)
                    },
                    criterion::BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

// =============================================================================
// balance Benchmark
// =============================================================================

fn benchmark_balance(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("balance");

    for size in [100, 1000, 5000] {
        let chain: SearchTreeMap<i32, i32> = (0..size).map(|key| (key, key * 2)).collect();

        group.bench_with_input(BenchmarkId::new("SearchTreeMap", size), &size, |bencher, _| {
            bencher.iter_batched(
                || chain.clone(),
                |mut map| {
                    map.balance();
                    black_box(map)
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// iteration Benchmark
// =============================================================================

fn benchmark_iteration(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("iteration");

    for size in [100, 1000, 10000] {
        let tree_map: SearchTreeMap<i32, i32> = scrambled(size).map(|key| (key, key * 2)).collect();
        let standard_map: BTreeMap<i32, i32> = (0..size).map(|key| (key, key * 2)).collect();

        group.bench_with_input(BenchmarkId::new("SearchTreeMap", size), &size, |bencher, _| {
            bencher.iter(|| {
                let sum: i32 = tree_map.values().sum();
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, _| {
            bencher.iter(|| {
                let sum: i32 = standard_map.values().sum();
                black_box(sum)
            });
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Group and Main
// =============================================================================

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_find,
    benchmark_erase,
    benchmark_balance,
    benchmark_iteration
);

criterion_main!(benches);
