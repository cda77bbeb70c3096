//! Decision hot-path benchmark
//!
//! `TailDecider::observe` runs once per completed span, so it sits directly
//! on the application's span-completion path. The hot path is:
//!
//! 1. Registry lookup (sharded read lock, or shard write lock on first use)
//! 2. Entry lock + Welford push
//! 3. Band test
//!
//! # Run Instructions
//!
//! ```bash
//! cargo bench --bench observe_overhead
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use std::thread;
use tail_sampler::running_stat::RunningStat;
use tail_sampler::TailDecider;

/// Deterministic pseudo-latency around 10ms with occasional spikes
fn latency(i: u64) -> f64 {
    let jitter = ((i.wrapping_mul(2_654_435_761) >> 7) % 1000) as f64 / 1000.0;
    if i % 997 == 0 {
        250.0
    } else {
        10.0 + jitter
    }
}

/// Benchmark: bare Welford push (no locking, no registry)
fn bench_running_stat_push(c: &mut Criterion) {
    let mut stat = RunningStat::new();
    let mut i = 0u64;

    c.bench_function("running_stat_push", |b| {
        b.iter(|| {
            black_box(stat.push(black_box(latency(i))));
            i += 1;
        });
    });
}

/// Benchmark: observe on a single, already-registered operation
fn bench_observe_single_operation(c: &mut Criterion) {
    let decider = TailDecider::new();
    decider.observe("GET /users", 10.0);
    let mut i = 0u64;

    c.bench_function("observe_single_operation", |b| {
        b.iter(|| {
            black_box(decider.observe(black_box("GET /users"), latency(i)));
            i += 1;
        });
    });
}

/// Benchmark: observe spread across a varying number of operations
fn bench_observe_many_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("observe_many_operations");

    for operations in [10usize, 100, 1000, 10_000] {
        let names: Vec<String> = (0..operations).map(|n| format!("rpc.method_{}", n)).collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(operations),
            &names,
            |b, names| {
                let decider = TailDecider::new();
                for name in names {
                    decider.observe(name, 10.0);
                }
                let mut i = 0u64;

                b.iter(|| {
                    let name = &names[(i as usize) % names.len()];
                    black_box(decider.observe(name, latency(i)));
                    i += 1;
                });
            },
        );
    }

    group.finish();
}

/// Benchmark: 4 threads hammering the same operation
///
/// Measures the cost of per-entry lock contention.
fn bench_observe_contended(c: &mut Criterion) {
    c.bench_function("observe_contended_4_threads", |b| {
        b.iter(|| {
            let decider = Arc::new(TailDecider::new());
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let decider = Arc::clone(&decider);
                    thread::spawn(move || {
                        for i in 0..1000u64 {
                            decider.observe("contended", latency(i));
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }
            black_box(decider.stats("contended"));
        });
    });
}

/// Benchmark: stats lookup (cold path, diagnostics exporters)
fn bench_stats_lookup(c: &mut Criterion) {
    let decider = TailDecider::new();
    for i in 0..100 {
        decider.observe("GET /users", latency(i));
    }

    c.bench_function("stats_lookup", |b| {
        b.iter(|| {
            black_box(decider.stats(black_box("GET /users")));
        });
    });
}

criterion_group!(
    benches,
    bench_running_stat_push,
    bench_observe_single_operation,
    bench_observe_many_operations,
    bench_observe_contended,
    bench_stats_lookup,
);
criterion_main!(benches);
