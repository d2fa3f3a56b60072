// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Population tick microbenchmarks
//!
//! Notes:
//! - Fixed seeds and connectivity, no I/O.
//! - Covers a cheap discrete rule and a stiff continuous one, on both sides
//!   of the parallel threshold.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use neurule_npu_neural::NeuronRule;
use neurule_npu_runtime::Population;

fn build(tag: &str, size: usize, parallel_threshold: usize) -> Population {
    let mut pop = Population::builder(size)
        .rule(NeuronRule::from_tag(tag).expect("known rule tag"))
        .seed(42)
        .random_fan_in(10.0 / size as f64, 0.5)
        .parallel_threshold(parallel_threshold)
        .build()
        .expect("valid population");
    pop.randomize();
    pop
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("population_tick");
    group.measurement_time(Duration::from_secs(3));

    for &size in &[1_000usize, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        for tag in ["linear", "izhikevich", "hodgkin_huxley"] {
            for (label, threshold) in [("sequential", usize::MAX), ("parallel", 0)] {
                let mut pop = build(tag, size, threshold);
                group.bench_with_input(BenchmarkId::new(format!("{tag}/{label}"), size), &size, |b, _| {
                    b.iter(|| black_box(pop.step()))
                });
            }
        }
    }
    group.finish();
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
