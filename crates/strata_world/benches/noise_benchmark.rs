//! Benchmark for noise sampling.
//!
//! Run with: cargo bench --package strata_world --bench noise_benchmark

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use strata_world::noise::{fbm2d, noise2d, noise3d, WorldSeed};
use strata_world::rng::SeededRng;

fn benchmark_noise2d(c: &mut Criterion) {
    let seed = WorldSeed::new(42);

    let mut group = c.benchmark_group("noise2d");
    group.throughput(Throughput::Elements(256));
    group.bench_function("16x16_samples", |b| {
        b.iter(|| {
            for z in 0..16 {
                for x in 0..16 {
                    black_box(noise2d(f64::from(x) * 0.1, f64::from(z) * 0.1, seed));
                }
            }
        });
    });
    group.finish();
}

fn benchmark_noise3d(c: &mut Criterion) {
    let seed = WorldSeed::new(42);

    c.bench_function("noise3d_single", |b| {
        let mut i = 0.0f64;
        b.iter(|| {
            i += 0.37;
            black_box(noise3d(black_box(i), i * 0.5, i * 0.25, seed))
        });
    });
}

fn benchmark_fbm(c: &mut Criterion) {
    let seed = WorldSeed::new(42);

    let mut group = c.benchmark_group("fbm2d");
    for octaves in [1u32, 4, 8] {
        group.bench_function(format!("{octaves}_octaves"), |b| {
            let mut i = 0.0f64;
            b.iter(|| {
                i += 1.0;
                black_box(fbm2d(i * 0.02, i * 0.03, seed, octaves, 2.0, 0.5))
            });
        });
    }
    group.finish();
}

fn benchmark_rng(c: &mut Criterion) {
    c.bench_function("seeded_rng_next_f64", |b| {
        let mut rng = SeededRng::new(42);
        b.iter(|| black_box(rng.next_f64()));
    });
}

criterion_group!(benches, benchmark_noise2d, benchmark_noise3d, benchmark_fbm, benchmark_rng);
criterion_main!(benches);
