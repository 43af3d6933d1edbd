//! Benchmarks for the RK4 ladder filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use duetto_dsp::dsp::LadderFilter;
use duetto_dsp::RenderCtx;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let ctx = RenderCtx::new(SAMPLE_RATE);

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();
        let mut buffer = vec![0.0f32; size];

        // Four tanh stages, four derivative evaluations per sample
        let mut filter = LadderFilter::new();
        group.bench_with_input(BenchmarkId::new("ladder", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(&input) {
                    *out = filter.step(black_box(&ctx), x, black_box(2.0), black_box(0.0));
                }
            })
        });

        // Near self-oscillation
        let mut filter = LadderFilter::new();
        group.bench_with_input(BenchmarkId::new("ladder_resonant", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(&input) {
                    *out = filter.step(black_box(&ctx), x, black_box(2.0), black_box(0.95));
                }
            })
        });
    }

    group.finish();
}
