//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use duetto_dsp::dsp::Oscillator;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let sample_time = 1.0 / SAMPLE_RATE;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Sine - sin() per sample
        let mut osc = Oscillator::sine();
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| {
                osc.render_block(black_box(&mut buffer), black_box(sample_time), black_box(0.0));
            })
        });

        // Sawtooth at middle C - a minBLEP insert every ~183 samples
        let mut osc = Oscillator::sawtooth();
        group.bench_with_input(BenchmarkId::new("saw_c4", size), &size, |b, _| {
            b.iter(|| {
                osc.render_block(black_box(&mut buffer), black_box(sample_time), black_box(0.0));
            })
        });

        // Sawtooth four octaves up - inserts every ~11 samples
        let mut osc = Oscillator::sawtooth();
        group.bench_with_input(BenchmarkId::new("saw_c8", size), &size, |b, _| {
            b.iter(|| {
                osc.render_block(black_box(&mut buffer), black_box(sample_time), black_box(4.0));
            })
        });
    }

    group.finish();
}
