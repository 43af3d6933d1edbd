//! Benchmarks for the exponential attack/decay envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use duetto_dsp::dsp::Envelope;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let sample_time = 1.0 / SAMPLE_RATE;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (slow attack so it stays rising)
        let mut env = Envelope::attack_decay(0.9, 0.5);
        env.trigger();
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), black_box(sample_time));
            })
        });

        // Decay phase (slow decay so it never settles)
        let mut env = Envelope::attack_decay(0.0, 1.0);
        env.trigger();
        for _ in 0..200 {
            env.advance(sample_time);
        }
        group.bench_with_input(BenchmarkId::new("decay", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), black_box(sample_time));
            })
        });
    }

    group.finish();
}
