//! Benchmarks for the feedback delay line.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use duetto_dsp::dsp::delay::DelayLine;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    // Test with different delay times (in seconds)
    let delay_times: &[f32] = &[
        0.01, // knob at 0
        0.1,  // knob at 0.5
        1.0,  // knob at 1
    ];

    for &size in BLOCK_SIZES {
        // Generate a test signal
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();
        let mut buffer = vec![0.0f32; size];

        for &seconds in delay_times {
            // Steady state: occupancy already matches the target
            let mut delay = DelayLine::new();
            let target = delay.target_length(seconds, SAMPLE_RATE);
            for _ in 0..target {
                delay.process_samples(target, 0.0);
            }
            group.bench_with_input(
                BenchmarkId::new(format!("steady_{}ms", (seconds * 1000.0) as u32), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        for (out, &x) in buffer.iter_mut().zip(&input) {
                            *out = delay.process(black_box(seconds), SAMPLE_RATE, x);
                        }
                    })
                },
            );
        }

        // Knob swept every sample: alternating drops and refills
        let mut delay = DelayLine::new();
        let mut sweep = 0usize;
        group.bench_with_input(BenchmarkId::new("swept", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(&input) {
                    sweep = (sweep + 1) % 4_800;
                    let seconds = DelayLine::knob_to_seconds(sweep as f32 / 4_800.0, 0.01, 0.1);
                    *out = delay.process(black_box(seconds), SAMPLE_RATE, x);
                }
            })
        });
    }

    group.finish();
}
