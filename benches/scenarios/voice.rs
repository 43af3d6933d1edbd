//! Benchmarks for the complete Duetto voice.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use duetto_dsp::{Controls, DuettoVoice, RenderCtx};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voice");
    let ctx = RenderCtx::new(SAMPLE_RATE);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === IDLE ===
        // Empty pattern: the whole chain still runs on silence
        let mut voice = DuettoVoice::new();
        let controls = Controls::default();
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| {
                voice.render_block(black_box(&ctx), black_box(&controls), black_box(&mut buffer));
            })
        });

        // === PLAYING ===
        // Full pattern at max tempo, resonant filter, long delay
        let mut voice = DuettoVoice::new();
        let mut controls = Controls {
            tempo: 6.0,
            resonance: 0.8,
            delay: 0.8,
            ..Default::default()
        };
        let mut scratch = vec![0.0f32; 1];
        for note in [0, 3, 5, 7, 9, 2, 6, 8] {
            controls.notes[note] = 1.0;
            // One press per step: hold until the clock moves on
            let step = voice.sequencer().current_step();
            while voice.sequencer().current_step() == step {
                voice.render_block(&ctx, &controls, &mut scratch);
            }
            controls.release_triggers();
        }
        group.bench_with_input(BenchmarkId::new("playing", size), &size, |b, _| {
            b.iter(|| {
                voice.render_block(black_box(&ctx), black_box(&controls), black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
