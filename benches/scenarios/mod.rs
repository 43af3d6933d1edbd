//! Whole-voice benchmarks.
//!
//! The voice runs sequencer, oscillator, envelope, filter and delay on every
//! sample; these show what one Duetto costs per host callback.

mod voice;

pub use voice::bench_voice;
