//! Low-level DSP primitives used by the voice pipeline.
//!
//! These components are allocation-free once constructed and are embedded
//! directly in the voice struct. Sequencing and control mapping live
//! elsewhere.

/// Minimum-phase band-limited step (minBLEP) table and corrector.
pub mod blep;
/// Variable-length feedback delay line.
pub mod delay;
/// Exponential attack/decay envelope generator.
pub mod envelope;
/// Four-pole nonlinear ladder low-pass filter.
pub mod filter;
/// Fixed-step Runge-Kutta integration.
pub mod integrate;
/// Band-limited sawtooth (and sine) oscillator.
pub mod oscillator;
/// Smooth bounded waveshapers.
pub mod saturation;

pub use envelope::Envelope;
pub use filter::LadderFilter;
pub use oscillator::{Oscillator, Waveform};

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn crossfade(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// 1V/oct conversion: `reference * 2^volts`.
#[inline]
pub fn volts_to_freq(reference: f32, volts: f32) -> f32 {
    reference * volts.exp2()
}
