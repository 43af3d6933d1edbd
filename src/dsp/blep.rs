//! Minimum-phase band-limited step (minBLEP) correction.
//!
//! A naive sawtooth jumps from +1 to -1 in zero time. That step contains
//! energy at every frequency, and everything above Nyquist folds back down as
//! inharmonic aliasing. A band-limited step rises over a few samples instead;
//! subtracting the naive step and adding the band-limited one around each
//! discontinuity removes most of the aliasing while leaving the ramp alone.
//!
//! # Building the table
//!
//! ```text
//! windowed sinc ──→ real cepstrum ──→ fold to minimum phase ──→ exp/IFFT ──→ ∫ ──→ normalize
//! ```
//!
//! 1. A sinc with `Z` zero crossings per side, sampled `O` times per sample,
//!    Blackman-Harris windowed: the band-limited impulse.
//! 2. Its real cepstrum (`IFFT(log|FFT(x)|)`), folded onto positive
//!    quefrencies, is the cepstrum of the minimum-phase impulse with the same
//!    magnitude response. Minimum phase puts all the energy right after the
//!    discontinuity, so the correction needs no look-ahead.
//! 3. `IFFT(exp(FFT(folded)))` recovers that impulse; a running sum turns it
//!    into a step; dividing by the last value makes the step end at 1.
//!
//! The FFTs run once, in [`MinBlep::new`]. Rendering only does table lookups.
//!
//! # Correcting a discontinuity
//!
//! A jump of size `x` at sub-sample offset `p ∈ (-1, 0]` adds
//! `x · (step(j − p) − 1)` to each of the next `2Z` output samples. The
//! corrections accumulate in a ring, so overlapping discontinuities sum.

use std::f32::consts::PI;

use rustfft::{num_complex::Complex, FftPlanner};

/// Zero crossings per side of the windowed sinc.
pub const ZERO_CROSSINGS: usize = 16;
/// Table points per output sample.
pub const OVERSAMPLING: usize = 16;
/// Correction length in output samples.
pub const BLEP_LEN: usize = 2 * ZERO_CROSSINGS;

const TABLE_LEN: usize = BLEP_LEN * OVERSAMPLING;

pub struct MinBlep {
    /// Band-limited step, `TABLE_LEN + 1` points ending at exactly 1.0.
    step: Vec<f32>,
    /// Pending corrections for the next `BLEP_LEN` samples.
    ring: [f32; BLEP_LEN],
    pos: usize,
}

impl MinBlep {
    pub fn new() -> Self {
        let mut step = min_blep_step(ZERO_CROSSINGS, OVERSAMPLING);
        step.push(1.0);
        log::debug!(
            "built minBLEP table: {} points ({} zero crossings x{} oversampling)",
            step.len(),
            ZERO_CROSSINGS,
            OVERSAMPLING
        );

        Self {
            step,
            ring: [0.0; BLEP_LEN],
            pos: 0,
        }
    }

    /// Place a discontinuity of size `magnitude` at `offset` samples relative
    /// to the current frame. `offset` must lie in `(-1, 0]`; anything else is
    /// ignored.
    pub fn insert_discontinuity(&mut self, offset: f32, magnitude: f32) {
        if !(offset > -1.0 && offset <= 0.0) {
            return;
        }

        for j in 0..BLEP_LEN {
            let position = (j as f32 - offset) * OVERSAMPLING as f32;
            let index = (position as usize).min(TABLE_LEN - 1);
            let frac = position - index as f32;
            let value = super::crossfade(self.step[index], self.step[index + 1], frac);
            self.ring[(self.pos + j) % BLEP_LEN] += magnitude * (value - 1.0);
        }
    }

    /// Pop the correction for the current sample.
    #[inline]
    pub fn process(&mut self) -> f32 {
        let value = self.ring[self.pos];
        self.ring[self.pos] = 0.0;
        self.pos = (self.pos + 1) % BLEP_LEN;
        value
    }

    /// The band-limited step table (for inspection).
    pub fn table(&self) -> &[f32] {
        &self.step
    }

    pub fn reset(&mut self) {
        self.ring = [0.0; BLEP_LEN];
        self.pos = 0;
    }
}

impl Default for MinBlep {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn sinc(x: f32) -> f32 {
    if x == 0.0 {
        1.0
    } else {
        let x = x * PI;
        x.sin() / x
    }
}

fn blackman_harris(i: usize, n: usize) -> f32 {
    const A0: f32 = 0.358_75;
    const A1: f32 = 0.488_29;
    const A2: f32 = 0.141_28;
    const A3: f32 = 0.011_68;
    let phase = 2.0 * PI * i as f32 / (n - 1) as f32;
    A0 - A1 * phase.cos() + A2 * (2.0 * phase).cos() - A3 * (3.0 * phase).cos()
}

/// Minimum-phase band-limited step with `2·z·o` points.
fn min_blep_step(zero_crossings: usize, oversampling: usize) -> Vec<f32> {
    let n = 2 * zero_crossings * oversampling;
    let z = zero_crossings as f32;

    let mut planner = FftPlanner::<f32>::new();
    let forward = planner.plan_fft_forward(n);
    let inverse = planner.plan_fft_inverse(n);
    let scale = 1.0 / n as f32;

    // Windowed sinc spanning [-z, z].
    let mut buf: Vec<Complex<f32>> = (0..n)
        .map(|i| {
            let p = -z + 2.0 * z * i as f32 / (n - 1) as f32;
            Complex::new(sinc(p) * blackman_harris(i, n), 0.0)
        })
        .collect();

    // Real cepstrum.
    forward.process(&mut buf);
    for c in buf.iter_mut() {
        *c = Complex::new(c.norm().max(1e-20).ln(), 0.0);
    }
    inverse.process(&mut buf);
    for c in buf.iter_mut() {
        *c = Complex::new(c.re * scale, 0.0);
    }

    fold_cepstrum(&mut buf);

    // Back to the time domain as a minimum-phase impulse.
    forward.process(&mut buf);
    for c in buf.iter_mut() {
        *c = c.exp();
    }
    inverse.process(&mut buf);

    // Integrate and normalize.
    let mut total = 0.0f32;
    let mut step: Vec<f32> = buf
        .iter()
        .map(|c| {
            total += c.re * scale;
            total
        })
        .collect();
    let norm = step.last().copied().unwrap_or(1.0);
    if norm.abs() > f32::EPSILON {
        for s in step.iter_mut() {
            *s /= norm;
        }
    }
    step
}

/// Fold a real cepstrum onto positive quefrencies: `c[0]` and `c[n/2]` stay,
/// `c[1..n/2]` double, the rest is zeroed.
fn fold_cepstrum(cepstrum: &mut [Complex<f32>]) {
    let half = cepstrum.len() / 2;
    for (i, c) in cepstrum.iter_mut().enumerate() {
        if i == 0 || i == half {
            continue;
        }
        c.re = if i < half { 2.0 * c.re } else { 0.0 };
    }
}
