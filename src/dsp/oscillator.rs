use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::{blep::MinBlep, volts_to_freq};
use crate::FREQ_C4;

/*
Band-limited Oscillator
=======================

Phase accumulator driving a sawtooth, with minBLEP correction at the wrap.

Vocabulary
----------

  phase       Position within one cycle, 0.0 .. 1.0.

  increment   How far the phase moves per sample: freq · sample_time.

  pitch       Volts above C4 (1V/oct): freq = C4 · 2^pitch.


The Ramp
--------

The ramp is offset by half a cycle so the drop sits at phase 0.5:

    phase   0.0 ──────── 0.5 ──────── 1.0
    out     0.0 ↗  +1.0 │ −1.0 ↗   0.0
                        │
                        └ discontinuity of −2

Detecting the drop then only needs "did the phase cross 0.5 this sample",
which never straddles the phase wrap at 1.0.


Sub-sample Timing
-----------------

With `p_prev = phase − increment`:

    crossing = (0.5 − p_prev) / increment

If 0 < crossing ≤ 1 the drop happened `1 − crossing` samples ago. The
correction is inserted at offset `crossing − 1` (in (−1, 0]) so the minBLEP
lines up with where the drop really was, not where the sample grid put it.

The increment used here is clamped to [1e-6, 0.35]: near zero the division
blows up, and above ~1/3 of the sample rate several drops could land in one
sample and the crossing test stops meaning anything.
*/

pub const MIN_PHASE_INCREMENT: f32 = 1e-6;
pub const MAX_PHASE_INCREMENT: f32 = 0.35;
const SAW_DROP: f32 = -2.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Saw,
    Sine,
}

pub struct Oscillator {
    waveform: Waveform,
    reference_hz: f32,
    phase: f32,
    blep: MinBlep,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self::with_reference(waveform, FREQ_C4)
    }

    pub fn sawtooth() -> Self {
        Self::new(Waveform::Saw)
    }

    pub fn sine() -> Self {
        Self::new(Waveform::Sine)
    }

    pub fn with_reference(waveform: Waveform, reference_hz: f32) -> Self {
        Self {
            waveform,
            reference_hz,
            phase: 0.0,
            blep: MinBlep::new(),
        }
    }

    /// Frequency in Hz for a 1V/oct pitch.
    #[inline]
    pub fn frequency(&self, pitch: f32) -> f32 {
        volts_to_freq(self.reference_hz, pitch)
    }

    /// Advance by one sample at `pitch` and return the waveform value.
    pub fn render(&mut self, sample_time: f32, pitch: f32) -> f32 {
        let pitch = if pitch.is_finite() { pitch } else { 0.0 };
        let freq = self.frequency(pitch);

        self.phase += freq * sample_time;
        self.phase -= self.phase.floor();
        if !self.phase.is_finite() {
            self.phase = 0.0;
        }

        match self.waveform {
            Waveform::Sine => (TAU * (self.phase - 0.5)).sin(),
            Waveform::Saw => self.saw(freq * sample_time),
        }
    }

    fn saw(&mut self, increment: f32) -> f32 {
        let increment = if increment.is_finite() {
            increment.clamp(MIN_PHASE_INCREMENT, MAX_PHASE_INCREMENT)
        } else {
            MIN_PHASE_INCREMENT
        };

        let crossing = (0.5 - (self.phase - increment)) / increment;
        if crossing > 0.0 && crossing <= 1.0 {
            self.blep.insert_discontinuity(crossing - 1.0, SAW_DROP);
        }

        let x = (self.phase + 0.5).fract();
        2.0 * x - 1.0 + self.blep.process()
    }

    /// Fill `buffer` with consecutive samples at a fixed pitch.
    pub fn render_block(&mut self, buffer: &mut [f32], sample_time: f32, pitch: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.render(sample_time, pitch);
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.blep.reset();
    }
}
