use std::f32::consts::TAU;

use crate::dsp::{crossfade, integrate::rk4_step, saturation::pade_tanh, volts_to_freq};
use crate::io::RenderCtx;
use crate::FREQ_C4;

/*
Ladder Filter
=============

Four one-pole low-pass stages in series, with the last stage fed back
(inverted) into the first. Each stage rolls off 6 dB/octave, so the chain
gives 24 dB/octave; the feedback turns the phase shift at the cutoff into a
resonant peak.

    input ──(−)──→ [sat] → [pole 1] → [pole 2] → [pole 3] → [pole 4] ──┬──→ out
             ↑                                                         │
             └──────────────── resonance · sat(stage 4) ←──────────────┘


The Model
---------

Each pole is a capacitor charging toward the previous stage's (saturated)
voltage:

    dx0/dt = ω · (sat(u − k·sat(x3)) − sat(x0))
    dxi/dt = ω · (sat(x(i−1))        − sat(xi))      i = 1..3

    ω   = 2π · cutoff
    k   = resonance gain (0 .. max_resonance)
    sat = Padé tanh, bounded to ±1

Because every stage chases a target in [−1, 1] through a monotonic curve, the
states cannot run away no matter how loud the input or how high `k` is.


Control Mapping
---------------

  cutoff      volts above C4 (1V/oct): cutoff = C4 · 2^v, clamped to
              [1 Hz, min(max_cutoff, sample_rate / 4)] so ω·dt stays well
              inside RK4's stability region.

  resonance   0..1, squared for a gentler feel at the low end, then scaled
              by max_resonance (10 by default, self-oscillation from ~4).


Sub-sample Input
----------------

RK4 evaluates the derivative at t, t + dt/2 and t + dt. The input only changes
once per sample, so inside the step it is linearly interpolated from the
previous sample's input to the current one. That is why the filter carries
`previous_input` between calls.
*/

pub const MAX_CUTOFF_HZ: f32 = 8_000.0;
pub const MIN_CUTOFF_HZ: f32 = 1.0;
pub const MAX_RESONANCE: f32 = 10.0;

pub struct LadderFilter {
    state: [f32; 4],
    previous_input: f32,
    reference_hz: f32,
    max_cutoff_hz: f32,
    max_resonance: f32,
}

impl LadderFilter {
    pub fn new() -> Self {
        Self::with_limits(FREQ_C4, MAX_CUTOFF_HZ, MAX_RESONANCE)
    }

    pub fn with_limits(reference_hz: f32, max_cutoff_hz: f32, max_resonance: f32) -> Self {
        Self {
            state: [0.0; 4],
            previous_input: 0.0,
            reference_hz,
            max_cutoff_hz: max_cutoff_hz.max(MIN_CUTOFF_HZ),
            max_resonance: max_resonance.max(0.0),
        }
    }

    /// Cutoff in Hz for a 1V/oct control at the given sample rate.
    pub fn cutoff_hz(&self, control: f32, sample_rate: f32) -> f32 {
        let control = if control.is_finite() { control } else { 0.0 };
        let ceiling = self.max_cutoff_hz.min(sample_rate * 0.25).max(MIN_CUTOFF_HZ);
        volts_to_freq(self.reference_hz, control).clamp(MIN_CUTOFF_HZ, ceiling)
    }

    /// Feedback gain for a 0..1 resonance control.
    pub fn resonance_gain(&self, control: f32) -> f32 {
        let control = if control.is_finite() { control.clamp(0.0, 1.0) } else { 0.0 };
        control * control * self.max_resonance
    }

    /// Advance the filter by one sample and return the low-pass output.
    pub fn step(
        &mut self,
        ctx: &RenderCtx,
        input: f32,
        cutoff_control: f32,
        resonance_control: f32,
    ) -> f32 {
        let omega0 = TAU * self.cutoff_hz(cutoff_control, ctx.sample_rate);
        let resonance = self.resonance_gain(resonance_control);
        self.process(input, omega0, resonance, ctx.sample_time)
    }

    /// Advance with already-mapped coefficients.
    pub fn process(&mut self, input: f32, omega0: f32, resonance: f32, dt: f32) -> f32 {
        let input = if input.is_finite() { input } else { 0.0 };
        let previous = self.previous_input;

        rk4_step(0.0, dt, &mut self.state, |t, x, dxdt| {
            let u = crossfade(previous, input, t / dt);
            let driven = pade_tanh(u - resonance * pade_tanh(x[3]));
            let y0 = pade_tanh(x[0]);
            let y1 = pade_tanh(x[1]);
            let y2 = pade_tanh(x[2]);
            let y3 = pade_tanh(x[3]);

            dxdt[0] = omega0 * (driven - y0);
            dxdt[1] = omega0 * (y0 - y1);
            dxdt[2] = omega0 * (y1 - y2);
            dxdt[3] = omega0 * (y2 - y3);
        });

        self.previous_input = input;
        self.lowpass()
    }

    /// Fourth stage, the 24 dB/octave low-pass response.
    #[inline]
    pub fn lowpass(&self) -> f32 {
        self.state[3]
    }

    pub fn state(&self) -> [f32; 4] {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = [0.0; 4];
        self.previous_input = 0.0;
    }
}

impl Default for LadderFilter {
    fn default() -> Self {
        Self::new()
    }
}
