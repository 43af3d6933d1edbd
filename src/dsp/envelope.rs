/*
Attack/Decay Envelope
=====================

This module implements an exponential two-stage envelope: a sequencer step
fires an attack, the level rises until it crosses 1.0, then it falls back
toward silence. There is no sustain stage and no gate; every note is a
pluck.

Vocabulary
----------

  level       The envelope's current output value. It multiplies the filtered
              signal to shape its amplitude over time.

  attacking   Whether the envelope is in its rising stage. Set by `trigger()`,
              cleared when `level` reaches 1.0.

  target      The value the level is being pulled toward: 1.2 while attacking,
              0.0 otherwise.

  lambda      Rate of approach in 1/seconds (the inverse of the e-folding
              time). Larger is faster.


The Shape: E-folding
--------------------

  Level
    1.2 ┤ . . . . . . . . . . .   (attack target, never reached)
    1.0 ┤    ╭╮
        │   ╱  ╲
        │  │    ╲
        │  │     ╲__
    0.0 └──┴────────‾‾‾‾──────→ Time
        trigger

Each sample the level moves a fixed fraction of the remaining distance:

    level += (target − level) · lambda · dt

That is a first-order low-pass on a step, i.e. an exponential approach.
Aiming the attack at 1.2 instead of 1.0 lets it actually cross 1.0 in finite
time; that crossing is what hands over to the decay. The decay aims at 0.0 and
only approaches it asymptotically, so the level never goes negative.


Time Parameters
---------------

Attack and decay are given as normalized knob positions `t` in 0..1 and
mapped exponentially onto MIN_TIME..MAX_TIME:

    lambda = (MAX_TIME / MIN_TIME)^(−t) / MIN_TIME

    t = 0.0  →  lambda = 1000 /s   (1 ms)
    t = 0.5  →  lambda = 10 /s     (100 ms)
    t = 1.0  →  lambda = 0.1 /s    (10 s)

The per-sample coefficient `lambda · dt` is capped at 1.0; beyond that the
update would jump past the target.
*/

pub const MIN_TIME: f32 = 1e-3;
pub const MAX_TIME: f32 = 10.0;
pub const ATTACK_TARGET: f32 = 1.2;
/// Level at which the attack hands over to the decay.
pub const PEAK_LEVEL: f32 = 1.0;

/// The current stage of the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Attack,
    Decay,
}

pub struct Envelope {
    attack_lambda: f32,
    decay_lambda: f32,

    level: f32,
    attacking: bool,
}

impl Envelope {
    pub fn new() -> Self {
        Self::attack_decay(0.1, 0.5)
    }

    /// Build from normalized attack/decay knob positions (0 = fastest, 1 = slowest).
    pub fn attack_decay(attack: f32, decay: f32) -> Self {
        Self::with_time_range(attack, decay, MIN_TIME, MAX_TIME)
    }

    pub fn with_time_range(attack: f32, decay: f32, min_time: f32, max_time: f32) -> Self {
        Self {
            attack_lambda: time_to_lambda(attack, min_time, max_time),
            decay_lambda: time_to_lambda(decay, min_time, max_time),
            level: 0.0,
            attacking: false,
        }
    }

    /// Start (or restart) the rising stage from the current level.
    pub fn trigger(&mut self) {
        self.attacking = true;
    }

    /// Advance the envelope by one sample and return the new level.
    pub fn advance(&mut self, sample_time: f32) -> f32 {
        let (target, lambda) = if self.attacking {
            (ATTACK_TARGET, self.attack_lambda)
        } else {
            (0.0, self.decay_lambda)
        };

        let coefficient = (lambda * sample_time).clamp(0.0, 1.0);
        self.level += (target - self.level) * coefficient;

        if self.level >= PEAK_LEVEL {
            self.attacking = false;
        }

        self.level
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32], sample_time: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.advance(sample_time);
        }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    pub fn stage(&self) -> EnvelopeStage {
        if self.attacking {
            EnvelopeStage::Attack
        } else {
            EnvelopeStage::Decay
        }
    }

    pub fn reset(&mut self) {
        self.level = 0.0;
        self.attacking = false;
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a normalized time knob onto an approach rate in 1/seconds.
pub fn time_to_lambda(time: f32, min_time: f32, max_time: f32) -> f32 {
    let time = if time.is_finite() { time.clamp(0.0, 1.0) } else { 0.0 };
    (max_time / min_time).powf(-time) / min_time
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TIME: f32 = 1.0 / 48_000.0;

    #[test]
    fn lambda_spans_the_time_range() {
        assert!((time_to_lambda(0.0, MIN_TIME, MAX_TIME) - 1_000.0).abs() < 1e-2);
        assert!((time_to_lambda(0.5, MIN_TIME, MAX_TIME) - 10.0).abs() < 1e-3);
        assert!((time_to_lambda(1.0, MIN_TIME, MAX_TIME) - 0.1).abs() < 1e-5);
    }

    #[test]
    fn idle_envelope_stays_silent() {
        let mut env = Envelope::new();
        for _ in 0..100 {
            assert_eq!(env.advance(SAMPLE_TIME), 0.0);
        }
    }

    #[test]
    fn attack_rises_then_hands_over_to_decay() {
        let mut env = Envelope::new();
        env.trigger();
        assert_eq!(env.stage(), EnvelopeStage::Attack);

        let mut last = env.level();
        let mut samples = 0;
        while env.is_attacking() {
            let level = env.advance(SAMPLE_TIME);
            assert!(level >= last, "attack must not fall");
            last = level;
            samples += 1;
            assert!(samples < 48_000, "attack never completed");
        }
        assert!(env.level() >= PEAK_LEVEL);
        assert_eq!(env.stage(), EnvelopeStage::Decay);
    }

    #[test]
    fn decay_falls_toward_zero_without_crossing() {
        let mut env = Envelope::new();
        env.trigger();
        while env.is_attacking() {
            env.advance(SAMPLE_TIME);
        }

        let mut last = env.level();
        for _ in 0..48_000 * 5 {
            let level = env.advance(SAMPLE_TIME);
            assert!(level <= last, "decay must not rise");
            assert!(level >= 0.0, "decay must not go negative");
            last = level;
        }
        assert!(last < 1e-3, "expected the decay to be nearly silent, got {last}");
    }

    #[test]
    fn retrigger_during_decay_rises_from_current_level() {
        let mut env = Envelope::new();
        env.trigger();
        while env.is_attacking() {
            env.advance(SAMPLE_TIME);
        }
        for _ in 0..4_800 {
            env.advance(SAMPLE_TIME);
        }
        let before = env.level();
        assert!(before > 0.0);

        env.trigger();
        let after = env.advance(SAMPLE_TIME);
        assert!(after > before);
    }

    #[test]
    fn coarse_time_step_does_not_overshoot() {
        let mut env = Envelope::attack_decay(0.0, 0.0);
        env.trigger();
        // lambda * dt = 1000 * 0.01 = 10, capped at 1
        let level = env.advance(0.01);
        assert!((level - ATTACK_TARGET).abs() < 1e-6);
        let level = env.advance(0.01);
        assert_eq!(level, 0.0);
    }
}
