use crate::MAX_DELAY_SAMPLES;

/*
Feedback Delay
==============

A FIFO of past samples. Whatever goes in comes out `length` samples later,
and part of what comes out is fed back in.

    input ──┬──────────────────────────────────(1 − mix)──→ (+) ──→ output
            │                                                ↑
            └──→ (+) ──→ [ FIFO, `length` samples ] ──┬──(mix)─┘
                  ↑                                   │ wet
                  └──────────── feedback ─────────────┘


Occupancy Follows the Target
----------------------------

Instead of a write head and a read head at a fixed distance, the buffer keeps
its *occupancy* equal to the requested length:

  occupancy > target    skip the read head past the excess oldest samples
                        (unheard) in one move, then read as below. The echo
                        jumps forward in time.

  occupancy == target   pop the oldest sample; that is the wet signal.

  occupancy < target    the buffer is still filling (start-up, or the delay
                        was just lengthened). Wet is 0 until it catches up.

Then `input + feedback · wet` is pushed (a zero target keeps the buffer
empty and the output dry). A shorter delay therefore takes
effect immediately and a longer one after a gap of silence, with no reads of
stale or uninitialized memory either way.


Time Mapping
------------

The delay knob (0..1) maps exponentially onto MIN_DELAY..MAX_DELAY seconds:

    seconds = MIN_DELAY · (MAX_DELAY / MIN_DELAY)^knob

    knob 0.0  →  10 ms
    knob 0.5  → 100 ms
    knob 1.0  →   1 s

The ring is allocated once with MAX_DELAY_SAMPLES slots; targets are clamped
to it and any push past it is dropped.
*/

pub const MIN_DELAY_SECONDS: f32 = 0.01;
pub const MAX_DELAY_SECONDS: f32 = 1.0;
pub const DEFAULT_FEEDBACK: f32 = 0.4;
pub const DEFAULT_MIX: f32 = 0.35;
/// Feedback ceiling; at 1.0 the echoes would never decay.
pub const MAX_FEEDBACK: f32 = 0.99;

pub struct DelayLine {
    buffer: Vec<f32>,
    /// Index of the oldest sample.
    read_pos: usize,
    len: usize,
    feedback: f32,
    mix: f32,
}

impl DelayLine {
    pub fn new() -> Self {
        Self::with_capacity(MAX_DELAY_SAMPLES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(1)],
            read_pos: 0,
            len: 0,
            feedback: DEFAULT_FEEDBACK,
            mix: DEFAULT_MIX,
        }
    }

    /// Set feedback gain (clamped to 0..MAX_FEEDBACK) and wet mix (0..1).
    pub fn with_feedback_mix(mut self, feedback: f32, mix: f32) -> Self {
        self.set_feedback(feedback);
        self.set_mix(mix);
        self
    }

    /// Delay time in seconds for a 0..1 knob over `min..max` seconds.
    pub fn knob_to_seconds(knob: f32, min_seconds: f32, max_seconds: f32) -> f32 {
        let knob = if knob.is_finite() { knob.clamp(0.0, 1.0) } else { 0.0 };
        min_seconds * (max_seconds / min_seconds).powf(knob)
    }

    /// Target occupancy for a delay time, clamped to capacity.
    pub fn target_length(&self, delay_seconds: f32, sample_rate: f32) -> usize {
        let samples = (delay_seconds * sample_rate).round();
        if samples.is_finite() && samples > 0.0 {
            (samples as usize).min(self.buffer.len())
        } else {
            0
        }
    }

    /// Process one sample with the delay given in seconds.
    pub fn process(&mut self, delay_seconds: f32, sample_rate: f32, input: f32) -> f32 {
        let target = self.target_length(delay_seconds, sample_rate);
        self.process_samples(target, input)
    }

    /// Process one sample with the delay given directly as an occupancy.
    pub fn process_samples(&mut self, target: usize, input: f32) -> f32 {
        let target = target.min(self.buffer.len());

        if self.len > target {
            self.drop_oldest(self.len - target);
        }

        let wet = if self.len == target && target > 0 {
            self.pop_oldest()
        } else {
            0.0
        };

        if target > 0 {
            self.push(input + self.feedback * wet);
        }

        input * (1.0 - self.mix) + wet * self.mix
    }

    /// Current number of buffered samples.
    pub fn occupancy(&self) -> usize {
        self.len
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = if feedback.is_finite() {
            feedback.clamp(0.0, MAX_FEEDBACK)
        } else {
            0.0
        };
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.mix = if mix.is_finite() { mix.clamp(0.0, 1.0) } else { 0.0 };
    }

    /// Empty the line. Old contents stay in memory but are never read again.
    pub fn reset(&mut self) {
        self.read_pos = 0;
        self.len = 0;
    }

    #[inline]
    fn drop_oldest(&mut self, count: usize) {
        self.read_pos = (self.read_pos + count) % self.buffer.len();
        self.len -= count;
    }

    #[inline]
    fn pop_oldest(&mut self) -> f32 {
        let value = self.buffer[self.read_pos];
        self.drop_oldest(1);
        value
    }

    #[inline]
    fn push(&mut self, sample: f32) {
        if self.len == self.buffer.len() {
            return;
        }
        let write_pos = (self.read_pos + self.len) % self.buffer.len();
        self.buffer[write_pos] = sample;
        self.len += 1;
    }
}

impl Default for DelayLine {
    fn default() -> Self {
        Self::new()
    }
}
