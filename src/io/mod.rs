// Purpose - external interfaces: what the host hands in, what it gets back

use crate::{NUM_COLORS, NUM_NOTES, NUM_STEPS};

/// Timing information for one invocation of the pipeline.
///
/// `sample_rate` and `sample_time` are redundant; the host supplies both so
/// the per-sample path never divides.
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub sample_time: f32,
}

impl RenderCtx {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            sample_time: 1.0 / sample_rate,
        }
    }
}

/// Snapshot of every control the voice reads, taken once per sample.
///
/// Continuous controls use the panel's native units:
/// - `tempo`: 0..6, step rate is `100/60 * tempo` Hz
/// - `cutoff`: volts above C4 (1V/oct)
/// - `resonance`: 0..1
/// - `delay`: 0..1, mapped exponentially onto 10ms..1s
///
/// Trigger levels are "pressed" while above zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controls {
    pub tempo: f32,
    pub cutoff: f32,
    pub resonance: f32,
    pub delay: f32,
    pub notes: [f32; NUM_NOTES],
    pub steps: [f32; NUM_STEPS],
}

impl Controls {
    pub const TEMPO_RANGE: (f32, f32) = (0.0, 6.0);
    pub const CUTOFF_RANGE: (f32, f32) = (-4.0, 5.0);
    pub const RESONANCE_RANGE: (f32, f32) = (0.0, 1.0);
    pub const DELAY_RANGE: (f32, f32) = (0.0, 1.0);

    /// Release every note and step-clear trigger.
    pub fn release_triggers(&mut self) {
        self.notes = [0.0; NUM_NOTES];
        self.steps = [0.0; NUM_STEPS];
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            tempo: 2.4, // 120 bpm
            cutoff: 3.0,
            resonance: 0.0,
            delay: 0.5,
            notes: [0.0; NUM_NOTES],
            steps: [0.0; NUM_STEPS],
        }
    }
}

/// RGB brightness per step, for the (external) panel lights.
pub type StepLights = [[f32; NUM_COLORS]; NUM_STEPS];

/// Result of one pipeline invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceOutput {
    /// Output voltage, nominally within ±5V.
    pub voltage: f32,
    pub lights: StepLights,
}
