#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::delay::{DEFAULT_FEEDBACK, DEFAULT_MIX, MAX_DELAY_SECONDS, MAX_FEEDBACK, MIN_DELAY_SECONDS};
use crate::dsp::envelope::{MAX_TIME, MIN_TIME};
use crate::dsp::filter::{MAX_CUTOFF_HZ, MAX_RESONANCE};
use crate::dsp::Waveform;
use crate::FREQ_C4;

/// Largest ladder feedback gain a config may ask for.
pub const RESONANCE_CEILING: f32 = 20.0;

/// Output volts per unit of signal.
pub const DEFAULT_OUTPUT_GAIN: f32 = 5.0;

/// Tuning of one voice. `Default` is the stock instrument.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceConfig {
    pub waveform: Waveform,
    /// Frequency at 0V, for both the oscillator and the filter cutoff.
    pub reference_hz: f32,

    /// Envelope knob positions, 0..1 over `min_time..max_time` seconds.
    pub attack: f32,
    pub decay: f32,
    pub min_time: f32,
    pub max_time: f32,

    pub min_delay_seconds: f32,
    pub max_delay_seconds: f32,
    pub feedback: f32,
    pub mix: f32,

    pub max_cutoff_hz: f32,
    pub max_resonance: f32,

    pub output_gain: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            waveform: Waveform::Saw,
            reference_hz: FREQ_C4,
            attack: 0.1,
            decay: 0.5,
            min_time: MIN_TIME,
            max_time: MAX_TIME,
            min_delay_seconds: MIN_DELAY_SECONDS,
            max_delay_seconds: MAX_DELAY_SECONDS,
            feedback: DEFAULT_FEEDBACK,
            mix: DEFAULT_MIX,
            max_cutoff_hz: MAX_CUTOFF_HZ,
            max_resonance: MAX_RESONANCE,
            output_gain: DEFAULT_OUTPUT_GAIN,
        }
    }
}

impl VoiceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("reference_hz", self.reference_hz)?;
        in_range("attack", self.attack, 0.0, 1.0)?;
        in_range("decay", self.decay, 0.0, 1.0)?;
        positive("min_time", self.min_time)?;
        ordered("envelope time", self.min_time, self.max_time)?;
        positive("min_delay_seconds", self.min_delay_seconds)?;
        ordered("delay time", self.min_delay_seconds, self.max_delay_seconds)?;
        in_range("feedback", self.feedback, 0.0, MAX_FEEDBACK)?;
        in_range("mix", self.mix, 0.0, 1.0)?;
        positive("max_cutoff_hz", self.max_cutoff_hz)?;
        in_range("max_resonance", self.max_resonance, 0.0, RESONANCE_CEILING)?;
        positive("output_gain", self.output_gain)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn in_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn ordered(field: &'static str, low: f32, high: f32) -> Result<(), ConfigError> {
    if high.is_finite() && low < high {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange { field, low, high })
    }
}

/// Errors that can occur when validating a voice config
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Value must be finite and above zero
    NonPositive { field: &'static str, value: f32 },
    /// Value lies outside its allowed range
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    /// Lower bound of a range is not below its upper bound
    InvertedRange {
        field: &'static str,
        low: f32,
        high: f32,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NonPositive { field, value } => {
                write!(f, "{} must be positive, got {}", field, value)
            }
            ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            } => {
                write!(f, "{} must be within {}..={}, got {}", field, min, max, value)
            }
            ConfigError::InvertedRange { field, low, high } => {
                write!(f, "{} range is empty: {} is not below {}", field, low, high)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
