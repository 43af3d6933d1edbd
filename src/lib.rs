pub mod dsp;
pub mod io; // Host-facing context, controls and outputs
pub mod sequencing; // Step sequencer, note table, trigger edges
pub mod synth; // Voice pipeline, configuration, control messages

pub use io::{Controls, RenderCtx, VoiceOutput};
pub use synth::{config::VoiceConfig, voice::DuettoVoice};

pub const MAX_BLOCK_SIZE: usize = 2048;
/// Delay ring capacity: a little over 43 seconds at 48kHz.
pub const MAX_DELAY_SAMPLES: usize = 1 << 21;
/// Selectable notes in the scale (one trigger per note).
pub const NUM_NOTES: usize = 10;
/// Sequence length.
pub const NUM_STEPS: usize = 8;
/// Channels per step light (RGB).
pub const NUM_COLORS: usize = 3;
/// Middle C, the 0V reference of the 1V/oct convention.
pub const FREQ_C4: f32 = 261.625_6;
