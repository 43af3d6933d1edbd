pub mod notes;
pub mod sequencer;
pub mod trigger;

pub use notes::{Color, Note};
pub use sequencer::{SequencerTick, Step, StepSequencer};
pub use trigger::{BooleanTrigger, TriggerBank};
