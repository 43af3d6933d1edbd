//! StepSequencer - the voice's clock, pattern memory and live editor.
//!
//! The sequencer runs in the audio path and is advanced once per sample. It
//! owns eight steps, each holding a pitch (or a rest) and the color shown on
//! that step's light.

/*
How Notes Get Into the Pattern
------------------------------

There is no separate "record" mode. Pressing a note button writes that note
into whichever step is currently playing, and plays it right away:

    step:     0    1    2    3    4    5    6    7
    pattern:  C    -    -    Eb   -    -    -    -
                        ^
                        current step; press G → pattern[2] = G, sound G now

Pressing a step's own button clears it back to a rest. Clearing does not stop
a note that is already sounding; the envelope just decays as usual.


Clock
-----

    metronome_phase += tempo_hz · sample_time

When the phase passes 1.0 the sequencer moves to the next step (wrapping after
the last) and, if that step holds a note, retunes the voice and fires an
attack. Rests are skipped silently: the previous pitch stays active while the
envelope decays.

The tempo knob reads 0..6 and maps linearly onto step rate:

    tempo_hz = 100/60 · knob

The panel labels the knob as quarter-note BPM (50 · knob); steps are eighth
notes, so 2.4 on the knob is 120 BPM and four steps per second.


Ordering Within a Sample
------------------------

    1. note buttons 0..9       (a later note wins if several fire together)
    2. step-clear buttons 0..7
    3. clock

The clock runs last, so if it ticks on the same sample a note button was
pressed, the new step's pitch replaces the one just entered.
*/

use crate::io::StepLights;
use crate::sequencing::notes::{is_sounding, Color, Note, REST_COLOR, REST_PITCH};
use crate::sequencing::trigger::TriggerBank;
use crate::{NUM_NOTES, NUM_STEPS};

/// Light brightness of the step under the playhead.
pub const CURRENT_BRIGHTNESS: f32 = 1.0;
/// Light brightness of every other step.
pub const IDLE_BRIGHTNESS: f32 = 0.5;

/// Step rate in Hz per unit of tempo control.
const HZ_PER_TEMPO_UNIT: f32 = 100.0 / 60.0;
/// Quarter-note BPM shown per unit of tempo control.
const BPM_PER_TEMPO_UNIT: f32 = 50.0;

/// Step rate for a tempo control value. Negative or NaN stops the clock.
#[inline]
pub fn tempo_hz(control: f32) -> f32 {
    if control.is_finite() {
        HZ_PER_TEMPO_UNIT * control.max(0.0)
    } else {
        0.0
    }
}

/// Quarter-note BPM label for a tempo control value.
pub fn tempo_bpm(control: f32) -> f32 {
    BPM_PER_TEMPO_UNIT * control
}

/// One slot in the pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub pitch: f32,
    pub color: Color,
}

impl Step {
    pub const REST: Step = Step {
        pitch: REST_PITCH,
        color: REST_COLOR,
    };

    pub fn from_note(note: Note) -> Self {
        Self {
            pitch: note.pitch(),
            color: note.color(),
        }
    }

    pub fn is_rest(&self) -> bool {
        !is_sounding(self.pitch)
    }
}

/// What the rest of the voice needs from the sequencer each sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequencerTick {
    pub active_pitch: f32,
    pub attack_requested: bool,
}

pub struct StepSequencer {
    steps: [Step; NUM_STEPS],
    current_step: usize,
    metronome_phase: f32,
    active_pitch: f32,
    note_triggers: TriggerBank<NUM_NOTES>,
    step_triggers: TriggerBank<NUM_STEPS>,
}

impl StepSequencer {
    pub fn new() -> Self {
        Self {
            steps: [Step::REST; NUM_STEPS],
            current_step: 0,
            metronome_phase: 0.0,
            // Pitch is always valid; the envelope tracks whether anything sounds.
            active_pitch: 0.0,
            note_triggers: TriggerBank::new(),
            step_triggers: TriggerBank::new(),
        }
    }

    /// Advance by one sample.
    pub fn advance(
        &mut self,
        sample_time: f32,
        tempo_control: f32,
        note_levels: &[f32; NUM_NOTES],
        step_clear_levels: &[f32; NUM_STEPS],
    ) -> SequencerTick {
        let mut attack_requested = false;

        let notes_fired = self.note_triggers.process(note_levels);
        for (index, fired) in notes_fired.into_iter().enumerate() {
            if let (true, Some(note)) = (fired, Note::new(index)) {
                self.write_note(note);
                attack_requested = true;
            }
        }

        let clears_fired = self.step_triggers.process(step_clear_levels);
        for (step, fired) in clears_fired.into_iter().enumerate() {
            if fired {
                self.clear_step(step);
            }
        }

        if self.tick_clock(sample_time, tempo_control) {
            attack_requested = true;
        }

        SequencerTick {
            active_pitch: self.active_pitch,
            attack_requested,
        }
    }

    /// Write `note` into the current step and make it the active pitch.
    pub fn write_note(&mut self, note: Note) {
        let step = Step::from_note(note);
        self.steps[self.current_step] = step;
        self.active_pitch = step.pitch;
    }

    /// Turn a step back into a rest. Out-of-range steps are ignored.
    pub fn clear_step(&mut self, step: usize) {
        if let Some(slot) = self.steps.get_mut(step) {
            *slot = Step::REST;
        }
    }

    /// Returns true if the clock moved onto a step holding a note.
    fn tick_clock(&mut self, sample_time: f32, tempo_control: f32) -> bool {
        let increment = tempo_hz(tempo_control) * sample_time;
        if increment.is_finite() && increment > 0.0 {
            self.metronome_phase += increment;
        }

        if self.metronome_phase < 1.0 {
            return false;
        }

        self.metronome_phase -= 1.0;
        // A single sample never spans more than one step at sane tempos; this
        // keeps the phase in range if it ever does.
        self.metronome_phase = self.metronome_phase.fract();
        self.current_step = (self.current_step + 1) % NUM_STEPS;

        let step = self.steps[self.current_step];
        if step.is_rest() {
            return false;
        }
        self.active_pitch = step.pitch;
        true
    }

    /// Per-step RGB brightness: full for the current step, half for the rest.
    pub fn lights(&self) -> StepLights {
        let mut lights = [[0.0; 3]; NUM_STEPS];
        for (index, (light, step)) in lights.iter_mut().zip(&self.steps).enumerate() {
            let brightness = if index == self.current_step {
                CURRENT_BRIGHTNESS
            } else {
                IDLE_BRIGHTNESS
            };
            for (channel, &component) in light.iter_mut().zip(&step.color) {
                *channel = brightness * component;
            }
        }
        lights
    }

    pub fn steps(&self) -> &[Step; NUM_STEPS] {
        &self.steps
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn metronome_phase(&self) -> f32 {
        self.metronome_phase
    }

    pub fn active_pitch(&self) -> f32 {
        self.active_pitch
    }

    /// Clear the pattern and rewind to the first step.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for StepSequencer {
    fn default() -> Self {
        Self::new()
    }
}
