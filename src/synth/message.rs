#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::io::Controls;
use crate::{NUM_NOTES, NUM_STEPS};

/// A gesture sent from the control thread to the audio thread.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ControlMessage {
    /// Press note button `0..NUM_NOTES`.
    PressNote(u8),
    /// Press step-clear button `0..NUM_STEPS`.
    ClearStep(u8),
    SetTempo(f32),
    SetCutoff(f32),
    SetResonance(f32),
    SetDelay(f32),
    /// Clear the pattern and silence the voice.
    Reset,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<ControlMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<ControlMessage> {
    fn pop(&mut self) -> Option<ControlMessage> {
        Consumer::pop(self).ok()
    }
}

/*
Presses as Pulses
-----------------

A button press becomes a one-block pulse: `drain` raises the line, the host
renders a block, then `release_triggers` drops it again.

The sequencer only fires on a low → high edge, so a line must spend at least
one block low between two pulses. A press that lands on a line which is high
now, or was high for the block just rendered, is queued and raised one block
later:

    block      N          N+1        N+2
    presses    note 5     note 5     -
    line 5     high       low        high      (two edges, two attacks)
*/

/// Button lines of one kind with their deferred presses.
#[derive(Debug, Clone, Copy)]
struct PulseLines<const N: usize> {
    /// Lines that were high during the last rendered block.
    was_high: [bool; N],
    /// Presses waiting for their line to go low first.
    pending: [u8; N],
}

impl<const N: usize> PulseLines<N> {
    const fn new() -> Self {
        Self {
            was_high: [false; N],
            pending: [0; N],
        }
    }

    fn press(&mut self, levels: &mut [f32; N], line: usize) {
        let (Some(level), Some(pending)) = (levels.get_mut(line), self.pending.get_mut(line)) else {
            return;
        };
        if *level > 0.0 || self.was_high[line] {
            *pending = pending.saturating_add(1);
        } else {
            *level = 1.0;
        }
    }

    /// Raise one deferred press on every line that has been low for a block.
    fn raise_pending(&mut self, levels: &mut [f32; N]) {
        for ((level, pending), &was_high) in levels.iter_mut().zip(&mut self.pending).zip(&self.was_high) {
            if *pending > 0 && !was_high && *level <= 0.0 {
                *level = 1.0;
                *pending -= 1;
            }
        }
    }

    fn release(&mut self, levels: &mut [f32; N]) {
        for (was_high, level) in self.was_high.iter_mut().zip(levels.iter_mut()) {
            *was_high = *level > 0.0;
            *level = 0.0;
        }
    }

    fn clear(&mut self, levels: &mut [f32; N]) {
        *self = Self::new();
        *levels = [0.0; N];
    }

    fn deferred(&self) -> usize {
        self.pending.iter().map(|&p| p as usize).sum()
    }
}

impl<const N: usize> Default for PulseLines<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Audio-side view of the panel, built up from incoming messages.
///
/// Call `drain` before each block and `release_triggers` after it; every
/// press then reaches the sequencer as its own rising edge.
#[derive(Debug, Clone, Default)]
pub struct ControlState {
    controls: Controls,
    note_lines: PulseLines<NUM_NOTES>,
    step_lines: PulseLines<NUM_STEPS>,
}

impl ControlState {
    pub fn new(controls: Controls) -> Self {
        Self {
            controls,
            ..Default::default()
        }
    }

    /// Apply every pending message. Returns true if a reset was requested.
    pub fn drain<R: MessageReceiver + ?Sized>(&mut self, receiver: &mut R) -> bool {
        self.note_lines.raise_pending(&mut self.controls.notes);
        self.step_lines.raise_pending(&mut self.controls.steps);

        let mut reset = false;
        while let Some(message) = receiver.pop() {
            reset |= self.apply(message);
        }
        reset
    }

    /// Apply one message. Returns true for `Reset`.
    pub fn apply(&mut self, message: ControlMessage) -> bool {
        let controls = &mut self.controls;
        match message {
            ControlMessage::PressNote(note) => {
                self.note_lines.press(&mut controls.notes, note as usize);
            }
            ControlMessage::ClearStep(step) => {
                self.step_lines.press(&mut controls.steps, step as usize);
            }
            ControlMessage::SetTempo(value) => {
                controls.tempo = clamp_to(value, Controls::TEMPO_RANGE, controls.tempo);
            }
            ControlMessage::SetCutoff(value) => {
                controls.cutoff = clamp_to(value, Controls::CUTOFF_RANGE, controls.cutoff);
            }
            ControlMessage::SetResonance(value) => {
                controls.resonance = clamp_to(value, Controls::RESONANCE_RANGE, controls.resonance);
            }
            ControlMessage::SetDelay(value) => {
                controls.delay = clamp_to(value, Controls::DELAY_RANGE, controls.delay);
            }
            ControlMessage::Reset => {
                // The voice's own trigger state is cleared along with it.
                self.note_lines.clear(&mut controls.notes);
                self.step_lines.clear(&mut controls.steps);
                return true;
            }
        }
        false
    }

    /// Drop every pulse raised since the last call.
    pub fn release_triggers(&mut self) {
        self.note_lines.release(&mut self.controls.notes);
        self.step_lines.release(&mut self.controls.steps);
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn pressed_notes(&self) -> usize {
        self.controls.notes.iter().filter(|&&level| level > 0.0).count()
    }

    pub fn pressed_steps(&self) -> usize {
        self.controls.steps.iter().filter(|&&level| level > 0.0).count()
    }

    /// Presses still waiting for their line to go low.
    pub fn deferred_presses(&self) -> usize {
        self.note_lines.deferred() + self.step_lines.deferred()
    }
}

/// NaN keeps the previous value.
fn clamp_to(value: f32, (min, max): (f32, f32), previous: f32) -> f32 {
    if value.is_nan() {
        previous
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    impl MessageReceiver for VecDeque<ControlMessage> {
        fn pop(&mut self) -> Option<ControlMessage> {
            self.pop_front()
        }
    }

    #[test]
    fn presses_become_pulses() {
        let mut state = ControlState::default();
        let mut queue = VecDeque::from([ControlMessage::PressNote(3), ControlMessage::ClearStep(6)]);

        assert!(!state.drain(&mut queue));
        assert_eq!(state.controls().notes[3], 1.0);
        assert_eq!(state.controls().steps[6], 1.0);
        assert_eq!(state.pressed_notes(), 1);

        state.release_triggers();
        assert_eq!(state.pressed_notes(), 0);
        assert_eq!(state.pressed_steps(), 0);
    }

    #[test]
    fn repeat_press_waits_one_block_low() {
        let mut state = ControlState::default();

        state.drain(&mut VecDeque::from([ControlMessage::PressNote(5)]));
        assert_eq!(state.controls().notes[5], 1.0);
        state.release_triggers();

        // Same note again straight away: held back for a block.
        state.drain(&mut VecDeque::from([ControlMessage::PressNote(5)]));
        assert_eq!(state.controls().notes[5], 0.0);
        assert_eq!(state.deferred_presses(), 1);
        state.release_triggers();

        state.drain(&mut VecDeque::new());
        assert_eq!(state.controls().notes[5], 1.0);
        assert_eq!(state.deferred_presses(), 0);
    }

    #[test]
    fn double_press_in_one_block_is_kept() {
        let mut state = ControlState::default();
        let mut queue = VecDeque::from([ControlMessage::ClearStep(2), ControlMessage::ClearStep(2)]);
        state.drain(&mut queue);
        assert_eq!(state.pressed_steps(), 1);
        assert_eq!(state.deferred_presses(), 1);

        let mut raised = 0;
        for _ in 0..4 {
            state.release_triggers();
            state.drain(&mut VecDeque::new());
            raised += state.pressed_steps();
        }
        assert_eq!(raised, 1);
    }

    #[test]
    fn out_of_range_buttons_are_ignored() {
        let mut state = ControlState::default();
        state.apply(ControlMessage::PressNote(NUM_NOTES as u8));
        state.apply(ControlMessage::ClearStep(200));
        assert_eq!(state.pressed_notes(), 0);
        assert_eq!(state.pressed_steps(), 0);
    }

    #[test]
    fn knobs_are_clamped_to_panel_ranges() {
        let mut state = ControlState::default();
        state.apply(ControlMessage::SetTempo(99.0));
        state.apply(ControlMessage::SetResonance(-1.0));
        state.apply(ControlMessage::SetDelay(f32::NAN));
        assert_eq!(state.controls().tempo, 6.0);
        assert_eq!(state.controls().resonance, 0.0);
        assert_eq!(state.controls().delay, Controls::default().delay);
    }

    #[test]
    fn reset_is_reported() {
        let mut state = ControlState::default();
        let mut queue = VecDeque::from([
            ControlMessage::PressNote(1),
            ControlMessage::PressNote(1),
            ControlMessage::Reset,
        ]);
        assert!(state.drain(&mut queue));
        assert_eq!(state.pressed_notes(), 0);
        assert_eq!(state.deferred_presses(), 0);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn drains_an_rtrb_queue() {
        let (mut producer, mut consumer) = rtrb::RingBuffer::<ControlMessage>::new(8);
        producer.push(ControlMessage::SetCutoff(1.5)).unwrap();
        producer.push(ControlMessage::PressNote(9)).unwrap();

        let mut state = ControlState::default();
        state.drain(&mut consumer);
        assert_eq!(state.controls().cutoff, 1.5);
        assert_eq!(state.controls().notes[9], 1.0);
        assert!(consumer.is_empty());
    }
}
