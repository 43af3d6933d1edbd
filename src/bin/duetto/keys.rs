//! Computer keyboard as the Duetto panel.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use duetto_dsp::synth::ControlMessage;
use duetto_dsp::{Controls, NUM_NOTES};

/// Note buttons, left to right on the number row.
const NOTE_KEYS: [char; NUM_NOTES] = ['1', '2', '3', '4', '5', '6', '7', '8', '9', '0'];
/// Step-clear buttons, under the first eight notes.
const STEP_KEYS: [char; 8] = ['q', 'w', 'e', 'r', 't', 'y', 'u', 'i'];

const TEMPO_NUDGE: f32 = 0.1;
const CUTOFF_NUDGE: f32 = 0.25;
const RESONANCE_NUDGE: f32 = 0.05;
const DELAY_NUDGE: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    Send(ControlMessage),
    Quit,
    Ignore,
}

/// Knob positions as the keyboard side last set them.
#[derive(Debug, Clone, Copy)]
pub struct Knobs {
    pub tempo: f32,
    pub cutoff: f32,
    pub resonance: f32,
    pub delay: f32,
}

impl Knobs {
    pub fn from_controls(controls: &Controls) -> Self {
        Self {
            tempo: controls.tempo,
            cutoff: controls.cutoff,
            resonance: controls.resonance,
            delay: controls.delay,
        }
    }

    /// Translate a key press into a panel gesture.
    pub fn handle(&mut self, key: KeyEvent) -> KeyAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        let c = match key.code {
            KeyCode::Esc => return KeyAction::Quit,
            KeyCode::Backspace => return KeyAction::Send(ControlMessage::Reset),
            KeyCode::Char(c) => c.to_ascii_lowercase(),
            _ => return KeyAction::Ignore,
        };

        if let Some(note) = NOTE_KEYS.iter().position(|&k| k == c) {
            return KeyAction::Send(ControlMessage::PressNote(note as u8));
        }
        if let Some(step) = STEP_KEYS.iter().position(|&k| k == c) {
            return KeyAction::Send(ControlMessage::ClearStep(step as u8));
        }

        let message = match c {
            '[' => ControlMessage::SetTempo(nudge(&mut self.tempo, -TEMPO_NUDGE, Controls::TEMPO_RANGE)),
            ']' => ControlMessage::SetTempo(nudge(&mut self.tempo, TEMPO_NUDGE, Controls::TEMPO_RANGE)),
            '-' => ControlMessage::SetCutoff(nudge(&mut self.cutoff, -CUTOFF_NUDGE, Controls::CUTOFF_RANGE)),
            '=' => ControlMessage::SetCutoff(nudge(&mut self.cutoff, CUTOFF_NUDGE, Controls::CUTOFF_RANGE)),
            ';' => ControlMessage::SetResonance(nudge(
                &mut self.resonance,
                -RESONANCE_NUDGE,
                Controls::RESONANCE_RANGE,
            )),
            '\'' => ControlMessage::SetResonance(nudge(
                &mut self.resonance,
                RESONANCE_NUDGE,
                Controls::RESONANCE_RANGE,
            )),
            ',' => ControlMessage::SetDelay(nudge(&mut self.delay, -DELAY_NUDGE, Controls::DELAY_RANGE)),
            '.' => ControlMessage::SetDelay(nudge(&mut self.delay, DELAY_NUDGE, Controls::DELAY_RANGE)),
            _ => return KeyAction::Ignore,
        };
        KeyAction::Send(message)
    }
}

fn nudge(value: &mut f32, amount: f32, (min, max): (f32, f32)) -> f32 {
    *value = (*value + amount).clamp(min, max);
    *value
}

pub const HELP: &str = "\
  1-9 0   play note (writes the current step)
  q..i    clear step 1-8
  [ ]     tempo      - =   cutoff
  ; '     resonance  , .   delay
  Bksp    reset      Esc   quit";

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn knobs() -> Knobs {
        Knobs::from_controls(&Controls::default())
    }

    #[test]
    fn number_row_plays_notes() {
        let mut knobs = knobs();
        assert_eq!(
            knobs.handle(press(KeyCode::Char('1'))),
            KeyAction::Send(ControlMessage::PressNote(0))
        );
        assert_eq!(
            knobs.handle(press(KeyCode::Char('0'))),
            KeyAction::Send(ControlMessage::PressNote(9))
        );
    }

    #[test]
    fn letter_row_clears_steps() {
        let mut knobs = knobs();
        assert_eq!(
            knobs.handle(press(KeyCode::Char('I'))),
            KeyAction::Send(ControlMessage::ClearStep(7))
        );
    }

    #[test]
    fn knobs_nudge_and_clamp() {
        let mut knobs = knobs();
        for _ in 0..100 {
            knobs.handle(press(KeyCode::Char(']')));
        }
        assert_eq!(
            knobs.handle(press(KeyCode::Char(']'))),
            KeyAction::Send(ControlMessage::SetTempo(6.0))
        );
    }

    #[test]
    fn escape_and_ctrl_c_quit() {
        let mut knobs = knobs();
        assert_eq!(knobs.handle(press(KeyCode::Esc)), KeyAction::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(knobs.handle(ctrl_c), KeyAction::Quit);
        assert_eq!(knobs.handle(press(KeyCode::Char('z'))), KeyAction::Ignore);
    }
}
