/*
Scale Table
===========

The voice offers ten notes: a minor pentatonic scale over two octaves, below
and above middle C. Pitches are in volts (octaves) for the 1V/oct oscillator,
so a semitone is 1/12.

  index   semitones   volts     color
  -----   ---------   -------   ------
    0       -12       -1.000    red
    1        -9       -0.750    olive
    2        -7       -0.583    green
    3        -5       -0.417    teal
    4        -2       -0.167    blue
    5         0        0.000    red      (middle C)
    6         3        0.250    olive
    7         5        0.417    green
    8         7        0.583    teal
    9        10        0.833    blue

Each scale degree keeps its color across the octave, so the step lights show
the melody's shape regardless of register.

A step with no note holds the REST sentinel, far below anything playable.
Anything below SILENCE_THRESHOLD is treated as a rest, which leaves room for
pitch offsets without ever mistaking a real note for silence.

Example usage:
  let note = Note::new(5).unwrap();
  assert_eq!(note.pitch(), 0.0);          // middle C
  assert!(is_sounding(note.pitch()));
  assert!(!is_sounding(REST_PITCH));
*/

use crate::{NUM_COLORS, NUM_NOTES};

pub type Color = [f32; NUM_COLORS];

/// Pitch stored in a step that has no note.
pub const REST_PITCH: f32 = -10.0;
/// Pitches at or below this are rests.
pub const SILENCE_THRESHOLD: f32 = -4.0;

/// Color shown for a step with no note.
pub const REST_COLOR: Color = [1.0, 1.0, 1.0];

/// Minor pentatonic, two octaves, in volts.
pub const NOTE_PITCHES: [f32; NUM_NOTES] = [
    -12.0 / 12.0,
    -9.0 / 12.0,
    -7.0 / 12.0,
    -5.0 / 12.0,
    -2.0 / 12.0,
    0.0,
    3.0 / 12.0,
    5.0 / 12.0,
    7.0 / 12.0,
    10.0 / 12.0,
];

pub const NOTE_COLORS: [Color; NUM_NOTES] = [
    [1.0, 0.0, 0.0],
    [0.5, 0.5, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.5, 0.5],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0],
    [0.5, 0.5, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.5, 0.5],
    [0.0, 0.0, 1.0],
];

/// Index into the scale table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note(u8);

impl Note {
    /// `None` if `index` is outside the table.
    pub fn new(index: usize) -> Option<Self> {
        (index < NUM_NOTES).then_some(Self(index as u8))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn pitch(self) -> f32 {
        NOTE_PITCHES[self.index()]
    }

    pub fn color(self) -> Color {
        NOTE_COLORS[self.index()]
    }
}

/// True for any pitch a step should actually play.
#[inline]
pub fn is_sounding(pitch: f32) -> bool {
    pitch > SILENCE_THRESHOLD
}
