//! Rising-edge detection for panel buttons.
//!
//! Controls are sampled every audio frame. A button held for 100 ms is "on"
//! for ~4800 consecutive frames but must act once, so each control line gets
//! its own detector that only reports the off → on transition.

/// One-shot detector for a boolean level.
///
/// Starts out low, so a control that is already held on the very first frame
/// fires once.
#[derive(Debug, Clone, Copy)]
pub struct BooleanTrigger {
    state: bool,
}

impl BooleanTrigger {
    pub const fn new() -> Self {
        Self { state: false }
    }

    /// Feed the current level; returns true only on a rising edge.
    #[inline]
    pub fn process(&mut self, high: bool) -> bool {
        let fired = high && !self.state;
        self.state = high;
        fired
    }

    /// Feed a control voltage; "high" means strictly above zero. NaN is low.
    #[inline]
    pub fn process_level(&mut self, level: f32) -> bool {
        self.process(level > 0.0)
    }

    pub fn is_high(&self) -> bool {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = false;
    }
}

impl Default for BooleanTrigger {
    fn default() -> Self {
        Self::new()
    }
}

/// A fixed bank of detectors, one per control line.
#[derive(Debug, Clone, Copy)]
pub struct TriggerBank<const N: usize> {
    triggers: [BooleanTrigger; N],
}

impl<const N: usize> TriggerBank<N> {
    pub const fn new() -> Self {
        Self {
            triggers: [BooleanTrigger::new(); N],
        }
    }

    /// Feed all levels and return which lines fired this frame.
    pub fn process(&mut self, levels: &[f32; N]) -> [bool; N] {
        let mut fired = [false; N];
        for ((trigger, &level), fired) in self.triggers.iter_mut().zip(levels).zip(fired.iter_mut()) {
            *fired = trigger.process_level(level);
        }
        fired
    }

    pub fn reset(&mut self) {
        for trigger in self.triggers.iter_mut() {
            trigger.reset();
        }
    }
}

impl<const N: usize> Default for TriggerBank<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_press() {
        let mut trigger = BooleanTrigger::new();
        let levels = [0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0];
        let fired: Vec<bool> = levels.iter().map(|&l| trigger.process_level(l)).collect();
        assert_eq!(fired, vec![false, true, false, false, false, false, true, false]);
    }

    #[test]
    fn held_at_startup_fires_once() {
        let mut trigger = BooleanTrigger::new();
        assert!(trigger.process_level(1.0));
        assert!(!trigger.process_level(1.0));
        assert!(!trigger.process_level(0.0));
        assert!(trigger.process_level(1.0));
    }

    #[test]
    fn zero_negative_and_nan_are_low() {
        let mut trigger = BooleanTrigger::new();
        trigger.process_level(0.0);
        assert!(!trigger.process_level(-1.0));
        assert!(!trigger.process_level(f32::NAN));
        assert!(!trigger.process_level(0.0));
        assert!(trigger.process_level(0.01));
    }

    #[test]
    fn bank_tracks_lines_independently() {
        let mut bank = TriggerBank::<3>::new();
        bank.process(&[0.0, 0.0, 0.0]);
        assert_eq!(bank.process(&[1.0, 0.0, 1.0]), [true, false, true]);
        assert_eq!(bank.process(&[1.0, 1.0, 0.0]), [false, true, false]);
        assert_eq!(bank.process(&[1.0, 1.0, 1.0]), [false, false, true]);
    }
}
