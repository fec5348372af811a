//! Input State Module: "is code X currently held" bitmasks.
//!
//! One fixed-size bit array per code sub-range, chunked into u32 words.
//! The sub-range is chosen in a fixed priority order: ASCII, mouse, scan code.

use crate::error::InputError;
use crate::types::{code, Code};

const WORD_BITS: i32 = u32::BITS as i32;

const KEY_WORDS: usize = (code::ASCII_COUNT / WORD_BITS) as usize;
const SCANCODE_WORDS: usize = (code::SCANCODE_COUNT / WORD_BITS) as usize;
const MOUSE_WORDS: usize = (code::MOUSE_BUTTON_COUNT / WORD_BITS) as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bank {
    Key,
    Mouse,
    Scancode,
}

#[derive(Debug, Clone, Default)]
pub struct InputStateTracker {
    keys: [u32; KEY_WORDS],
    scancodes: [u32; SCANCODE_WORDS],
    mouse: [u32; MOUSE_WORDS],
}

impl InputStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pressed(&mut self, code: Code, pressed: bool) -> Result<(), InputError> {
        let (bank, index) = locate(code)?;
        let word = &mut self.bank_mut(bank)[(index / WORD_BITS) as usize];
        let bit = 1u32 << (index % WORD_BITS);
        if pressed {
            *word |= bit;
        } else {
            *word &= !bit;
        }
        Ok(())
    }

    pub fn is_pressed(&self, code: Code) -> Result<bool, InputError> {
        let (bank, index) = locate(code)?;
        let word = self.bank(bank)[(index / WORD_BITS) as usize];
        Ok(word & (1u32 << (index % WORD_BITS)) != 0)
    }

    /// Release everything (e.g. after the window loses focus).
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn bank(&self, bank: Bank) -> &[u32] {
        match bank {
            Bank::Key => &self.keys,
            Bank::Mouse => &self.mouse,
            Bank::Scancode => &self.scancodes,
        }
    }

    fn bank_mut(&mut self, bank: Bank) -> &mut [u32] {
        match bank {
            Bank::Key => &mut self.keys,
            Bank::Mouse => &mut self.mouse,
            Bank::Scancode => &mut self.scancodes,
        }
    }
}

/// Select the sub-range for `code` and re-base it to a zero-based index.
fn locate(c: Code) -> Result<(Bank, i32), InputError> {
    if (0..code::ASCII_COUNT).contains(&c) {
        return Ok((Bank::Key, c));
    }
    if c & code::MOUSE_MASK != 0 {
        let index = c - code::MOUSE_MASK;
        if !(0..code::MOUSE_BUTTON_COUNT).contains(&index) {
            return Err(InputError::UnknownMouseButton(index));
        }
        return Ok((Bank::Mouse, index));
    }
    if c & code::SCANCODE_MASK != 0 {
        let index = c - code::SCANCODE_MASK;
        if !(0..code::SCANCODE_COUNT).contains(&index) {
            return Err(InputError::UnknownScancode(index));
        }
        return Ok((Bank::Scancode, index));
    }
    Err(InputError::UnknownCode(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::mouse_button;

    fn round_trip(tracker: &mut InputStateTracker, c: Code) {
        tracker.set_pressed(c, true).unwrap();
        assert!(tracker.is_pressed(c).unwrap(), "code {c} should be held");
        tracker.set_pressed(c, false).unwrap();
        assert!(!tracker.is_pressed(c).unwrap(), "code {c} should be released");
    }

    #[test]
    fn test_round_trip_every_valid_code() {
        let mut tracker = InputStateTracker::new();
        for c in 0..code::ASCII_COUNT {
            round_trip(&mut tracker, c);
        }
        for sc in 0..code::SCANCODE_COUNT {
            round_trip(&mut tracker, code::from_scancode(sc));
        }
        for b in 0..code::MOUSE_BUTTON_COUNT {
            round_trip(&mut tracker, code::MOUSE_MASK | b);
        }
    }

    #[test]
    fn test_bits_are_independent() {
        let mut tracker = InputStateTracker::new();
        tracker.set_pressed('a' as Code, true).unwrap();
        tracker.set_pressed(code::UP, true).unwrap();
        tracker
            .set_pressed(code::mouse_button(mouse_button::LEFT), true)
            .unwrap();

        assert!(!tracker.is_pressed('b' as Code).unwrap());
        assert!(!tracker.is_pressed(code::DOWN).unwrap());
        assert!(!tracker
            .is_pressed(code::mouse_button(mouse_button::RIGHT))
            .unwrap());
        // Same low bits in different banks do not alias
        assert!(!tracker.is_pressed(82).unwrap());

        tracker.set_pressed(code::UP, false).unwrap();
        assert!(tracker.is_pressed('a' as Code).unwrap());
        assert!(!tracker.is_pressed(code::UP).unwrap());
    }

    #[test]
    fn test_word_boundaries() {
        let mut tracker = InputStateTracker::new();
        tracker.set_pressed(31, true).unwrap();
        assert!(!tracker.is_pressed(32).unwrap());
        tracker.set_pressed(32, true).unwrap();
        assert!(tracker.is_pressed(31).unwrap());
        assert!(tracker.is_pressed(32).unwrap());
        tracker.set_pressed(255, true).unwrap();
        assert!(tracker.is_pressed(255).unwrap());
    }

    #[test]
    fn test_out_of_range_codes_fail() {
        let mut tracker = InputStateTracker::new();
        assert_eq!(
            tracker.set_pressed(code::from_scancode(code::SCANCODE_COUNT), true),
            Err(InputError::UnknownScancode(code::SCANCODE_COUNT))
        );
        assert_eq!(
            tracker.is_pressed(code::MOUSE_MASK | code::MOUSE_BUTTON_COUNT),
            Err(InputError::UnknownMouseButton(code::MOUSE_BUTTON_COUNT))
        );
        // 300 is above the ASCII range and carries neither mask bit
        assert_eq!(
            tracker.set_pressed(300, true),
            Err(InputError::UnknownCode(300))
        );
        assert_eq!(
            tracker.is_pressed(i32::MIN),
            Err(InputError::UnknownCode(i32::MIN))
        );
        assert!(tracker.is_pressed(-1).is_err());
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut tracker = InputStateTracker::new();
        tracker.set_pressed(code::ESCAPE, true).unwrap();
        tracker.set_pressed(code::LEFT, true).unwrap();
        tracker.clear();
        assert!(!tracker.is_pressed(code::ESCAPE).unwrap());
        assert!(!tracker.is_pressed(code::LEFT).unwrap());
    }
}
