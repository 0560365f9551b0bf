//! Translation from host keys to the sixteen hexadecimal keys.
//!
//! The layouts mirror the physical arrangement of the original keypad:
//!
//! ```text
//! 1 2 3 C
//! 4 5 6 D
//! 7 8 9 E
//! A 0 B F
//! ```

use sdl2::keyboard::Keycode;

use crate::config::KeyLayout;
use crate::interpreter::KEY_COUNT;

/// A table from logical key `0x0..=0xF` to the host key that drives it.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyMap {
    keys: [Keycode; KEY_COUNT]
}

impl KeyMap {
    #[must_use]
    pub fn new(keys: [Keycode; KEY_COUNT]) -> KeyMap {
        KeyMap { keys }
    }

    /// Returns the table for one of the built-in keyboard layouts.
    #[must_use]
    pub fn for_layout(layout: &KeyLayout) -> KeyMap {
        match layout {
            KeyLayout::Qwerty => KeyMap::new([
                Keycode::X, Keycode::Num1, Keycode::Num2, Keycode::Num3,
                Keycode::Q, Keycode::W, Keycode::E, Keycode::A,
                Keycode::S, Keycode::D, Keycode::Z, Keycode::C,
                Keycode::Num4, Keycode::R, Keycode::F, Keycode::V
            ]),
            KeyLayout::Azerty => KeyMap::new([
                Keycode::X, Keycode::Num1, Keycode::Num2, Keycode::Num3,
                Keycode::A, Keycode::Z, Keycode::E, Keycode::Q,
                Keycode::S, Keycode::D, Keycode::W, Keycode::C,
                Keycode::Num4, Keycode::R, Keycode::F, Keycode::V
            ])
        }
    }

    /// Returns the logical key driven by `keycode`, if any.
    #[must_use]
    pub fn logical_key(&self, keycode: Keycode) -> Option<usize> {
        self.keys.iter().position(|&key| key == keycode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qwerty_layout() {
        let keymap = KeyMap::for_layout(&KeyLayout::Qwerty);
        assert_eq!(keymap.logical_key(Keycode::Num1), Some(0x1));
        assert_eq!(keymap.logical_key(Keycode::Num4), Some(0xC));
        assert_eq!(keymap.logical_key(Keycode::X), Some(0x0));
        assert_eq!(keymap.logical_key(Keycode::V), Some(0xF));
        assert_eq!(keymap.logical_key(Keycode::Escape), None, "Unmapped key translated.");
    }

    #[test]
    fn azerty_layout() {
        let keymap = KeyMap::for_layout(&KeyLayout::Azerty);
        assert_eq!(keymap.logical_key(Keycode::A), Some(0x4));
        assert_eq!(keymap.logical_key(Keycode::W), Some(0xA));
        assert_eq!(keymap.logical_key(Keycode::Q), Some(0x7));
    }

    #[test]
    fn every_key_mapped_once() {
        for layout in [KeyLayout::Qwerty, KeyLayout::Azerty] {
            let keymap = KeyMap::for_layout(&layout);
            for (key, &host_key) in keymap.keys.iter().enumerate() {
                assert_eq!(keymap.logical_key(host_key), Some(key), "{layout:?} maps a host key twice.");
            }
        }
    }
}
