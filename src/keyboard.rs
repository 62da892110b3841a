// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The Chip-8's hexadecimal keypad

use crate::error::{Error, Result};

/// Number of keys on the keypad
pub const KEYS: usize = 16;

/// A 16-key matrix, one flag per key `0`..=`F`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Keyboard {
    keys: [bool; KEYS],
}

impl Keyboard {
    /// Presses a key, and reports whether the key's state changed.
    /// If key does not exist, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// let mut keys = Keyboard::default();
    ///
    /// // press key `7`
    /// let did_press = keys.press(0x7).unwrap();
    /// assert!(did_press);
    ///
    /// // press key `7` again, even though it's already pressed
    /// let did_press = keys.press(0x7).unwrap();
    /// // it was already pressed, so nothing's changed.
    /// assert!(!did_press);
    /// ```
    pub fn press(&mut self, key: usize) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        let changed = !*keyref;
        *keyref = true;
        Ok(changed)
    }

    /// Releases a key, and reports whether the key's state changed.
    /// If key is outside range `0..=0xF`, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// let mut keys = Keyboard::default();
    /// keys.press(0x7).unwrap();
    /// // release key `7`
    /// assert!(keys.release(0x7).unwrap());
    /// // try releasing `7` again
    /// assert!(!keys.release(0x7).unwrap());
    /// ```
    pub fn release(&mut self, key: usize) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        let changed = *keyref;
        *keyref = false;
        Ok(changed)
    }

    /// Releases every key
    pub fn release_all(&mut self) {
        self.keys = [false; KEYS];
    }

    /// Checks whether a key is held.
    /// If key is outside range `0..=0xF`, returns [Error::InvalidKey].
    pub fn is_pressed(&self, key: usize) -> Result<bool> {
        self.keys
            .get(key)
            .copied()
            .ok_or(Error::InvalidKey { key })
    }

    /// Polls the keypad once, returning the lowest-numbered key being held
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// let mut keys = Keyboard::default();
    /// assert_eq!(None, keys.first_pressed());
    /// keys.press(0xb).unwrap();
    /// keys.press(0x3).unwrap();
    /// assert_eq!(Some(0x3), keys.first_pressed());
    /// ```
    pub fn first_pressed(&self) -> Option<usize> {
        self.keys.iter().position(|&held| held)
    }

    /// Gets the state of every key
    pub fn keys(&self) -> &[bool; KEYS] {
        &self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_every_key() {
        let mut keys = Keyboard::default();
        for key in 0..KEYS {
            assert!(keys.press(key).unwrap());
            assert!(keys.is_pressed(key).unwrap());
            assert!(!keys.press(key).unwrap());
            assert!(keys.release(key).unwrap());
            assert!(!keys.is_pressed(key).unwrap());
            assert!(!keys.release(key).unwrap());
        }
        assert_eq!(keys, Keyboard::default());
    }

    #[test]
    fn invalid_key() {
        let mut keys = Keyboard::default();
        assert!(matches!(keys.press(16), Err(Error::InvalidKey { key: 16 })));
        assert!(matches!(keys.release(0xff), Err(Error::InvalidKey { key: 0xff })));
        assert!(matches!(keys.is_pressed(16), Err(Error::InvalidKey { key: 16 })));
    }

    #[test]
    fn first_pressed_is_lowest() {
        let mut keys = Keyboard::default();
        for key in (0..KEYS).rev() {
            keys.press(key).unwrap();
            assert_eq!(Some(key), keys.first_pressed());
        }
        keys.release_all();
        assert_eq!(None, keys.first_pressed());
        assert!(keys.keys().iter().all(|&held| !held));
    }
}
