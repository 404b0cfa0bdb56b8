#![allow(non_snake_case)]

use crate::error::ErrorDetail;

/// The number of keys on the CHIP-8 hex keypad.
const NUMBER_OF_KEYS: u8 = 16;

/// An abstraction of the state of each key on the CHIP-8 keypad (pressed / not pressed).
#[derive(Clone, Debug, PartialEq)]
pub struct KeyState {
    /// Array holding a boolean for each key (true means pressed, false means not pressed).
    keys_pressed: [bool; NUMBER_OF_KEYS as usize],
}

impl KeyState {
    /// Constructor that returns a [KeyState] instance with no keys pressed.
    pub(crate) fn new() -> Self {
        KeyState {
            keys_pressed: [false; NUMBER_OF_KEYS as usize],
        }
    }

    /// Returns true if the specified key is pressed, false if the specified key is not
    /// pressed, and returns an [ErrorDetail::InvalidKey] if the specified key is invalid.
    ///
    /// # Arguments
    ///
    /// * `key` - the hex ordinal of the key (valid range 0x0 to 0xF inclusive)
    pub fn is_key_pressed(&self, key: u8) -> Result<bool, ErrorDetail> {
        match key {
            n if n < NUMBER_OF_KEYS => Ok(self.keys_pressed[n as usize]),
            _ => Err(ErrorDetail::InvalidKey { key }),
        }
    }

    /// Sets the state of the specified key; returns an [ErrorDetail::InvalidKey] if the
    /// specified key is invalid.
    ///
    /// # Arguments
    ///
    /// * `key` - the hex ordinal of the key (valid range 0x0 to 0xF inclusive)
    /// * `status` - boolean representing key state (true meaning pressed)
    pub fn set_key_status(&mut self, key: u8, status: bool) -> Result<(), ErrorDetail> {
        match key {
            n if n < NUMBER_OF_KEYS => {
                self.keys_pressed[n as usize] = status;
                Ok(())
            }
            _ => Err(ErrorDetail::InvalidKey { key }),
        }
    }

    /// Returns a byte vector holding the hex ordinals of all keys currently pressed, or `None`
    /// if no key is pressed.
    pub fn get_keys_pressed(&self) -> Option<Vec<u8>> {
        let keys: Vec<u8> = (0..NUMBER_OF_KEYS)
            .filter(|&i| self.keys_pressed[i as usize])
            .collect();
        if keys.is_empty() {
            None
        } else {
            Some(keys)
        }
    }
}

impl Default for KeyState {
    fn default() -> Self {
        KeyState::new()
    }
}
