//! Button input subsystem - nine physical buttons reduced to event codes.
//!
//! ## Components
//!
//! - **Codes**: per-button event code table and gesture kinds
//! - **Classifier**: polled, debounced gesture state machine
//! - **Shift register**: 74HC165 sampler for buttons 0-7 plus the sleep pin
//!
//! Buttons are sampled once per tick; nothing here is interrupt driven.

pub mod classifier;
pub mod codes;
pub mod shift_register;

pub use classifier::Classifier;
pub use codes::{ButtonCodes, EventCode, Gesture};

/// Number of physical buttons on the remote.
pub const BUTTON_COUNT: usize = 9;

/// Physical buttons, indexed by their position in the sample.
///
/// The "scene" buttons carry the numbers printed on the original remote,
/// which do not follow the wiring order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Button {
    Off = 0,
    On = 1,
    Scene2 = 2,
    Scene1 = 3,
    Scene4 = 4,
    Scene3 = 5,
    BrightnessUp = 6,
    BrightnessDown = 7,
    Sleep = 8,
}

impl Button {
    /// All buttons in sampling order.
    pub const ALL: [Button; BUTTON_COUNT] = [
        Button::Off,
        Button::On,
        Button::Scene2,
        Button::Scene1,
        Button::Scene4,
        Button::Scene3,
        Button::BrightnessUp,
        Button::BrightnessDown,
        Button::Sleep,
    ];

    /// Button at sample index `index`, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Label used in log output.
    pub const fn label(self) -> &'static str {
        match self {
            Button::Off => "Off button",
            Button::On => "On button",
            Button::Scene2 => "Button 2",
            Button::Scene1 => "Button 1",
            Button::Scene4 => "Button 4",
            Button::Scene3 => "Button 3",
            Button::BrightnessUp => "Brightness up",
            Button::BrightnessDown => "Brightness down",
            Button::Sleep => "Moon button",
        }
    }

    /// Event codes this button can produce.
    pub const fn codes(self) -> ButtonCodes {
        codes::BUTTON_CODES[self as usize]
    }
}

/// Debounce-free logical levels of all buttons for one tick (`true` = pressed).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonLevels([bool; BUTTON_COUNT]);

impl ButtonLevels {
    /// No button pressed.
    pub const fn released() -> Self {
        Self([false; BUTTON_COUNT])
    }

    /// Decode one hardware sample.
    ///
    /// `shift_byte` holds buttons 0-7 with bit `i` = button `i`, active-low.
    /// `sleep_pressed` is the already-inverted level of the sleep pin.
    pub fn from_sample(shift_byte: u8, sleep_pressed: bool) -> Self {
        let mut levels = [false; BUTTON_COUNT];
        for (i, level) in levels.iter_mut().take(8).enumerate() {
            *level = shift_byte & (1 << i) == 0;
        }
        levels[Button::Sleep.index()] = sleep_pressed;
        Self(levels)
    }

    /// Levels with exactly the given buttons pressed.
    pub fn pressed(buttons: &[Button]) -> Self {
        let mut levels = Self::released();
        for &button in buttons {
            levels.set(button, true);
        }
        levels
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.0[button.index()]
    }

    pub fn set(&mut self, button: Button, pressed: bool) {
        self.0[button.index()] = pressed;
    }
}

/// Source of raw button levels, read once per polling tick.
pub trait ButtonSampler {
    fn sample(&mut self) -> ButtonLevels;
}

/// Monotonic millisecond time source.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

impl<S: ButtonSampler + ?Sized> ButtonSampler for &mut S {
    fn sample(&mut self) -> ButtonLevels {
        (**self).sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_bits_are_active_low() {
        // Bit 3 cleared → Scene1 pressed, everything else released.
        let levels = ButtonLevels::from_sample(0b1111_0111, false);
        assert!(levels.is_pressed(Button::Scene1));
        for button in Button::ALL.iter().filter(|b| **b != Button::Scene1) {
            assert!(!levels.is_pressed(*button));
        }
    }

    #[test]
    fn idle_sample_reports_nothing() {
        assert_eq!(ButtonLevels::from_sample(0xFF, false), ButtonLevels::released());
    }

    #[test]
    fn sleep_comes_from_its_own_pin() {
        let levels = ButtonLevels::from_sample(0xFF, true);
        assert!(levels.is_pressed(Button::Sleep));
        assert_eq!(levels, ButtonLevels::pressed(&[Button::Sleep]));
    }

    #[test]
    fn index_roundtrip() {
        for (i, button) in Button::ALL.iter().enumerate() {
            assert_eq!(button.index(), i);
            assert_eq!(Button::from_index(i), Some(*button));
        }
        assert_eq!(Button::from_index(BUTTON_COUNT), None);
    }
}
