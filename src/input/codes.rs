//! Event codes broadcast for each button gesture.
//!
//! Receivers hard-code these numbers, so the table below is part of the
//! wire protocol.  Code 0 means "no event" and cannot be constructed.

use core::num::NonZeroU8;

use super::BUTTON_COUNT;

/// Number of gesture kinds a multi-press button distinguishes.
pub const GESTURE_KINDS: usize = 7;

/// A classified gesture as it goes on air (1..=38, never 0).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventCode(NonZeroU8);

impl EventCode {
    /// Wrap a raw code; `None` for the reserved value 0.
    pub const fn new(code: u8) -> Option<Self> {
        match NonZeroU8::new(code) {
            Some(code) => Some(Self(code)),
            None => None,
        }
    }

    const fn of(code: u8) -> Self {
        match Self::new(code) {
            Some(code) => code,
            None => panic!("event code 0 is reserved"),
        }
    }

    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

/// Kinds of gesture, in the order of a multi-press button's code list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    Single,
    Double,
    Triple,
    Quadruple,
    Quintuple,
    /// Six or more presses.
    Sextuple,
    LongPress,
}

impl Gesture {
    pub const ALL: [Gesture; GESTURE_KINDS] = [
        Gesture::Single,
        Gesture::Double,
        Gesture::Triple,
        Gesture::Quadruple,
        Gesture::Quintuple,
        Gesture::Sextuple,
        Gesture::LongPress,
    ];

    /// Gesture for `count` completed presses; `None` for zero.
    pub const fn from_repeat_count(count: u8) -> Option<Self> {
        Some(match count {
            0 => return None,
            1 => Gesture::Single,
            2 => Gesture::Double,
            3 => Gesture::Triple,
            4 => Gesture::Quadruple,
            5 => Gesture::Quintuple,
            _ => Gesture::Sextuple,
        })
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn label(self) -> &'static str {
        match self {
            Gesture::Single => "single pressed",
            Gesture::Double => "double pressed",
            Gesture::Triple => "triple pressed",
            Gesture::Quadruple => "quadruple pressed",
            Gesture::Quintuple => "quintuple pressed",
            Gesture::Sextuple => "sextuple pressed",
            Gesture::LongPress => "long pressed",
        }
    }
}

/// What a button can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonCodes {
    /// Reports on the press edge, no repeat or hold detection.
    Immediate(EventCode),
    /// Supports repeats and long press, one code per [`Gesture`].
    Multi([EventCode; GESTURE_KINDS]),
}

impl ButtonCodes {
    pub const fn is_immediate(&self) -> bool {
        matches!(self, ButtonCodes::Immediate(_))
    }

    /// Code for `gesture`; immediate buttons only know [`Gesture::Single`].
    pub fn code(&self, gesture: Gesture) -> Option<EventCode> {
        match (self, gesture) {
            (ButtonCodes::Immediate(code), Gesture::Single) => Some(*code),
            (ButtonCodes::Immediate(_), _) => None,
            (ButtonCodes::Multi(codes), gesture) => Some(codes[gesture.index()]),
        }
    }
}

const fn multi(first: u8) -> ButtonCodes {
    ButtonCodes::Multi([
        EventCode::of(first),
        EventCode::of(first + 1),
        EventCode::of(first + 2),
        EventCode::of(first + 3),
        EventCode::of(first + 4),
        EventCode::of(first + 5),
        EventCode::of(first + 6),
    ])
}

const fn immediate(code: u8) -> ButtonCodes {
    ButtonCodes::Immediate(EventCode::of(code))
}

/// Code table indexed by button position.
pub const BUTTON_CODES: [ButtonCodes; BUTTON_COUNT] = [
    immediate(1),  // Off
    immediate(3),  // On
    multi(5),      // Button 2
    multi(12),     // Button 1
    multi(19),     // Button 4
    multi(26),     // Button 3
    immediate(33), // Brightness up
    immediate(35), // Brightness down
    immediate(37), // Moon
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Button;

    #[test]
    fn zero_is_not_an_event() {
        assert!(EventCode::new(0).is_none());
        assert_eq!(EventCode::new(13).map(EventCode::get), Some(13));
    }

    #[test]
    fn repeat_count_saturates_at_sextuple() {
        assert_eq!(Gesture::from_repeat_count(0), None);
        assert_eq!(Gesture::from_repeat_count(1), Some(Gesture::Single));
        assert_eq!(Gesture::from_repeat_count(5), Some(Gesture::Quintuple));
        assert_eq!(Gesture::from_repeat_count(6), Some(Gesture::Sextuple));
        assert_eq!(Gesture::from_repeat_count(42), Some(Gesture::Sextuple));
    }

    #[test]
    fn immediate_buttons_have_single_code_only() {
        let codes = Button::BrightnessUp.codes();
        assert!(codes.is_immediate());
        assert_eq!(codes.code(Gesture::Single).map(EventCode::get), Some(33));
        assert_eq!(codes.code(Gesture::LongPress), None);
        assert_eq!(codes.code(Gesture::Double), None);
    }

    #[test]
    fn multi_button_table() {
        let codes = Button::Scene1.codes();
        assert!(!codes.is_immediate());
        assert_eq!(codes.code(Gesture::Single).map(EventCode::get), Some(12));
        assert_eq!(codes.code(Gesture::Double).map(EventCode::get), Some(13));
        assert_eq!(codes.code(Gesture::Sextuple).map(EventCode::get), Some(17));
        assert_eq!(codes.code(Gesture::LongPress).map(EventCode::get), Some(18));
    }

    #[test]
    fn codes_are_unique_across_buttons() {
        let mut seen = [false; 39];
        for button in Button::ALL {
            match button.codes() {
                ButtonCodes::Immediate(code) => {
                    assert!(!seen[code.get() as usize]);
                    seen[code.get() as usize] = true;
                }
                ButtonCodes::Multi(codes) => {
                    for code in codes {
                        assert!(!seen[code.get() as usize]);
                        seen[code.get() as usize] = true;
                    }
                }
            }
        }
    }

    #[test]
    fn only_middle_four_buttons_are_multi() {
        for button in Button::ALL {
            let multi = matches!(button.index(), 2..=5);
            assert_eq!(!button.codes().is_immediate(), multi, "{:?}", button);
        }
    }

    #[test]
    fn gesture_list_follows_code_order() {
        for (i, gesture) in Gesture::ALL.into_iter().enumerate() {
            assert_eq!(gesture.index(), i);
        }
    }
}
