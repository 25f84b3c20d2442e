//! Polled gesture classifier.
//!
//! Every tick samples all nine buttons and runs them through the same
//! edge logic.  Immediate buttons report on the press edge.  Multi-press
//! buttons count debounced press/release cycles and report once the
//! multi-press window closes, or report a long press on a release after
//! a long enough hold.
//!
//! Only one gesture is tracked live: pressing a different button throws
//! away whatever the previous button had accumulated.

use crate::config::{DEBOUNCE_MS, LONG_PRESS_MS, MULTI_PRESS_WINDOW_MS, POLL_TICK_MS};
use crate::input::codes::{ButtonCodes, EventCode, Gesture};
use crate::input::{Button, ButtonLevels, ButtonSampler, Clock, BUTTON_COUNT};

/// Per-button debounce and gesture bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonState {
    /// Current logical level.
    pub is_pressed: bool,
    /// When the current press began (ms).
    pub press_start: u64,
    /// Last press or release edge (ms).
    pub last_transition: u64,
    /// Completed press/release cycles in the open gesture window.
    pub repeat_count: u8,
}

impl ButtonState {
    const fn new() -> Self {
        Self {
            is_pressed: false,
            press_start: 0,
            last_transition: 0,
            repeat_count: 0,
        }
    }
}

/// A finished gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Classified {
    pub button: Button,
    pub gesture: Gesture,
    pub code: EventCode,
}

/// Gesture state machine for all buttons.
pub struct Classifier {
    buttons: [ButtonState; BUTTON_COUNT],
    active: Option<Button>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    pub const fn new() -> Self {
        Self {
            buttons: [ButtonState::new(); BUTTON_COUNT],
            active: None,
        }
    }

    /// Bookkeeping of one button.
    pub fn state(&self, button: Button) -> &ButtonState {
        &self.buttons[button.index()]
    }

    /// Button whose gesture is currently tracked.
    pub fn active(&self) -> Option<Button> {
        self.active
    }

    /// Run one polling tick over a fresh sample taken at `now` (ms).
    ///
    /// Buttons are evaluated in index order and the first one that
    /// completes a gesture ends the tick.
    pub fn tick(&mut self, levels: ButtonLevels, now: u64) -> Option<Classified> {
        for button in Button::ALL {
            if let Some(classified) = self.step(button, levels.is_pressed(button), now) {
                info!("{} {}", button.label(), classified.gesture.label());
                return Some(classified);
            }
        }
        None
    }

    fn step(&mut self, button: Button, pressed: bool, now: u64) -> Option<Classified> {
        let codes = button.codes();
        let i = button.index();

        if pressed && !self.buttons[i].is_pressed {
            if let Some(previous) = self.active.filter(|&b| b != button) {
                let stale = &mut self.buttons[previous.index()].repeat_count;
                if *stale > 0 {
                    debug!("{} gesture cancelled by {}", previous.label(), button.label());
                    *stale = 0;
                }
            }

            let state = &mut self.buttons[i];
            state.is_pressed = true;
            state.press_start = now;
            state.last_transition = now;
            self.active = Some(button);

            if let ButtonCodes::Immediate(code) = codes {
                return Some(Classified {
                    button,
                    gesture: Gesture::Single,
                    code,
                });
            }
        } else if !pressed && self.buttons[i].is_pressed {
            let state = &mut self.buttons[i];
            state.is_pressed = false;

            if let ButtonCodes::Multi(table) = codes {
                let held = now.saturating_sub(state.press_start);
                if held >= LONG_PRESS_MS {
                    state.repeat_count = 0;
                    state.last_transition = now;
                    return Some(Classified {
                        button,
                        gesture: Gesture::LongPress,
                        code: table[Gesture::LongPress.index()],
                    });
                }
                if held > DEBOUNCE_MS {
                    state.repeat_count = state.repeat_count.saturating_add(1);
                }
            }
            state.last_transition = now;
        }

        let state = &mut self.buttons[i];
        if let ButtonCodes::Multi(table) = codes {
            if !state.is_pressed
                && state.repeat_count > 0
                && now.saturating_sub(state.last_transition) > MULTI_PRESS_WINDOW_MS
            {
                let gesture = Gesture::from_repeat_count(state.repeat_count)?;
                state.repeat_count = 0;
                return Some(Classified {
                    button,
                    gesture,
                    code: table[gesture.index()],
                });
            }
        }

        None
    }

    /// Block until a gesture completes and return its code.
    ///
    /// Sleeps one tick between samples via `delay`.
    pub fn read_button_press<S, C, D>(&mut self, sampler: &mut S, clock: &C, delay: &mut D) -> EventCode
    where
        S: ButtonSampler,
        C: Clock,
        D: embedded_hal::delay::DelayNs,
    {
        loop {
            let levels = sampler.sample();
            if let Some(classified) = self.tick(levels, clock.now_ms()) {
                return classified.code;
            }
            delay.delay_ms(POLL_TICK_MS);
        }
    }

    /// Async twin of [`read_button_press`](Self::read_button_press); the
    /// tick sleep yields so other tasks (the radio) keep running.
    pub async fn read_button_press_async<S, C, D>(
        &mut self,
        sampler: &mut S,
        clock: &C,
        delay: &mut D,
    ) -> EventCode
    where
        S: ButtonSampler,
        C: Clock,
        D: embedded_hal_async::delay::DelayNs,
    {
        loop {
            let levels = sampler.sample();
            if let Some(classified) = self.tick(levels, clock.now_ms()) {
                return classified.code;
            }
            delay.delay_ms(POLL_TICK_MS).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    const MULTI: [Button; 4] = [Button::Scene2, Button::Scene1, Button::Scene4, Button::Scene3];
    const IMMEDIATE: [Button; 5] = [
        Button::Off,
        Button::On,
        Button::BrightnessUp,
        Button::BrightnessDown,
        Button::Sleep,
    ];

    /// Press windows as `(button, pressed_at, released_at)` in ms.
    type Script<'a> = &'a [(Button, u64, u64)];

    struct FakeTime {
        now: Cell<u64>,
    }

    impl FakeTime {
        fn new() -> Self {
            Self { now: Cell::new(0) }
        }
    }

    impl Clock for FakeTime {
        fn now_ms(&self) -> u64 {
            self.now.get()
        }
    }

    impl embedded_hal::delay::DelayNs for &FakeTime {
        fn delay_ns(&mut self, ns: u32) {
            self.now.set(self.now.get() + u64::from(ns) / 1_000_000);
        }
    }

    struct Scripted<'a> {
        time: &'a FakeTime,
        script: Script<'a>,
    }

    impl ButtonSampler for Scripted<'_> {
        fn sample(&mut self) -> ButtonLevels {
            let now = self.time.now_ms();
            let mut levels = ButtonLevels::released();
            for &(button, down, up) in self.script {
                if down <= now && now < up {
                    levels.set(button, true);
                }
            }
            levels
        }
    }

    fn run(classifier: &mut Classifier, time: &FakeTime, script: Script<'_>) -> (EventCode, u64) {
        let mut sampler = Scripted { time, script };
        let mut delay = time;
        let code = classifier.read_button_press(&mut sampler, time, &mut delay);
        (code, time.now_ms())
    }

    fn code(button: Button, gesture: Gesture) -> EventCode {
        button.codes().code(gesture).unwrap()
    }

    /// Drive ticks by hand: `tick` on the given levels at `now`.
    fn tick_at(classifier: &mut Classifier, pressed: &[Button], now: u64) -> Option<Classified> {
        classifier.tick(ButtonLevels::pressed(pressed), now)
    }

    #[test]
    fn immediate_buttons_report_on_press_edge() {
        for button in IMMEDIATE {
            let time = FakeTime::new();
            let mut classifier = Classifier::new();
            let script = [(button, 100, 5000)];
            let (got, at) = run(&mut classifier, &time, &script);
            assert_eq!(got, code(button, Gesture::Single));
            // Reported on the very tick the press was first seen.
            assert_eq!(at, 100);
            assert_eq!(classifier.state(button).repeat_count, 0);
        }
    }

    #[test]
    fn immediate_button_ignores_hold_length() {
        let mut classifier = Classifier::new();
        let first = tick_at(&mut classifier, &[Button::On], 0).unwrap();
        assert_eq!(first.code, code(Button::On, Gesture::Single));
        // Held for 3 s and released: nothing more is reported.
        assert_eq!(tick_at(&mut classifier, &[Button::On], 3000), None);
        assert_eq!(tick_at(&mut classifier, &[], 3010), None);
        assert_eq!(tick_at(&mut classifier, &[], 5000), None);
    }

    #[test]
    fn single_press_waits_for_window() {
        let mut classifier = Classifier::new();
        assert_eq!(tick_at(&mut classifier, &[Button::Scene1], 0), None);
        assert_eq!(tick_at(&mut classifier, &[], 100), None);
        assert_eq!(tick_at(&mut classifier, &[], 700), None);
        let got = tick_at(&mut classifier, &[], 701).unwrap();
        assert_eq!(got.gesture, Gesture::Single);
        assert_eq!(got.code, code(Button::Scene1, Gesture::Single));
        assert_eq!(classifier.state(Button::Scene1).repeat_count, 0);
    }

    #[test]
    fn repeat_counts_map_to_codes() {
        for button in MULTI {
            for presses in 1..=8u64 {
                let time = FakeTime::new();
                let mut classifier = Classifier::new();
                let mut script = [(button, 0, 0); 8];
                for n in 0..presses {
                    let down = n * 300;
                    script[n as usize] = (button, down, down + 120);
                }
                let (got, _) = run(&mut classifier, &time, &script[..presses as usize]);
                let expected = Gesture::from_repeat_count(presses as u8).unwrap();
                assert_eq!(got, code(button, expected), "{:?} x{}", button, presses);
            }
        }
    }

    #[test]
    fn long_press_wins_over_pending_repeats() {
        for button in MULTI {
            let time = FakeTime::new();
            let mut classifier = Classifier::new();
            // Two quick presses, then a 1.2 s hold.
            let script = [(button, 0, 100), (button, 300, 400), (button, 600, 1800)];
            let (got, at) = run(&mut classifier, &time, &script);
            assert_eq!(got, code(button, Gesture::LongPress));
            assert_eq!(at, 1800);
            assert_eq!(classifier.state(button).repeat_count, 0);

            // Nothing is left over for a later window close.
            for t in (1810..4000).step_by(10) {
                assert_eq!(tick_at(&mut classifier, &[], t), None);
            }
        }
    }

    #[test]
    fn long_press_threshold_is_inclusive() {
        let mut classifier = Classifier::new();
        tick_at(&mut classifier, &[Button::Scene3], 0);
        let got = tick_at(&mut classifier, &[], 1000).unwrap();
        assert_eq!(got.gesture, Gesture::LongPress);

        let mut classifier = Classifier::new();
        tick_at(&mut classifier, &[Button::Scene3], 0);
        assert_eq!(tick_at(&mut classifier, &[], 999), None);
        assert_eq!(classifier.state(Button::Scene3).repeat_count, 1);
    }

    #[test]
    fn bounce_is_not_counted() {
        let mut classifier = Classifier::new();
        // 40 ms blip, then silence.
        tick_at(&mut classifier, &[Button::Scene4], 0);
        assert_eq!(tick_at(&mut classifier, &[], 40), None);
        assert_eq!(classifier.state(Button::Scene4).repeat_count, 0);
        for t in (50..2000).step_by(10) {
            assert_eq!(tick_at(&mut classifier, &[], t), None);
        }

        // Exactly the threshold is still bounce.
        tick_at(&mut classifier, &[Button::Scene4], 2000);
        tick_at(&mut classifier, &[], 2050);
        assert_eq!(classifier.state(Button::Scene4).repeat_count, 0);
    }

    #[test]
    fn bounce_between_presses_does_not_break_the_count() {
        let time = FakeTime::new();
        let mut classifier = Classifier::new();
        let script = [
            (Button::Scene2, 0, 100),
            (Button::Scene2, 250, 270), // bounce
            (Button::Scene2, 500, 600),
        ];
        let (got, _) = run(&mut classifier, &time, &script);
        assert_eq!(got, code(Button::Scene2, Gesture::Double));
    }

    #[test]
    fn other_button_cancels_pending_gesture() {
        let mut classifier = Classifier::new();
        tick_at(&mut classifier, &[Button::Scene1], 0);
        tick_at(&mut classifier, &[], 100);
        assert_eq!(classifier.state(Button::Scene1).repeat_count, 1);

        // Scene3 starts before the window closes.
        assert_eq!(tick_at(&mut classifier, &[Button::Scene3], 200), None);
        assert_eq!(classifier.state(Button::Scene1).repeat_count, 0);
        assert_eq!(classifier.active(), Some(Button::Scene3));
        tick_at(&mut classifier, &[], 300);

        let got = tick_at(&mut classifier, &[], 901).unwrap();
        assert_eq!(got.button, Button::Scene3);
        assert_eq!(got.gesture, Gesture::Single);

        // Scene1's pending press never comes back.
        for t in (910..3000).step_by(10) {
            assert_eq!(tick_at(&mut classifier, &[], t), None);
        }
    }

    #[test]
    fn immediate_press_cancels_pending_gesture() {
        let mut classifier = Classifier::new();
        tick_at(&mut classifier, &[Button::Scene4], 0);
        tick_at(&mut classifier, &[], 100);
        let got = tick_at(&mut classifier, &[Button::Off], 200).unwrap();
        assert_eq!(got.code, code(Button::Off, Gesture::Single));
        assert_eq!(classifier.state(Button::Scene4).repeat_count, 0);
        tick_at(&mut classifier, &[], 250);
        for t in (260..2000).step_by(10) {
            assert_eq!(tick_at(&mut classifier, &[], t), None);
        }
    }

    #[test]
    fn same_button_keeps_counting() {
        let mut classifier = Classifier::new();
        tick_at(&mut classifier, &[Button::Scene2], 0);
        tick_at(&mut classifier, &[], 100);
        tick_at(&mut classifier, &[Button::Scene2], 200);
        assert_eq!(classifier.state(Button::Scene2).repeat_count, 1);
        tick_at(&mut classifier, &[], 300);
        assert_eq!(classifier.state(Button::Scene2).repeat_count, 2);
    }

    #[test]
    fn one_code_per_call() {
        let time = FakeTime::new();
        let mut classifier = Classifier::new();
        // Double press on Scene1, later a single on Off.
        let script = [
            (Button::Scene1, 0, 100),
            (Button::Scene1, 300, 400),
            (Button::Off, 2000, 2100),
        ];
        let (first, at) = run(&mut classifier, &time, &script);
        assert_eq!(first, code(Button::Scene1, Gesture::Double));
        assert!(at > 1000 && at < 1100);

        let (second, at) = run(&mut classifier, &time, &script);
        assert_eq!(second, code(Button::Off, Gesture::Single));
        assert_eq!(at, 2000);
    }

    #[test]
    fn async_entry_point_matches_blocking() {
        struct AsyncTime<'a>(&'a FakeTime);

        impl embedded_hal_async::delay::DelayNs for AsyncTime<'_> {
            async fn delay_ns(&mut self, ns: u32) {
                self.0.now.set(self.0.now.get() + u64::from(ns) / 1_000_000);
            }
        }

        let time = FakeTime::new();
        let mut classifier = Classifier::new();
        let script = [(Button::Scene3, 0, 100), (Button::Scene3, 200, 300), (Button::Scene3, 400, 500)];
        let mut sampler = Scripted { time: &time, script: &script };
        let got = embassy_futures::block_on(classifier.read_button_press_async(
            &mut sampler,
            &time,
            &mut AsyncTime(&time),
        ));
        assert_eq!(got, code(Button::Scene3, Gesture::Triple));
    }
}
