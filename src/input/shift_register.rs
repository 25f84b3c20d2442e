//! 74HC165 parallel-in/serial-out sampler.
//!
//! Buttons 0-7 sit on the shift register's parallel inputs (active-low);
//! the sleep button has its own active-low GPIO.  A sample is:
//!
//! ```text
//! SH/LD  ‾‾\_____/‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾
//!            5 µs   50 µs settle
//! CLK    ‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾\_/‾\_/‾ … ‾\_/‾   (8 cycles, QH read while low)
//! ```
//!
//! The first bit out is the most significant one.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::{SHIFT_LOAD_PULSE_US, SHIFT_SETTLE_US};
use crate::infallible;
use crate::input::{ButtonLevels, ButtonSampler};

/// Button sampler built from a 74HC165 and the sleep pin.
///
/// GPIO errors are `Infallible` on every MCU this firmware targets,
/// which keeps sampling itself infallible.
pub struct ShiftRegister<LD, CLK, QH, SLP, D> {
    load: LD,
    clock: CLK,
    data: QH,
    sleep: SLP,
    delay: D,
}

impl<LD, CLK, QH, SLP, D> ShiftRegister<LD, CLK, QH, SLP, D>
where
    LD: OutputPin<Error = Infallible>,
    CLK: OutputPin<Error = Infallible>,
    QH: InputPin<Error = Infallible>,
    SLP: InputPin<Error = Infallible>,
    D: DelayNs,
{
    pub fn new(load: LD, clock: CLK, data: QH, sleep: SLP, delay: D) -> Self {
        Self {
            load,
            clock,
            data,
            sleep,
            delay,
        }
    }

    /// Latch the parallel inputs and shift them out, MSB first.
    pub fn read_byte(&mut self) -> u8 {
        infallible(self.load.set_low());
        self.delay.delay_us(SHIFT_LOAD_PULSE_US);
        infallible(self.load.set_high());
        self.delay.delay_us(SHIFT_SETTLE_US);

        let mut value = 0u8;
        for bit in (0..8).rev() {
            infallible(self.clock.set_low());
            if infallible(self.data.is_high()) {
                value |= 1 << bit;
            }
            infallible(self.clock.set_high());
        }
        value
    }
}

impl<LD, CLK, QH, SLP, D> ButtonSampler for ShiftRegister<LD, CLK, QH, SLP, D>
where
    LD: OutputPin<Error = Infallible>,
    CLK: OutputPin<Error = Infallible>,
    QH: InputPin<Error = Infallible>,
    SLP: InputPin<Error = Infallible>,
    D: DelayNs,
{
    fn sample(&mut self) -> ButtonLevels {
        let byte = self.read_byte();
        let sleep_pressed = infallible(self.sleep.is_low());
        ButtonLevels::from_sample(byte, sleep_pressed)
    }
}
