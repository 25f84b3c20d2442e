//! Power rail control.
//!
//! The remote is powered through a voltage regulator whose enable line is
//! driven by the MCU.  A button press wakes the board; firmware then has
//! to hold the enable line high or the remote dies as soon as the button
//! is released.  Pulling the line low is the only way to switch off:
//!
//! - Battery: the rail collapses and the MCU stops mid-instruction.
//! - Bench supply: the MCU keeps running and the next gesture is handled
//!   as usual.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;

use crate::broadcast::PowerSwitch;
use crate::infallible;

/// Regulator enable line driven by a GPIO.
pub struct RegulatorSwitch<P> {
    enable: P,
    latched: bool,
}

impl<P: OutputPin<Error = Infallible>> RegulatorSwitch<P> {
    /// Take over the enable line and keep the rail on.
    pub fn hold(mut enable: P) -> Self {
        infallible(enable.set_high());
        info!("Power: regulator latched on");
        Self {
            enable,
            latched: true,
        }
    }

    /// Whether the rail is still held on.
    pub fn is_latched(&self) -> bool {
        self.latched
    }
}

impl<P: OutputPin<Error = Infallible>> PowerSwitch for RegulatorSwitch<P> {
    fn cut_power(&mut self) {
        info!("Power: releasing regulator");
        infallible(self.enable.set_low());
        self.latched = false;
    }
}
