//! Async driver for the replay state machine.
//!
//! Each `transmit` future resolving is the send-completion notification.
//! Before acting on it the driver waits the turnaround spacing and checks
//! for a newer frame; a newer frame restarts the replay from channel 1.

use core::convert::Infallible;

use embedded_hal_async::delay::DelayNs;

use crate::broadcast::replay::{Action, DeliveryController, ReplayConfig};
use crate::broadcast::{FrameSource, PowerSwitch, Radio};
use crate::config::TX_SPACING_MS;
use crate::error::Error;
use crate::message::Frame;

/// How a delivery ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReplayEnd {
    /// Frame that was on air last.
    pub frame: Frame,
    /// Transmissions across all frames of this delivery.
    pub transmissions: u32,
    /// Times a newer frame took over.
    pub preemptions: u32,
    /// Whether the power rail was cut.
    pub powered_off: bool,
}

pub struct Broadcaster<R, P, D> {
    radio: R,
    power: P,
    delay: D,
    controller: DeliveryController,
}

impl<R, P, D> Broadcaster<R, P, D>
where
    R: Radio,
    P: PowerSwitch,
    D: DelayNs,
{
    pub fn new(radio: R, power: P, delay: D, config: ReplayConfig) -> Self {
        Self {
            radio,
            power,
            delay,
            controller: DeliveryController::new(config),
        }
    }

    pub fn controller(&self) -> &DeliveryController {
        &self.controller
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    pub fn power(&self) -> &P {
        &self.power
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Deliver every frame `source` produces, forever.
    ///
    /// Only returns on a radio error; the caller treats that as fatal.
    pub async fn run<F: FrameSource>(&mut self, source: &mut F) -> Result<Infallible, Error> {
        loop {
            let frame = source.next_frame().await;
            let end = self.deliver(frame, source).await?;
            if end.powered_off {
                // Still running: external supply keeps the board alive.
                warn!("Replay: power cut but still running");
            }
        }
    }

    /// Replay `frame` until the round budget is spent, then cut power.
    ///
    /// Newer frames from `source` take over at send boundaries.
    pub async fn deliver<F: FrameSource>(&mut self, frame: Frame, source: &mut F) -> Result<ReplayEnd, Error> {
        let mut end = ReplayEnd {
            frame,
            transmissions: 0,
            preemptions: 0,
            powered_off: false,
        };

        info!(
            "Replay: seq {} event {} ({} sends)",
            frame.sequence(),
            frame.event_code(),
            self.controller.config().transmissions()
        );
        let mut action = self.controller.start_delivery(frame);

        loop {
            match action {
                Action::Transmit { channel } => {
                    self.send(&end.frame, channel).await?;
                    end.transmissions += 1;

                    self.delay.delay_ms(TX_SPACING_MS).await;

                    action = match source.try_next_frame() {
                        Some(newer) => {
                            end.frame = newer;
                            end.preemptions += 1;
                            self.controller.start_delivery(newer)
                        }
                        None => self.controller.on_send_complete(),
                    };
                }
                Action::PowerOff => {
                    info!("Replay: done after {} sends, powering off", end.transmissions);
                    self.power.cut_power();
                    end.powered_off = true;
                    return Ok(end);
                }
                Action::Wait => return Ok(end),
            }
        }
    }

    async fn send(&mut self, frame: &Frame, channel: u8) -> Result<(), Error> {
        self.radio.set_channel(channel).map_err(|e| {
            error!("Replay: {}", e);
            e
        })?;
        self.radio.transmit(frame.as_bytes()).await.map_err(|e| {
            error!("Replay: {}", e);
            e
        })
    }
}
