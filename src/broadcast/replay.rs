//! Channel-hopping replay state machine.
//!
//! `start_delivery` puts a frame on channel 1 with the full round budget.
//! Each send-completion moves to the next channel; after the last channel
//! a round is spent and the sweep restarts at channel 1; once no rounds
//! are left the final completion powers the device off.
//!
//! ```text
//!  Idle ──start──▶ Replaying(1, R) ──complete──▶ Replaying(2, R) … (N, R)
//!                      ▲                                            │
//!                      └──────── round spent, back to 1 ◀───────────┘
//!  … Replaying(N-1, 0) ──complete──▶ Draining ──complete──▶ PoweredOff
//! ```
//!
//! Starting a new delivery from any state replaces the frame and resets
//! the bookkeeping; that is the only form of cancellation.

use crate::config::{CHANNEL_COUNT, REPEAT_ROUNDS};
use crate::message::Frame;

/// Replay shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReplayConfig {
    /// Channels swept per round (1..=channels).
    pub channels: u8,
    /// Rounds after the first sweep.
    pub repeat_rounds: u8,
}

impl ReplayConfig {
    /// Transmissions of one uninterrupted delivery.
    pub const fn transmissions(&self) -> u32 {
        self.channels as u32 * (self.repeat_rounds as u32 + 1)
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            channels: CHANNEL_COUNT,
            repeat_rounds: REPEAT_ROUNDS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReplayState {
    Idle,
    /// A send on `channel` is in flight.
    Replaying { channel: u8, rounds_remaining: u8 },
    /// The very last send is in flight.
    Draining,
    /// Terminal on battery.
    PoweredOff,
}

/// What the driver must do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Tune to `channel` and send the current frame.
    Transmit { channel: u8 },
    /// Cut the power rail.
    PowerOff,
    /// Nothing to do (completion with no replay running).
    Wait,
}

pub struct DeliveryController {
    config: ReplayConfig,
    state: ReplayState,
    frame: Option<Frame>,
}

impl DeliveryController {
    pub const fn new(config: ReplayConfig) -> Self {
        Self {
            config,
            state: ReplayState::Idle,
            frame: None,
        }
    }

    pub fn config(&self) -> ReplayConfig {
        self.config
    }

    pub fn state(&self) -> ReplayState {
        self.state
    }

    /// Frame being replayed.
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Begin a fresh replay of `frame`, abandoning any replay in progress.
    pub fn start_delivery(&mut self, frame: Frame) -> Action {
        if matches!(self.state, ReplayState::Replaying { .. } | ReplayState::Draining) {
            info!("Replay: preempted by seq {}", frame.sequence());
        }
        self.frame = Some(frame);
        self.enter(1, self.config.repeat_rounds)
    }

    /// Advance after a send-completion notification.
    pub fn on_send_complete(&mut self) -> Action {
        match self.state {
            ReplayState::Replaying {
                channel,
                rounds_remaining,
            } if channel < self.config.channels => self.enter(channel + 1, rounds_remaining),
            ReplayState::Replaying {
                rounds_remaining, ..
            } => {
                // Last channel; the final round is already `Draining`.
                let rounds_remaining = rounds_remaining.saturating_sub(1);
                debug!("Replay: round done, {} left", rounds_remaining);
                self.enter(1, rounds_remaining)
            }
            ReplayState::Draining => {
                self.state = ReplayState::PoweredOff;
                Action::PowerOff
            }
            ReplayState::Idle | ReplayState::PoweredOff => Action::Wait,
        }
    }

    fn enter(&mut self, channel: u8, rounds_remaining: u8) -> Action {
        let last_channel = channel >= self.config.channels;
        self.state = if last_channel && rounds_remaining == 0 {
            ReplayState::Draining
        } else {
            ReplayState::Replaying {
                channel,
                rounds_remaining,
            }
        };
        Action::Transmit { channel }
    }
}

impl Default for DeliveryController {
    fn default() -> Self {
        Self::new(ReplayConfig::default())
    }
}
