//! Broadcast delivery subsystem.
//!
//! There is no acknowledgement channel, so a frame is simply replayed on
//! every channel, round after round, and then the remote switches itself
//! off:
//!
//! 1. **Replay** - the channel/round state machine, advanced only by
//!    `start_delivery` and `on_send_complete`.
//! 2. **Broadcaster** - async driver that executes the state machine
//!    against a [`Radio`], a [`PowerSwitch`] and a [`FrameSource`].
//!
//! The radio and power rail are collaborators behind the traits below;
//! the binary implements them for the nRF52840.

pub mod driver;
pub mod replay;


pub use driver::{Broadcaster, ReplayEnd};
pub use replay::{Action, DeliveryController, ReplayConfig, ReplayState};

use crate::error::Error;
use crate::message::Frame;

/// Link layer used for the replay.
#[allow(async_fn_in_trait)]
pub trait Radio {
    /// Tune to logical channel `channel` (1-based).
    fn set_channel(&mut self, channel: u8) -> Result<(), Error>;

    /// Send `payload` once on the current channel.
    ///
    /// Resolves when the attempt has finished (the send-completion
    /// notification), whether or not anyone heard it.  An `Err` means the
    /// radio refused the submission outright.
    async fn transmit(&mut self, payload: &[u8]) -> Result<(), Error>;
}

/// Power rail of the remote.
pub trait PowerSwitch {
    /// Cut the supply. On battery this does not return in practice.
    fn cut_power(&mut self);
}

/// Where newly classified frames come from.
#[allow(async_fn_in_trait)]
pub trait FrameSource {
    /// Wait for the next frame to deliver.
    async fn next_frame(&mut self) -> Frame;

    /// A newer frame, if one arrived since the last call.
    fn try_next_frame(&mut self) -> Option<Frame>;
}
