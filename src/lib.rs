//! Host-testable core of the wizmote firmware.
//!
//! Everything that does not touch a peripheral lives here: the gesture
//! classifier, the frame encoder, the sequence counter and the replay
//! state machine with its async driver.  Hardware shows up only through
//! `embedded-hal` traits and the small collaborator traits in
//! [`broadcast`] and [`sequence`].
//!
//! Usage: `cargo test` (no features needed)
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and implements the collaborator traits for the nRF52840.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to the modules below.
mod fmt;

pub mod broadcast;
pub mod config;
pub mod error;
pub mod input;
pub mod message;
pub mod power;
pub mod remote;
pub mod sequence;

pub use error::Error;
pub use input::EventCode;
pub use message::{encode, Frame};

use core::convert::Infallible;

/// Unwrap a result that cannot fail.
pub(crate) fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════
