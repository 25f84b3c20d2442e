//! Unified error type for the remote.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Radio
    /// The radio refused to tune to the given logical channel.
    Channel(u8),

    /// The radio rejected a transmission before it went on air.
    Transmit {
        /// Logical channel the frame was submitted on.
        channel: u8,
    },

    // Storage
    /// Reading, writing or committing the sequence counter failed.
    Storage,
}

impl Error {
    /// Short human-readable description for the fault banner.
    pub fn message(&self) -> &'static str {
        match self {
            Error::Channel(_) => "setting radio channel failed",
            Error::Transmit { .. } => "sending broadcast frame failed",
            Error::Storage => "accessing sequence counter failed",
        }
    }

    /// Whether the error leaves the device in a state only a reset can fix.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Storage)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Channel(ch) => write!(f, "{} (channel {})", self.message(), ch),
            Error::Transmit { channel } => write!(f, "{} (channel {})", self.message(), channel),
            Error::Storage => f.write_str(self.message()),
        }
    }
}
