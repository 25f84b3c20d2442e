//! Outbound broadcast frame.
//!
//! Layout (13 bytes, multi-byte fields little-endian):
//! ```text
//! Byte 0:     Program marker (0x81)
//! Byte 1-4:   Sequence number, least-significant byte first
//! Byte 5:     Reserved (0x20)
//! Byte 6:     Event code (1..=38)
//! Byte 7:     Reserved (0x01)
//! Byte 8:     Reserved (0x64)
//! Byte 9-12:  Reserved (0x00), possibly a checksum on other senders
//! ```
//!
//! Receivers are independent devices that hard-code this layout.

use crate::config::{FRAME_BYTE5, FRAME_BYTE7, FRAME_BYTE8, FRAME_TRAILER, PROGRAM_MARKER};
use crate::input::EventCode;

/// Frame size in bytes.
pub const FRAME_LEN: usize = 13;

const SEQUENCE_OFFSET: usize = 1;
const EVENT_OFFSET: usize = 6;

/// One encoded frame, ready to hand to the radio.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// Sequence number carried by the frame.
    pub fn sequence(&self) -> u32 {
        let mut seq = [0u8; 4];
        seq.copy_from_slice(&self.0[SEQUENCE_OFFSET..SEQUENCE_OFFSET + 4]);
        u32::from_le_bytes(seq)
    }

    /// Event code carried by the frame.
    pub fn event_code(&self) -> Option<EventCode> {
        EventCode::new(self.0[EVENT_OFFSET])
    }
}

/// Encode `event` with sequence number `sequence`.
pub fn encode(event: EventCode, sequence: u32) -> Frame {
    let seq = sequence.to_le_bytes();
    Frame([
        PROGRAM_MARKER,
        seq[0],
        seq[1],
        seq[2],
        seq[3],
        FRAME_BYTE5,
        event.get(),
        FRAME_BYTE7,
        FRAME_BYTE8,
        FRAME_TRAILER[0],
        FRAME_TRAILER[1],
        FRAME_TRAILER[2],
        FRAME_TRAILER[3],
    ])
}
