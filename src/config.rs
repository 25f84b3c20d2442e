//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and protocol
//! constants live here so they can be tuned in one place.

// Button classification

/// Interval between two button samples (ms).
pub const POLL_TICK_MS: u32 = 10;

/// Holds shorter than this are treated as contact bounce and ignored (ms).
pub const DEBOUNCE_MS: u64 = 50;

/// Quiet time after the last release that closes a multi-press gesture (ms).
pub const MULTI_PRESS_WINDOW_MS: u64 = 600;

/// Hold time at which a release is classified as a long press (ms).
pub const LONG_PRESS_MS: u64 = 1000;

// 74HC165 shift register

/// Width of the active-low parallel-load pulse (µs).
pub const SHIFT_LOAD_PULSE_US: u32 = 5;

/// Settle time after the load pulse before clocking bits out (µs).
pub const SHIFT_SETTLE_US: u32 = 50;

// Broadcast replay

/// Number of radio channels swept per replay round (channels 1..=N).
pub const CHANNEL_COUNT: u8 = 14;

/// Extra rounds after the initial sweep. 10 → 11 sweeps, 154 transmissions.
pub const REPEAT_ROUNDS: u8 = 10;

/// Spacing imposed before every re-transmission (ms).
pub const TX_SPACING_MS: u32 = 5;

/// Logical channel `n` is tuned as IEEE 802.15.4 channel `n + offset`,
/// which keeps 1..=14 inside the radio's 11..=26 range.
pub const LINK_CHANNEL_OFFSET: u8 = 10;

// Frame protocol (fixed by the receivers, do not change)

/// Program marker at offset 0.
pub const PROGRAM_MARKER: u8 = 0x81;

/// Reserved byte at offset 5.
pub const FRAME_BYTE5: u8 = 0x20;

/// Reserved byte at offset 7.
pub const FRAME_BYTE7: u8 = 0x01;

/// Reserved byte at offset 8.
pub const FRAME_BYTE8: u8 = 0x64;

/// Trailing reserved bytes at offsets 9..=12.
pub const FRAME_TRAILER: [u8; 4] = [0x00; 4];

// GPIO pin assignments (nRF52840)
//
// These are logical names; the actual `embassy_nrf::peripherals::*` are
// picked in `main.rs`.  Adjust for your PCB.
//
//   74HC165 load (SH/LD)    → P0.13
//   74HC165 clock (CLK)     → P0.04
//   74HC165 data (QH)       → P0.05
//   Sleep (moon) button     → P0.14, active-low with pull-up
//   Voltage regulator EN    → P0.12, high keeps the remote powered

// Persisted sequence counter

/// Flash page index where the counter region starts (4 KB per page on nRF52840).
pub const STORAGE_FLASH_PAGE_START: u32 = 252;

/// Number of flash pages reserved for the counter (sequential-storage needs ≥ 2).
pub const STORAGE_FLASH_PAGE_COUNT: u32 = 2;

/// Map key of the counter record.
pub const SEQUENCE_KEY: u8 = 0x01;

// Fault handling

/// Delay between reporting a fatal error and resetting the MCU (ms).
pub const RESTART_DELAY_MS: u64 = 5000;
