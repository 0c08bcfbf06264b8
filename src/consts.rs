//! Constants used across the Somfy RTS implementation.
//!
//! This module defines the protocol-wide constants: frame layout, the
//! on-air timing table, buffer sizing, and the registry limits.
//!
//! ## Key Concepts
//!
//! - **Timings**: every duration is in microseconds. In a pulse sequence the
//!   sign carries the carrier state (positive = on, negative = off).
//! - **Frame**: 7 bytes, transmitted MSB first after obfuscation.
//! - **Repeats**: the first frame carries a wakeup pulse, later frames carry a
//!   longer hardware sync run instead.
//! - **Buffer Sizing**: derived from [`MAX_REPEATS`] so that fixed-capacity
//!   (`heapless`) buffers can never overflow.
//!
//! None of the timing values may be changed; receivers are bit and timing exact.

/// Length (in bytes) of a Somfy RTS frame.
pub const FRAME_LEN: usize = 7;

/// Key nibble stored in the upper half of frame byte 0.
pub const FRAME_KEY: u8 = 0xA;

/// Largest representable 24-bit remote address.
pub const ADDRESS_MAX: u32 = 0x00FF_FFFF;

/// Duration of one Manchester symbol.
pub const SYMBOL_US: i32 = 1208;

/// Duration of half a Manchester symbol, the unit every data bit is built from.
pub const HALF_SYMBOL_US: i32 = SYMBOL_US / 2;

/// Carrier-on part of the wakeup pulse, sent before the first frame only.
pub const WAKEUP_HIGH_US: i32 = 9415;

/// Carrier-off part of the wakeup pulse.
pub const WAKEUP_LOW_US: i32 = 89565;

/// Carrier-on part of one hardware sync pair.
pub const HW_SYNC_HIGH_US: i32 = 2416;

/// Carrier-off part of one hardware sync pair.
pub const HW_SYNC_LOW_US: i32 = 2416;

/// Carrier-on part of the software sync pair preceding the payload.
pub const SW_SYNC_HIGH_US: i32 = 4550;

/// Carrier-off part of the software sync pair.
pub const SW_SYNC_LOW_US: i32 = 604;

/// Silence between two repeated frames.
pub const INTER_FRAME_GAP_US: i32 = 30415;

/// Hardware sync pairs ahead of the first frame (after the wakeup pulse).
pub const FIRST_FRAME_HW_SYNCS: usize = 2;

/// Hardware sync pairs ahead of every repeated frame.
pub const REPEAT_FRAME_HW_SYNCS: usize = 7;

/// Number of durations produced by Manchester-encoding one frame.
///
/// 7 bytes * 8 bits * 2 half symbols.
pub const MANCHESTER_LEN: usize = FRAME_LEN * 8 * 2;

/// Default number of frames per transmission: one frame plus three repeats.
pub const DEFAULT_REPEATS: u8 = 4;

/// Upper bound on the number of frames per transmission.
pub const MAX_REPEATS: u8 = 8;

/// Durations emitted for the first frame, excluding the trailing gap.
const FIRST_FRAME_PULSES: usize = 2 + FIRST_FRAME_HW_SYNCS * 2 + 2 + MANCHESTER_LEN;

/// Durations emitted for a repeated frame, excluding the trailing gap.
const REPEAT_FRAME_PULSES: usize = REPEAT_FRAME_HW_SYNCS * 2 + 2 + MANCHESTER_LEN;

/// Capacity of a pulse sequence holding [`MAX_REPEATS`] frames.
///
/// Each frame but the last is followed by one gap.
pub const MAX_PULSES: usize = FIRST_FRAME_PULSES
    + REPEAT_FRAME_PULSES * (MAX_REPEATS as usize - 1)
    + (MAX_REPEATS as usize - 1);

/// Number of durations per `RAW_Data` record in a raw dump.
///
/// This is a transport format detail with no meaning on air.
pub const RAW_RECORD_LEN: usize = 512;

/// Somfy RTS carrier frequency: 433.42 MHz.
pub const SOMFY_FREQUENCY_HZ: u32 = 433_420_000;

/// Reserved offset added to a device's position to form its address.
pub const ADDRESS_BASE: u32 = 0x10_0001;

/// Rolling code given to a freshly registered device.
pub const INITIAL_ROLLING_CODE: u16 = 1;

/// Maximum number of devices held by a registry.
pub const MAX_DEVICES: usize = 8;

/// Maximum length of a device name, in characters.
pub const MAX_NAME_LEN: usize = 20;

/// Storage (in bytes) reserved for a device name: four bytes per character.
pub const MAX_NAME_BYTES: usize = MAX_NAME_LEN * 4;

/// Version tag written into every persisted device document.
pub const DOCUMENT_VERSION: u32 = 1;

/// Default bound on how long a transport may take to finish a transmission.
pub const DEFAULT_TX_TIMEOUT_MS: u32 = 5_000;

/// Default interval between transport completion polls.
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 10;
