//! Manchester encoding of obfuscated frames.
//!
//! Somfy RTS sends each bit as a transition in the middle of a 1208 µs
//! symbol, most significant bit of byte 0 first:
//!
//! - **1** is a rising edge: carrier off for half a symbol, then on.
//! - **0** is a falling edge: carrier on for half a symbol, then off.
//!
//! The output is a flat run of signed half-symbol durations, ready to be
//! spliced into a transmission by [`crate::transmission::compose`].
//!
//! ## Functions
//!
//! - [`encode_bit`]: one bit to its two half-symbol durations
//! - [`encode_manchester`]: a whole 7-byte frame to 112 durations
//!
//! Adjacent durations of equal polarity are left unmerged here; see
//! [`crate::transmission::consolidate`].

use crate::consts::{FRAME_LEN, HALF_SYMBOL_US, MANCHESTER_LEN};

/// Encodes one bit into a `(first half, second half)` pair of durations.
pub const fn encode_bit(bit: bool) -> [i32; 2] {
    if bit {
        [-HALF_SYMBOL_US, HALF_SYMBOL_US]
    } else {
        [HALF_SYMBOL_US, -HALF_SYMBOL_US]
    }
}

/// Manchester-encodes 7 bytes, MSB first, into exactly 112 durations.
pub fn encode_manchester(bytes: &[u8; FRAME_LEN]) -> [i32; MANCHESTER_LEN] {
    let mut out = [0i32; MANCHESTER_LEN];
    let mut i = 0;
    for &byte in bytes {
        for bit_pos in (0..8).rev() {
            let [first, second] = encode_bit((byte >> bit_pos) & 1 == 1);
            out[i] = first;
            out[i + 1] = second;
            i += 2;
        }
    }
    out
}
