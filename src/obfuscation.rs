//! Somfy RTS byte-chain obfuscation.
//!
//! Every byte after the first is XOR-ed with the previous *obfuscated* byte.
//! This is whitening, not encryption: it is reversible by anyone.

use crate::consts::FRAME_LEN;

/// Obfuscates a plaintext frame: `out[0] = f[0]`, `out[i] = f[i] ^ out[i - 1]`.
pub fn obfuscate(frame: &[u8; FRAME_LEN]) -> [u8; FRAME_LEN] {
    let mut out = *frame;
    for i in 1..FRAME_LEN {
        out[i] ^= out[i - 1];
    }
    out
}

/// Reverses [`obfuscate`]: `f[0] = o[0]`, `f[i] = o[i] ^ o[i - 1]`.
pub fn deobfuscate(obfuscated: &[u8; FRAME_LEN]) -> [u8; FRAME_LEN] {
    let mut frame = *obfuscated;
    for i in 1..FRAME_LEN {
        frame[i] = obfuscated[i] ^ obfuscated[i - 1];
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obfuscate_golden_vector() {
        let frame = [0xA0, 0x2E, 0x00, 0x01, 0x12, 0x34, 0x56];
        assert_eq!(obfuscate(&frame), [0xA0, 0x8E, 0x8E, 0x8F, 0x9D, 0xA9, 0xFF]);
    }

    #[test]
    fn test_chain_uses_previous_output() {
        let frame = [0xA7, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66];
        let out = obfuscate(&frame);
        assert_eq!(out[0], frame[0]);
        for i in 1..FRAME_LEN {
            assert_eq!(out[i], frame[i] ^ out[i - 1]);
        }
    }

    #[test]
    fn test_deobfuscate_inverts() {
        let frame = [0xA3, 0x4F, 0x00, 0xFF, 0x10, 0x20, 0x30];
        assert_eq!(deobfuscate(&obfuscate(&frame)), frame);
    }
}
