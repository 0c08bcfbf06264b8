use crate::consts::FRAME_LEN;

/// XOR of the high then low nibble of every byte, in byte order.
///
/// A finished frame folds to zero; a frame whose checksum nibble is still
/// clear folds to the checksum that has to be OR-ed into byte 1.
pub(crate) fn nibble_checksum(frame: &[u8; FRAME_LEN]) -> u8 {
    frame
        .iter()
        .fold(0, |acc, byte| acc ^ hi4(*byte) ^ lo4(*byte))
}

pub(crate) fn lo4(x: u8) -> u8 {
    x & 0x0f
}

pub(crate) fn hi4(x: u8) -> u8 {
    x >> 4
}
