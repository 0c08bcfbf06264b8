//! Somfy RTS frame construction.
//!
//! A frame is 7 plaintext bytes:
//!
//! | Byte | High nibble      | Low nibble     |
//! |------|------------------|----------------|
//! | 0    | key (`0xA`)      | `0`            |
//! | 1    | command          | checksum       |
//! | 2..4 | rolling code, big-endian          |
//! | 4..7 | 24-bit address, big-endian        |
//!
//! The checksum nibble is chosen so that the XOR of all 14 nibbles of the
//! finished frame is zero. A frame is obfuscated (see [`crate::obfuscation`])
//! and Manchester-encoded (see [`crate::encoding`]) before it goes on air.

use crate::checksum::{hi4, lo4, nibble_checksum};
use crate::consts::{ADDRESS_MAX, FRAME_KEY, FRAME_LEN};
use crate::error::{Error, ValidationError};

/// Command nibbles understood by Somfy RTS receivers.
///
/// Each command is a single bit of the 4-bit command field.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Command {
    /// Stop the motor, or move to the "my" position when idle.
    Stop = 0x1,
    /// Raise the shutter.
    Up = 0x2,
    /// Lower the shutter.
    Down = 0x4,
    /// Programming mode: teaches a receiver this remote's address.
    Prog = 0x8,
}

impl Command {
    /// Every command, in nibble order.
    pub const ALL: [Command; 4] = [Command::Stop, Command::Up, Command::Down, Command::Prog];

    /// The 4-bit value sent in the command field.
    pub const fn nibble(self) -> u8 {
        self as u8
    }

    /// Maps a command nibble back to a command.
    ///
    /// Returns `None` for nibbles that are not exactly one of the four flags.
    pub fn from_nibble(nibble: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.nibble() == nibble)
    }

    /// Short human readable name.
    pub const fn label(self) -> &'static str {
        match self {
            Command::Stop => "Stop",
            Command::Up => "Up",
            Command::Down => "Down",
            Command::Prog => "Prog",
        }
    }
}

/// A 7-byte plaintext Somfy RTS frame with its checksum filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    /// Builds a frame for `command` from a device's rolling code and address.
    ///
    /// # Errors
    /// [`ValidationError::AddressOutOfRange`] if `address` does not fit in 24
    /// bits. The reference encoder silently drops the upper byte instead; use
    /// [`Frame::build_masked`] for that behavior.
    pub fn build(command: Command, rolling_code: u16, address: u32) -> Result<Self, Error> {
        if address > ADDRESS_MAX {
            return Err(ValidationError::AddressOutOfRange(address).into());
        }
        Ok(Self::pack(command.nibble(), rolling_code, address))
    }

    /// Builds a frame, masking every field to its width instead of rejecting it.
    ///
    /// `command_nibble` keeps its low 4 bits, `rolling_code` its low 16 bits,
    /// and `address` its low 24 bits. This matches the reference encoder bit
    /// for bit, including addresses taken modulo 2^24.
    pub fn build_masked(command_nibble: u8, rolling_code: u32, address: u32) -> Self {
        Self::pack(
            lo4(command_nibble),
            (rolling_code & 0xffff) as u16,
            address & ADDRESS_MAX,
        )
    }

    fn pack(command_nibble: u8, rolling_code: u16, address: u32) -> Self {
        let [_, addr_hi, addr_mid, addr_lo] = address.to_be_bytes();
        let [code_hi, code_lo] = rolling_code.to_be_bytes();
        let mut frame = [
            FRAME_KEY << 4,
            command_nibble << 4,
            code_hi,
            code_lo,
            addr_hi,
            addr_mid,
            addr_lo,
        ];
        // checksum nibble is still zero here
        frame[1] |= nibble_checksum(&frame);
        Self(frame)
    }

    /// Wraps raw bytes without checking them. See [`Frame::is_valid`].
    pub const fn from_bytes(bytes: [u8; FRAME_LEN]) -> Self {
        Self(bytes)
    }

    /// The frame bytes.
    pub const fn bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// Consumes the frame, returning its bytes.
    pub const fn into_bytes(self) -> [u8; FRAME_LEN] {
        self.0
    }

    /// The key nibble (always `0xA` for frames built here).
    pub fn key(&self) -> u8 {
        hi4(self.0[0])
    }

    /// The raw 4-bit command field.
    pub fn command_nibble(&self) -> u8 {
        hi4(self.0[1])
    }

    /// The command, if the command field holds one of the four flags.
    pub fn command(&self) -> Option<Command> {
        Command::from_nibble(self.command_nibble())
    }

    /// The checksum nibble.
    pub fn checksum(&self) -> u8 {
        lo4(self.0[1])
    }

    /// The 16-bit rolling code.
    pub fn rolling_code(&self) -> u16 {
        u16::from_be_bytes([self.0[2], self.0[3]])
    }

    /// The 24-bit address.
    pub fn address(&self) -> u32 {
        u32::from_be_bytes([0, self.0[4], self.0[5], self.0[6]])
    }

    /// Whether the key nibble is `0xA` and all 14 nibbles XOR to zero.
    pub fn is_valid(&self) -> bool {
        self.key() == FRAME_KEY && nibble_checksum(&self.0) == 0
    }
}

impl From<Frame> for [u8; FRAME_LEN] {
    fn from(frame: Frame) -> Self {
        frame.0
    }
}
