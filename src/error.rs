//! Error types.
//!
//! Every fallible operation returns [`Error`]. The nested kinds are plain
//! `Copy` enums so they can be matched on without allocation, logged through
//! `defmt`, and carried across the transport and store seams unchanged.

use thiserror::Error;

/// A value that cannot be represented in, or is not accepted by, the protocol.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ValidationError {
    /// The address does not fit the 24-bit address field.
    #[error("address {0:#x} does not fit in 24 bits")]
    AddressOutOfRange(u32),
    /// The repeat count is zero or exceeds the buffer capacity.
    #[error("repeat count {0} is outside 1..={max}", max = crate::consts::MAX_REPEATS)]
    RepeatsOutOfRange(u8),
    /// A device name was empty.
    #[error("device name is empty")]
    EmptyName,
    /// A device name is longer than the allowed number of characters.
    #[error("device name has {0} characters, the limit is {max}", max = crate::consts::MAX_NAME_LEN)]
    NameTooLong(usize),
    /// The transport poll interval is zero.
    #[error("poll interval must be at least 1 ms")]
    PollInterval,
    /// The transmission timeout is zero.
    #[error("transmission timeout must be at least 1 ms")]
    Timeout,
}

/// Failure of the external device document store.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum StoreError {
    /// The document exists but could not be read.
    #[error("device document could not be read")]
    Unreadable,
    /// The document could not be written.
    #[error("device document could not be written")]
    Unwritable,
    /// The document was read but does not match the schema.
    #[error("device document is malformed")]
    Malformed,
    /// The document carries a version this crate does not understand.
    #[error("device document version {0} is not supported")]
    UnsupportedVersion(u32),
    /// The stored document was rejected at load and is kept from being overwritten.
    #[error("stored device document was rejected and is protected from overwrite")]
    Protected,
}

/// Failure reported by, or while waiting on, the radio transport.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum TransportError {
    /// The radio is already in use.
    #[error("radio is busy")]
    Busy,
    /// The radio could not be found or initialised.
    #[error("radio is unavailable")]
    Unavailable,
    /// The radio refused the transmission request.
    #[error("radio rejected the transmission")]
    Rejected,
    /// The transmission did not complete within the configured bound.
    #[error("transmission did not complete in time")]
    Timeout,
}

/// Top-level error for every operation in this crate.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Error {
    /// An input was rejected at the boundary.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// No device exists at the requested position.
    #[error("no device at index {index} (registry holds {len})")]
    NotFound {
        /// Requested position.
        index: usize,
        /// Number of registered devices.
        len: usize,
    },
    /// The registry already holds the maximum number of devices.
    #[error("registry is full ({0} devices)")]
    RegistryFull(usize),
    /// The device document store failed.
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),
    /// The radio transport failed.
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),
}
