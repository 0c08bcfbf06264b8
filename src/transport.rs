//! Radio transport seam.
//!
//! The crate never drives a radio itself. A [`RadioTransport`] receives the
//! fixed [`TxMetadata`] (carrier, modulation preset, raw protocol tag) plus
//! the pulse sequence, and reports completion through [`nb`] polling so it
//! can be backed by an interrupt-driven or DMA-driven driver.
//!
//! ## Example
//!
//! ```rust
//! use embedded_hal_mock::eh1::delay::NoopDelay;
//! use rts433::error::TransportError;
//! use rts433::transport::{transmit, RadioTransport, TxMetadata};
//!
//! struct Loopback(usize);
//!
//! impl RadioTransport for Loopback {
//!     fn start(&mut self, _meta: &TxMetadata, pulses: &[i32]) -> Result<(), TransportError> {
//!         self.0 = pulses.len();
//!         Ok(())
//!     }
//!     fn poll_complete(&mut self) -> nb::Result<(), TransportError> {
//!         Ok(())
//!     }
//!     fn abort(&mut self) {}
//! }
//!
//! let mut radio = Loopback(0);
//! let meta = TxMetadata::somfy(433_420_000);
//! transmit(&mut radio, &mut NoopDelay::new(), &meta, &[9415, -89565], 100, 10).unwrap();
//! assert_eq!(radio.0, 2);
//! ```
//!
//! [`write_raw_dump`] renders the same data in the Flipper Sub-GHz RAW text
//! format, one `RAW_Data` record per [`RAW_RECORD_LEN`] durations.

use core::fmt::{self, Write};

use embedded_hal::delay::DelayNs;

use crate::consts::RAW_RECORD_LEN;
use crate::error::TransportError;
use crate::timer::wait_for_completion;
use crate::transmission::{raw_records, sequence_duration_us};

/// File type line of a raw dump.
pub const RAW_FILETYPE: &str = "Flipper SubGhz RAW File";

/// Format version of a raw dump.
pub const RAW_VERSION: u32 = 1;

/// Protocol tag telling the radio to replay timings verbatim.
pub const RAW_PROTOCOL: &str = "RAW";

/// Modulation presets a transport may be asked to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Preset {
    /// Asynchronous OOK with a 650 kHz receive bandwidth.
    Ook650Async,
    /// Asynchronous OOK with a 270 kHz receive bandwidth.
    Ook270Async,
}

impl Preset {
    /// Name of the preset as written in raw dumps.
    pub const fn name(self) -> &'static str {
        match self {
            Preset::Ook650Async => "FuriHalSubGhzPresetOok650Async",
            Preset::Ook270Async => "FuriHalSubGhzPresetOok270Async",
        }
    }
}

/// Fixed parameters accompanying every pulse sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct TxMetadata {
    /// Carrier frequency in Hz.
    pub frequency_hz: u32,
    /// Modulation preset.
    pub preset: Preset,
    /// Protocol tag, always [`RAW_PROTOCOL`] here.
    pub protocol: &'static str,
}

impl TxMetadata {
    /// Somfy RTS metadata: OOK, raw timings, at `frequency_hz`.
    pub const fn somfy(frequency_hz: u32) -> Self {
        Self {
            frequency_hz,
            preset: Preset::Ook650Async,
            protocol: RAW_PROTOCOL,
        }
    }
}

/// A radio able to replay a signed-duration pulse sequence.
///
/// Only one transmission may be in flight. Implementations should return
/// [`TransportError::Busy`] from [`start`](RadioTransport::start) while one is.
pub trait RadioTransport {
    /// Configures the radio from `metadata` and begins sending `pulses`.
    fn start(&mut self, metadata: &TxMetadata, pulses: &[i32]) -> Result<(), TransportError>;

    /// Reports whether the transmission has finished.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` while pulses are still going out.
    fn poll_complete(&mut self) -> nb::Result<(), TransportError>;

    /// Stops any transmission in flight and returns the radio to idle.
    fn abort(&mut self);
}

impl<T: RadioTransport + ?Sized> RadioTransport for &mut T {
    fn start(&mut self, metadata: &TxMetadata, pulses: &[i32]) -> Result<(), TransportError> {
        (**self).start(metadata, pulses)
    }

    fn poll_complete(&mut self) -> nb::Result<(), TransportError> {
        (**self).poll_complete()
    }

    fn abort(&mut self) {
        (**self).abort()
    }
}

/// Sends `pulses` and blocks until the transport finishes or `timeout_ms` expires.
///
/// # Errors
/// Whatever the transport reports, or [`TransportError::Timeout`].
pub fn transmit<T, D>(
    transport: &mut T,
    delay: &mut D,
    metadata: &TxMetadata,
    pulses: &[i32],
    timeout_ms: u32,
    poll_interval_ms: u32,
) -> Result<(), TransportError>
where
    T: RadioTransport + ?Sized,
    D: DelayNs,
{
    debug!(
        "transmit: {} pulses, {} us on air at {} Hz",
        pulses.len(),
        sequence_duration_us(pulses),
        metadata.frequency_hz
    );
    transport.start(metadata, pulses)?;
    wait_for_completion(transport, delay, timeout_ms, poll_interval_ms)
}

/// Writes `pulses` as a Flipper Sub-GHz RAW file.
///
/// ```text
/// Filetype: Flipper SubGhz RAW File
/// Version: 1
/// Frequency: 433420000
/// Preset: FuriHalSubGhzPresetOok650Async
/// Protocol: RAW
/// RAW_Data: 9415 -89565 2416 -2416 ...
/// ```
pub fn write_raw_dump<W: Write>(out: &mut W, metadata: &TxMetadata, pulses: &[i32]) -> fmt::Result {
    writeln!(out, "Filetype: {RAW_FILETYPE}")?;
    writeln!(out, "Version: {RAW_VERSION}")?;
    writeln!(out, "Frequency: {}", metadata.frequency_hz)?;
    writeln!(out, "Preset: {}", metadata.preset.name())?;
    writeln!(out, "Protocol: {}", metadata.protocol)?;
    for record in raw_records(pulses) {
        out.write_str("RAW_Data:")?;
        for d in record {
            write!(out, " {d}")?;
        }
        out.write_char('\n')?;
    }
    Ok(())
}

/// Number of `RAW_Data` records [`write_raw_dump`] emits for `len` durations.
pub const fn raw_record_count(len: usize) -> usize {
    len.div_ceil(RAW_RECORD_LEN)
}
