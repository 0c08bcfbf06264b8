//! Bounded waiting on a transmission in flight.
//!
//! The radio transport reports completion through a non-blocking
//! [`nb::Result`]. The helpers here turn that into a blocking wait driven by
//! an [`embedded_hal::delay::DelayNs`] provider, with an upper bound so that
//! a hung transport cannot stall the session.
//!
//! | timeout_ms | poll_interval_ms | Polls |
//! |-----------:|-----------------:|------:|
//! |       5000 |               10 |   500 |
//! |        250 |               10 |    25 |
//! |          7 |               10 |     1 |

use embedded_hal::delay::DelayNs;

use crate::error::TransportError;
use crate::transport::RadioTransport;

/// Number of delay periods needed to cover `timeout_ms`, rounded up.
///
/// A zero poll interval is treated as 1 ms.
pub const fn poll_budget(timeout_ms: u32, poll_interval_ms: u32) -> u32 {
    let interval = if poll_interval_ms == 0 { 1 } else { poll_interval_ms };
    timeout_ms.div_ceil(interval)
}

/// Polls `transport` until it reports completion or the timeout expires.
///
/// The transport is polled once immediately, then once after each
/// `poll_interval_ms` delay.
///
/// # Errors
/// - Any error the transport reports while polling.
/// - [`TransportError::Timeout`] once `timeout_ms` has elapsed; the
///   transport is aborted before returning.
pub fn wait_for_completion<T, D>(
    transport: &mut T,
    delay: &mut D,
    timeout_ms: u32,
    poll_interval_ms: u32,
) -> Result<(), TransportError>
where
    T: RadioTransport + ?Sized,
    D: DelayNs,
{
    let mut remaining = poll_budget(timeout_ms, poll_interval_ms);
    loop {
        match transport.poll_complete() {
            Ok(()) => return Ok(()),
            Err(nb::Error::Other(e)) => return Err(e),
            Err(nb::Error::WouldBlock) => {}
        }
        if remaining == 0 {
            warn!("transmit: no completion after {} ms, aborting", timeout_ms);
            transport.abort();
            return Err(TransportError::Timeout);
        }
        remaining -= 1;
        delay.delay_ms(poll_interval_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_budget() {
        assert_eq!(poll_budget(5000, 10), 500);
        assert_eq!(poll_budget(250, 10), 25);
        assert_eq!(poll_budget(7, 10), 1);
        assert_eq!(poll_budget(0, 10), 0);
        assert_eq!(poll_budget(3, 0), 3);
    }
}
