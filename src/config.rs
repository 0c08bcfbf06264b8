//! Runtime configuration.
//!
//! [`RtsConfig`] is the explicit context passed to a [`crate::remote::Remote`]
//! session. The codec functions themselves take plain arguments and never
//! read global state.

use serde::{Deserialize, Serialize};

use crate::consts::{
    ADDRESS_BASE, DEFAULT_POLL_INTERVAL_MS, DEFAULT_REPEATS, DEFAULT_TX_TIMEOUT_MS, MAX_REPEATS,
    SOMFY_FREQUENCY_HZ,
};
use crate::error::ValidationError;

/// Tunable parameters of a remote-control session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[serde(rename_all = "camelCase", default)]
pub struct RtsConfig {
    /// Frames per transmission, `1..=MAX_REPEATS`.
    pub repeats: u8,
    /// Offset that device positions are added to when allocating addresses.
    pub address_base: u32,
    /// Carrier frequency handed to the radio transport.
    pub frequency_hz: u32,
    /// Upper bound on one transmission, in milliseconds.
    pub tx_timeout_ms: u32,
    /// Delay between completion polls of the transport, in milliseconds.
    pub poll_interval_ms: u32,
    /// Merge same-polarity durations before handing the sequence to the transport.
    pub consolidate: bool,
    /// Advance the rolling code even when the transport reports a failure.
    ///
    /// Receivers accept a bounded forward skip, so advancing is safe until a
    /// long run of failed sends exhausts that window.
    pub advance_on_failure: bool,
}

impl Default for RtsConfig {
    fn default() -> Self {
        Self {
            repeats: DEFAULT_REPEATS,
            address_base: ADDRESS_BASE,
            frequency_hz: SOMFY_FREQUENCY_HZ,
            tx_timeout_ms: DEFAULT_TX_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            consolidate: false,
            advance_on_failure: true,
        }
    }
}

impl RtsConfig {
    /// Checks the values a session cannot work with.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.repeats == 0 || self.repeats > MAX_REPEATS {
            return Err(ValidationError::RepeatsOutOfRange(self.repeats));
        }
        if self.tx_timeout_ms == 0 {
            return Err(ValidationError::Timeout);
        }
        if self.poll_interval_ms == 0 {
            return Err(ValidationError::PollInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let c = RtsConfig::default();
        assert_eq!(c.validate(), Ok(()));
        assert_eq!(c.repeats, 4);
        assert_eq!(c.frequency_hz, 433_420_000);
        assert!(c.advance_on_failure);
    }

    #[test]
    fn test_rejects_degenerate_values() {
        let c = RtsConfig { repeats: 0, ..RtsConfig::default() };
        assert_eq!(c.validate(), Err(ValidationError::RepeatsOutOfRange(0)));
        let c = RtsConfig { poll_interval_ms: 0, ..RtsConfig::default() };
        assert_eq!(c.validate(), Err(ValidationError::PollInterval));
        let c = RtsConfig { tx_timeout_ms: 0, ..RtsConfig::default() };
        assert_eq!(c.validate(), Err(ValidationError::Timeout));
    }

    #[test]
    fn test_serde_partial_document_uses_defaults() {
        let c = RtsConfig { repeats: 6, consolidate: true, ..RtsConfig::default() };
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(serde_json::from_str::<RtsConfig>(&json).unwrap(), c);

        let partial: RtsConfig = serde_json::from_str(r#"{"txTimeoutMs": 250}"#).unwrap();
        assert_eq!(partial.tx_timeout_ms, 250);
        assert_eq!(partial.repeats, 4);
    }
}
