//! A remote-control session.
//!
//! [`Remote`] owns the registry, the radio transport, a delay provider, and
//! the menu state, and runs one user action at a time. Every action takes
//! `&mut self`, so a second command cannot start before the first one has
//! finished its load, mutate, and persist cycle.
//!
//! Sending a command runs the whole pipeline:
//!
//! 1. look the device up in the registry
//! 2. build the plaintext [`Frame`]
//! 3. [`obfuscate`] it
//! 4. [`encode_manchester`] the result
//! 5. [`compose`] the repeats (and optionally [`consolidate`])
//! 6. hand the sequence to the transport and wait, bounded by the timeout
//! 7. advance and persist the rolling code
//!
//! By default step 7 runs whether or not step 6 succeeded, because the
//! session cannot tell "the radio never keyed up" from "the radio sent it
//! and then failed". A long run of failed sends can therefore walk the code
//! past the receiver's resynchronisation window. Set
//! [`RtsConfig::advance_on_failure`] to `false` to only advance after a
//! confirmed send.

use embedded_hal::delay::DelayNs;

use crate::config::RtsConfig;
use crate::encoding::encode_manchester;
use crate::error::Error;
use crate::frame::{Command, Frame};
use crate::menu::{Effect, Menu, MenuEvent, Screen};
use crate::obfuscation::obfuscate;
use crate::registry::{Device, DeviceRegistry, DeviceStore};
use crate::transmission::{PulseSequence, compose, consolidate};
use crate::transport::{RadioTransport, TxMetadata, transmit};

/// Result of a successful [`Remote::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct SendReport {
    /// Registry index of the device.
    pub index: usize,
    /// Command sent.
    pub command: Command,
    /// Rolling code carried by the frame.
    pub rolling_code: u16,
    /// Rolling code stored for the next send.
    pub next_rolling_code: u16,
    /// Number of durations handed to the transport.
    pub pulses: usize,
}

/// One remote-control session.
#[derive(Debug)]
pub struct Remote<S, T, D>
where
    S: DeviceStore,
    T: RadioTransport,
    D: DelayNs,
{
    registry: DeviceRegistry<S>,
    transport: T,
    delay: D,
    config: RtsConfig,
    menu: Menu,
}

impl<S, T, D> Remote<S, T, D>
where
    S: DeviceStore,
    T: RadioTransport,
    D: DelayNs,
{
    /// Validates `config` and loads the registry from `store`.
    pub fn new(store: S, transport: T, delay: D, config: RtsConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            registry: DeviceRegistry::load(store, config.address_base),
            transport,
            delay,
            config,
            menu: Menu::new(),
        })
    }

    /// Registers a new device.
    pub fn add_device(&mut self, name: &str) -> Result<Device, Error> {
        self.registry.register(name)
    }

    /// Builds the pulse sequence that sends `command` from `device`.
    ///
    /// Pure: neither the registry nor the transport is touched.
    pub fn pulses_for(&self, device: &Device, command: Command) -> Result<PulseSequence, Error> {
        let frame = Frame::build(command, device.rolling_code, device.address)?;
        let manchester = encode_manchester(&obfuscate(frame.bytes()));
        let pulses = compose(&manchester, self.config.repeats)?;
        Ok(if self.config.consolidate {
            consolidate(&pulses)
        } else {
            pulses
        })
    }

    /// Sends `command` from the device at `index`, then advances its rolling code.
    ///
    /// # Errors
    /// - [`Error::NotFound`] or [`Error::Validation`] before anything is sent;
    ///   the rolling code is left alone.
    /// - [`Error::Transport`] if the radio failed or timed out. The rolling
    ///   code has been advanced unless `advance_on_failure` is off.
    /// - [`Error::Persistence`] if the radio succeeded but the new rolling
    ///   code could not be saved.
    pub fn send(&mut self, index: usize, command: Command) -> Result<SendReport, Error> {
        let device = self.registry.lookup(index)?;
        let rolling_code = device.rolling_code;
        let pulses = self.pulses_for(device, command)?;

        info!(
            "send: {} to {:#x} with code {}",
            command.label(),
            device.address,
            rolling_code
        );
        let metadata = TxMetadata::somfy(self.config.frequency_hz);
        let sent = transmit(
            &mut self.transport,
            &mut self.delay,
            &metadata,
            &pulses,
            self.config.tx_timeout_ms,
            self.config.poll_interval_ms,
        );

        if let Err(e) = sent {
            warn!("send: transport failed: {}", e);
            if self.config.advance_on_failure {
                // the transport error is the one worth reporting
                let _ = self.registry.advance(index);
            }
            return Err(e.into());
        }

        let next_rolling_code = self.registry.advance(index)?;
        Ok(SendReport {
            index,
            command,
            rolling_code,
            next_rolling_code,
            pulses: pulses.len(),
        })
    }

    /// Feeds a UI event through the menu and runs the resulting effect.
    ///
    /// Returns the screen to show next. When the effect fails the screen has
    /// still moved; the error tells the UI what to report.
    pub fn dispatch(&mut self, event: MenuEvent) -> Result<Screen, Error> {
        if let (Screen::MainMenu, MenuEvent::SelectDevice(index)) = (self.menu.screen(), &event) {
            // a stale index never reaches the control menu
            let _ = self.registry.lookup(*index)?;
        }
        match self.menu.handle(event) {
            Effect::None => {}
            Effect::Register(name) => {
                let _ = self.registry.register(&name)?;
            }
            Effect::Transmit { index, command } => {
                if let Err(e) = self.send(index, command) {
                    if matches!(e, Error::NotFound { .. }) {
                        self.menu.reset();
                    }
                    return Err(e);
                }
            }
        }
        Ok(self.menu.screen())
    }

    /// The screen currently shown.
    pub fn screen(&self) -> Screen {
        self.menu.screen()
    }

    /// The device registry.
    pub fn registry(&self) -> &DeviceRegistry<S> {
        &self.registry
    }

    /// Mutable access to the registry, e.g. to retry a rejected load.
    pub fn registry_mut(&mut self) -> &mut DeviceRegistry<S> {
        &mut self.registry
    }

    /// The session configuration.
    pub fn config(&self) -> &RtsConfig {
        &self.config
    }

    /// The radio transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the radio transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Ends the session, returning the store and the transport.
    pub fn release(self) -> (S, T) {
        (self.registry.into_store(), self.transport)
    }
}
