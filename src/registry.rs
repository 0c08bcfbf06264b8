//! Device registry: addresses, rolling codes, and their persistence.
//!
//! Each remote ("device") owns a 24-bit address and a 16-bit rolling code.
//! Receivers only accept a frame whose rolling code lies a bounded distance
//! ahead of the last one they saw, so the code must move forward after every
//! transmit attempt and must survive restarts.
//!
//! The registry is a write-through cache of a [`DeviceDocument`] held by a
//! [`DeviceStore`]. The document is read once in [`DeviceRegistry::load`] and
//! rewritten in full after each mutation.
//!
//! ## Limitations
//!
//! - A crash between a mutation and the save that follows it loses that
//!   mutation.
//! - Devices can be added but never removed or renamed.

use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

use crate::consts::{
    ADDRESS_MAX, DOCUMENT_VERSION, INITIAL_ROLLING_CODE, MAX_DEVICES, MAX_NAME_BYTES, MAX_NAME_LEN,
};
use crate::error::{Error, StoreError, ValidationError};

/// Name of a device, 1 to [`MAX_NAME_LEN`] characters.
pub type DeviceName = String<MAX_NAME_BYTES>;

/// One remote: its name, address, and next rolling code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Display name.
    pub name: DeviceName,
    /// 24-bit remote address.
    pub address: u32,
    /// Rolling code to put in the next frame.
    pub rolling_code: u16,
}

/// The persisted device list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct DeviceDocument {
    /// Schema version, see [`DOCUMENT_VERSION`].
    pub version: u32,
    /// Devices in registration order.
    pub devices: Vec<Device, MAX_DEVICES>,
}

impl Default for DeviceDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            devices: Vec::new(),
        }
    }
}

impl DeviceDocument {
    /// Builds a document from stored entries, keeping what a registry can use.
    ///
    /// Entries with an unusable name, an address wider than 24 bits, or an
    /// address already taken are skipped. Entries past [`MAX_DEVICES`] are
    /// cut off. Returns the document and the number of entries dropped.
    pub fn salvage<I>(version: u32, entries: I) -> (Self, usize)
    where
        I: IntoIterator<Item = Device>,
    {
        let mut devices: Vec<Device, MAX_DEVICES> = Vec::new();
        let mut dropped = 0;
        for device in entries {
            let usable = device.address <= ADDRESS_MAX
                && check_name(&device.name).is_ok()
                && devices.iter().all(|d| d.address != device.address);
            if !usable || devices.push(device).is_err() {
                dropped += 1;
            }
        }
        (Self { version, devices }, dropped)
    }
}

/// External home of the device document.
///
/// Implementations must replace the stored document as a whole, and should
/// never leave a half-written document behind when `save` fails.
pub trait DeviceStore {
    /// Reads the document. `Ok(None)` means nothing has been stored yet.
    fn load(&mut self) -> Result<Option<DeviceDocument>, StoreError>;

    /// Replaces the stored document.
    fn save(&mut self, document: &DeviceDocument) -> Result<(), StoreError>;
}

impl<S: DeviceStore + ?Sized> DeviceStore for &mut S {
    fn load(&mut self) -> Result<Option<DeviceDocument>, StoreError> {
        (**self).load()
    }

    fn save(&mut self, document: &DeviceDocument) -> Result<(), StoreError> {
        (**self).save(document)
    }
}

/// A [`DeviceStore`] kept in memory.
///
/// Useful for targets without a filesystem and for tests; `fail_reads` and
/// `fail_writes` simulate a broken medium.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    /// The stored document, if any.
    pub document: Option<DeviceDocument>,
    /// Number of successful saves.
    pub saves: u32,
    /// When set, every load fails with [`StoreError::Unreadable`].
    pub fail_reads: bool,
    /// When set, every save fails with [`StoreError::Unwritable`].
    pub fail_writes: bool,
}

impl MemoryStore {
    /// Creates a store already holding `document`.
    pub fn with_document(document: DeviceDocument) -> Self {
        Self {
            document: Some(document),
            ..Self::default()
        }
    }
}

impl DeviceStore for MemoryStore {
    fn load(&mut self) -> Result<Option<DeviceDocument>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Unreadable);
        }
        Ok(self.document.clone())
    }

    fn save(&mut self, document: &DeviceDocument) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unwritable);
        }
        self.document = Some(document.clone());
        self.saves += 1;
        Ok(())
    }
}

/// Validates a device name and copies it into a [`DeviceName`].
pub fn device_name(name: &str) -> Result<DeviceName, ValidationError> {
    check_name(name)?;
    let mut out = DeviceName::new();
    // Cannot fail: at most MAX_NAME_LEN chars of at most 4 bytes each.
    let _ = out.push_str(name);
    Ok(out)
}

fn check_name(name: &str) -> Result<(), ValidationError> {
    let chars = name.chars().count();
    if chars == 0 {
        Err(ValidationError::EmptyName)
    } else if chars > MAX_NAME_LEN {
        Err(ValidationError::NameTooLong(chars))
    } else {
        Ok(())
    }
}

/// In-memory view of the device document plus the store it came from.
///
/// When the stored document cannot be used (unreadable, unparsable, or of an
/// unknown version) the registry starts empty and *protected*: every
/// mutation fails with [`StoreError::Protected`] instead of overwriting the
/// stored copy. [`DeviceRegistry::reload`] retries the read, and
/// [`DeviceRegistry::discard_stored`] gives the stored copy up.
#[derive(Debug)]
pub struct DeviceRegistry<S: DeviceStore> {
    store: S,
    document: DeviceDocument,
    address_base: u32,
    protected: bool,
}

impl<S: DeviceStore> DeviceRegistry<S> {
    /// Loads the registry from `store`.
    ///
    /// A missing document yields an empty registry. Unusable entries of an
    /// otherwise readable document are dropped (see
    /// [`DeviceDocument::salvage`]). Any other failure yields an empty,
    /// protected registry.
    pub fn load(store: S, address_base: u32) -> Self {
        let mut registry = Self {
            store,
            document: DeviceDocument::default(),
            address_base,
            protected: false,
        };
        let _ = registry.reload();
        registry
    }

    /// Re-reads the document from the store, replacing the in-memory copy.
    ///
    /// Returns `true` when the registry is usable afterwards, `false` when it
    /// is protected.
    pub fn reload(&mut self) -> bool {
        match self.store.load() {
            Ok(None) => self.accept(DeviceDocument::default()),
            Ok(Some(doc)) if doc.version != DOCUMENT_VERSION => {
                self.protect(StoreError::UnsupportedVersion(doc.version))
            }
            Ok(Some(doc)) => {
                let (document, dropped) = DeviceDocument::salvage(doc.version, doc.devices);
                if dropped > 0 {
                    warn!("registry: dropped {} unusable stored device(s)", dropped);
                }
                self.accept(document);
            }
            Err(e) => self.protect(e),
        }
        !self.protected
    }

    /// Whether mutations are refused to keep a rejected stored document intact.
    pub fn is_protected(&self) -> bool {
        self.protected
    }

    /// Gives up the stored document that was rejected at load.
    ///
    /// The next mutation overwrites it with the (empty) in-memory document.
    pub fn discard_stored(&mut self) {
        if self.protected {
            warn!("registry: stored document will be overwritten");
        }
        self.protected = false;
    }

    fn accept(&mut self, document: DeviceDocument) {
        info!("registry: loaded {} device(s)", document.devices.len());
        self.document = document;
        self.protected = false;
    }

    fn protect(&mut self, reason: StoreError) {
        warn!("registry: stored document rejected, not overwriting it: {}", reason);
        self.document = DeviceDocument::default();
        self.protected = true;
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        if self.protected {
            return Err(StoreError::Protected);
        }
        self.store.save(&self.document)
    }

    /// Adds a device named `name` and persists the document.
    ///
    /// The new device gets address `base + count + 1` and rolling code 1.
    ///
    /// # Errors
    /// - [`Error::Validation`] for an empty or too long name, or when the
    ///   address would leave 24 bits.
    /// - [`Error::RegistryFull`] when [`MAX_DEVICES`] are registered.
    /// - [`Error::Persistence`] when the save fails or the registry is
    ///   protected; the device is not kept.
    pub fn register(&mut self, name: &str) -> Result<Device, Error> {
        let name = device_name(name)?;
        if self.is_full() {
            return Err(Error::RegistryFull(MAX_DEVICES));
        }

        let address = self.next_address();
        if address > ADDRESS_MAX {
            return Err(ValidationError::AddressOutOfRange(address).into());
        }
        let device = Device {
            name,
            address,
            rolling_code: INITIAL_ROLLING_CODE,
        };
        // is_full was checked above
        let _ = self.document.devices.push(device.clone());

        if let Err(e) = self.persist() {
            let _ = self.document.devices.pop();
            warn!("registry: could not persist new device: {}", e);
            return Err(e.into());
        }
        info!(
            "registry: registered {} at {:#x}",
            device.name.as_str(),
            device.address
        );
        Ok(device)
    }

    /// Returns the device at `index`.
    pub fn lookup(&self, index: usize) -> Result<&Device, Error> {
        self.document.devices.get(index).ok_or(Error::NotFound {
            index,
            len: self.len(),
        })
    }

    /// Moves the device's rolling code forward by one (mod 2^16) and persists it.
    ///
    /// Returns the new rolling code.
    ///
    /// # Errors
    /// - [`Error::NotFound`] for an unknown index.
    /// - [`Error::Persistence`] when the save fails. The in-memory code stays
    ///   advanced so that a code is never sent twice in a session.
    pub fn advance(&mut self, index: usize) -> Result<u16, Error> {
        let len = self.len();
        let device = self
            .document
            .devices
            .get_mut(index)
            .ok_or(Error::NotFound { index, len })?;
        device.rolling_code = device.rolling_code.wrapping_add(1);
        let code = device.rolling_code;
        debug!("registry: device {} rolling code -> {}", index, code);

        self.persist().map_err(|e| {
            warn!("registry: could not persist rolling code {}: {}", code, e);
            Error::from(e)
        })?;
        Ok(code)
    }

    /// Registered devices in order.
    pub fn devices(&self) -> &[Device] {
        &self.document.devices
    }

    /// Number of registered devices.
    pub fn len(&self) -> usize {
        self.document.devices.len()
    }

    /// Whether no device is registered.
    pub fn is_empty(&self) -> bool {
        self.document.devices.is_empty()
    }

    /// Whether another device can still be registered.
    pub fn is_full(&self) -> bool {
        self.document.devices.is_full()
    }

    /// The in-memory document.
    pub fn document(&self) -> &DeviceDocument {
        &self.document
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the registry, returning the backing store.
    pub fn into_store(self) -> S {
        self.store
    }

    // Never below the highest address already in use, so a hand-edited
    // document cannot cause a collision.
    fn next_address(&self) -> u32 {
        let by_position = self
            .address_base
            .saturating_add(self.len() as u32)
            .saturating_add(1);
        let above_highest = self
            .document
            .devices
            .iter()
            .map(|d| d.address + 1)
            .max()
            .unwrap_or(0);
        by_position.max(above_highest)
    }
}
