//! A [`DeviceStore`] backed by a JSON file.
//!
//! The document is written to `<path>.tmp`, flushed, then renamed over
//! `<path>`, so a crash mid-save leaves either the old or the new document
//! on disk and never a truncated one. Failures are logged with the path and
//! the underlying I/O error, then collapsed into a [`StoreError`].
//!
//! Loading is lenient about individual entries: an entry that does not parse
//! as a device, or that [`DeviceDocument::salvage`] rejects, is skipped, and
//! entries beyond the registry capacity are cut off.
//!
//! ```json
//! {
//!   "version": 1,
//!   "devices": [
//!     { "name": "Lounge", "address": 1048578, "rollingCode": 7 }
//!   ]
//! }
//! ```

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::StoreError;
use crate::registry::{Device, DeviceDocument, DeviceStore};

// Unbounded view of the file, so oversized or partly broken documents can
// still be salvaged.
#[derive(Debug, Deserialize)]
struct StoredDocument {
    version: u32,
    #[serde(default)]
    devices: Vec<serde_json::Value>,
}

/// Persists the device document as pretty-printed JSON at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// A store reading and writing `path`. Nothing is touched until the first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn write_temp(&self, bytes: &[u8]) -> std::io::Result<PathBuf> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let temp = self.temp_path();
        let mut file = File::create(&temp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        Ok(temp)
    }
}

impl DeviceStore for JsonFileStore {
    fn load(&mut self) -> Result<Option<DeviceDocument>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                host_warn!("store: cannot read {}: {}", self.path.display(), e);
                return Err(StoreError::Unreadable);
            }
        };
        let stored: StoredDocument = serde_json::from_slice(&bytes).map_err(|e| {
            host_warn!("store: {} is not a device document: {}", self.path.display(), e);
            StoreError::Malformed
        })?;

        let total = stored.devices.len();
        let entries = stored
            .devices
            .into_iter()
            .filter_map(|entry| serde_json::from_value::<Device>(entry).ok());
        let (document, _) = DeviceDocument::salvage(stored.version, entries);
        let dropped = total - document.devices.len();
        if dropped > 0 {
            host_warn!(
                "store: skipped {} unusable device entries in {}",
                dropped,
                self.path.display()
            );
        }
        Ok(Some(document))
    }

    fn save(&mut self, document: &DeviceDocument) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(document).map_err(|_| StoreError::Unwritable)?;
        let temp = self.write_temp(&bytes).map_err(|e| {
            host_warn!("store: cannot write {}: {}", self.temp_path().display(), e);
            StoreError::Unwritable
        })?;
        fs::rename(&temp, &self.path).map_err(|e| {
            host_warn!("store: cannot replace {}: {}", self.path.display(), e);
            let _ = fs::remove_file(&temp);
            StoreError::Unwritable
        })?;
        debug!("store: saved {} device(s)", document.devices.len());
        Ok(())
    }
}
