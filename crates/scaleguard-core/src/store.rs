//! Per-monitor scaling store access.
//!
//! The shell keeps one sub-entry per monitor under a single subsection.
//! Entry names are composite (identifier plus an OS-generated suffix), so
//! a device is joined to its entry by prefix match on its identifier.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::device::PLACEHOLDER_ID;
use crate::{Error, Result};

/// Key under which the shell stores scaling for monitors without EDID.
pub const NO_EDID_KEY: &str = "NOEDID";

/// Registry-shaped backend holding per-monitor scaling entries.
///
/// Implementations only read and overwrite existing entries. They never
/// create the subsection or an entry.
pub trait MonitorSettingsStore: Send + Sync {
    /// Lists entry names, or `None` when the subsection does not exist.
    fn entries(&self) -> Result<Option<Vec<String>>>;

    /// Reads the scaling value of an entry. `None` if the value is unset.
    fn read_scaling(&self, entry: &str) -> Result<Option<i32>>;

    /// Overwrites the scaling value of an existing entry.
    fn write_scaling(&self, entry: &str, value: i32) -> Result<()>;
}

/// Resolves device identifiers to store entries and reads/writes scaling.
#[derive(Clone)]
pub struct ScalingAccessor {
    store: Arc<dyn MonitorSettingsStore>,
}

impl ScalingAccessor {
    pub fn new(store: Arc<dyn MonitorSettingsStore>) -> Self {
        Self { store }
    }

    /// Returns the stored scaling for a device, or `None` if the device
    /// has no entry (or the store could not be read).
    pub fn lookup(&self, device_id: &str) -> Option<i32> {
        let entry = self.find_entry(device_id)?;
        match self.store.read_scaling(&entry) {
            Ok(value) => Some(value.unwrap_or(0)),
            Err(e) => {
                tracing::warn!(device_id, %entry, "could not read scaling: {e}");
                None
            }
        }
    }

    /// Returns the stored scaling for a device, defaulting to 0.
    pub fn get_scaling(&self, device_id: &str) -> i32 {
        self.lookup(device_id).unwrap_or(0)
    }

    /// Overwrites the stored scaling of a device.
    ///
    /// Returns `false` without creating anything when the device has no
    /// entry or the write fails.
    pub fn set_scaling(&self, device_id: &str, value: i32) -> bool {
        let Some(entry) = self.find_entry(device_id) else {
            tracing::debug!(device_id, "no settings entry; scaling not written");
            return false;
        };
        match self.store.write_scaling(&entry, value) {
            Ok(()) => {
                tracing::info!(device_id, %entry, value, "scaling written");
                true
            }
            Err(e) => {
                tracing::warn!(device_id, %entry, value, "could not write scaling: {e}");
                false
            }
        }
    }

    /// Returns true if the settings subsection exists.
    pub fn has_subsection(&self) -> bool {
        matches!(self.store.entries(), Ok(Some(_)))
    }

    /// Finds the first entry whose name starts with the device's store key.
    pub fn find_entry(&self, device_id: &str) -> Option<String> {
        let key = store_key(device_id);
        match self.store.entries() {
            Ok(Some(names)) => names.into_iter().find(|name| name.starts_with(key)),
            Ok(None) => {
                tracing::debug!("per-monitor settings subsection is missing");
                None
            }
            Err(e) => {
                tracing::warn!("could not list per-monitor settings: {e}");
                None
            }
        }
    }
}

/// Maps a device identifier to the prefix its store entry starts with.
///
/// Placeholder identifiers (with or without a machine suffix) share the
/// single no-EDID key.
pub fn store_key(device_id: &str) -> &str {
    if device_id.starts_with(PLACEHOLDER_ID) {
        NO_EDID_KEY
    } else {
        device_id
    }
}

/// In-memory store for tests and embedders without an OS store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<Option<BTreeMap<String, Option<i32>>>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Creates a store with an empty subsection.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Some(BTreeMap::new())),
            writes: AtomicUsize::new(0),
        }
    }

    /// Creates a store whose subsection does not exist.
    pub fn absent() -> Self {
        Self::default()
    }

    /// Adds an entry with a scaling value.
    pub fn with_entry(self, name: impl Into<String>, value: i32) -> Self {
        self.insert(name, Some(value));
        self
    }

    /// Inserts or replaces an entry, creating the subsection if needed.
    pub fn insert(&self, name: impl Into<String>, value: Option<i32>) {
        self.entries
            .lock()
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value);
    }

    /// Returns the raw value of an entry.
    pub fn value(&self, name: &str) -> Option<i32> {
        self.entries.lock().as_ref()?.get(name).copied().flatten()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl MonitorSettingsStore for MemoryStore {
    fn entries(&self) -> Result<Option<Vec<String>>> {
        Ok(self
            .entries
            .lock()
            .as_ref()
            .map(|map| map.keys().cloned().collect()))
    }

    fn read_scaling(&self, entry: &str) -> Result<Option<i32>> {
        let guard = self.entries.lock();
        let map = guard
            .as_ref()
            .ok_or_else(|| Error::Store("subsection missing".into()))?;
        map.get(entry)
            .copied()
            .ok_or_else(|| Error::Store(format!("no entry {entry}")))
    }

    fn write_scaling(&self, entry: &str, value: i32) -> Result<()> {
        let mut guard = self.entries.lock();
        let slot = guard
            .as_mut()
            .and_then(|map| map.get_mut(entry))
            .ok_or_else(|| Error::Store(format!("no entry {entry}")))?;
        *slot = Some(value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
