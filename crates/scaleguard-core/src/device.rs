//! Display device model and hardware-path identifier rules.
//!
//! A monitor is identified by the segment of its device path that follows
//! the `MONITOR\` class prefix, e.g. `DEL4097` in
//! `MONITOR\DEL4097\{4d36e96e-e325-11ce-bfc1-08002be10318}\0001`.
//! Monitors without identification data all report the same placeholder
//! and get the machine identifier appended.

use serde::{Deserialize, Serialize};

/// Identifier the OS reports for monitors that supply no EDID.
pub const PLACEHOLDER_ID: &str = "Default_Monitor";

const MONITOR_PREFIX: &str = r"MONITOR\";

/// One enumerated monitor, or one entry of a desired/snapshot configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayDeviceInfo {
    /// Human-readable name, e.g. "Generic PnP Monitor".
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub device_label: String,
    /// Stable identifier derived from the hardware path.
    pub device_id: String,
    /// Scaling value as stored by the shell.
    pub scaling: i32,
    /// Whether this entry should be applied by an adjustment.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl DisplayDeviceInfo {
    /// Creates an enabled entry with no label.
    pub fn new(device_id: impl Into<String>, scaling: i32) -> Self {
        Self {
            device_label: String::new(),
            device_id: device_id.into(),
            scaling,
            enabled: true,
        }
    }
}

/// An ordered collection of devices.
///
/// Order follows whatever produced it; identity is always `device_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayInfo {
    pub devices: Vec<DisplayDeviceInfo>,
}

impl DisplayInfo {
    pub fn new(devices: Vec<DisplayDeviceInfo>) -> Self {
        Self { devices }
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Returns the entry with the given identifier, if present.
    pub fn get(&self, device_id: &str) -> Option<&DisplayDeviceInfo> {
        self.devices.iter().find(|d| d.device_id == device_id)
    }

    pub fn contains(&self, device_id: &str) -> bool {
        self.get(device_id).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DisplayDeviceInfo> {
        self.devices.iter()
    }
}

impl FromIterator<DisplayDeviceInfo> for DisplayInfo {
    fn from_iter<I: IntoIterator<Item = DisplayDeviceInfo>>(iter: I) -> Self {
        Self {
            devices: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DisplayInfo {
    type Item = &'a DisplayDeviceInfo;
    type IntoIter = std::slice::Iter<'a, DisplayDeviceInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.iter()
    }
}

/// Extracts the monitor identifier from a device path.
///
/// Returns `None` unless the path starts with `MONITOR\` and has another
/// `\` after a non-empty identifier segment.
pub fn extract_device_id(device_path: &str) -> Option<&str> {
    let rest = device_path.strip_prefix(MONITOR_PREFIX)?;
    let (id, _) = rest.split_once('\\')?;
    (!id.is_empty()).then_some(id)
}

/// Appends the machine identifier to the placeholder identifier.
///
/// Any other identifier is returned unchanged.
pub fn disambiguate(device_id: &str, machine_id: &str) -> String {
    if device_id == PLACEHOLDER_ID {
        format!("{device_id}{machine_id}")
    } else {
        device_id.to_string()
    }
}
