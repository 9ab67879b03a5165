//! Enumeration of attached monitors.

use std::sync::OnceLock;

use crate::device::{self, DisplayDeviceInfo, DisplayInfo, PLACEHOLDER_ID};
use crate::{Result, ScalingAccessor};

/// One display output as reported by the OS.
///
/// `device_path` is the monitor's hardware path from the second,
/// per-adapter query. It is empty when that query failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayOutput {
    /// Whether the output is part of the desktop.
    pub attached: bool,
    pub label: String,
    pub device_path: String,
}

/// OS display enumeration API.
pub trait DisplaySource: Send + Sync {
    /// Yields outputs in OS order. An `Err` item ends the scan.
    fn outputs(&self) -> Box<dyn Iterator<Item = Result<DisplayOutput>> + '_>;
}

/// Host identity query used to tell placeholder monitors apart.
pub trait MachineIdentity: Send + Sync {
    /// Returns a string uniquely identifying this machine.
    fn machine_id(&self) -> Option<String>;
}

/// Lists attached monitors with their currently stored scaling.
///
/// Best effort: failures shorten or empty the result but never escape.
pub struct DeviceEnumerator {
    source: Box<dyn DisplaySource>,
    identity: Box<dyn MachineIdentity>,
    machine_id: OnceLock<String>,
    scaling: ScalingAccessor,
}

impl DeviceEnumerator {
    pub fn new(
        source: Box<dyn DisplaySource>,
        identity: Box<dyn MachineIdentity>,
        scaling: ScalingAccessor,
    ) -> Self {
        Self {
            source,
            identity,
            machine_id: OnceLock::new(),
            scaling,
        }
    }

    /// Returns every attached monitor with a recognisable identifier.
    ///
    /// Entries come back with `enabled = false`: enumeration reports
    /// state, it does not request an adjustment.
    pub fn enumerate(&self) -> DisplayInfo {
        let mut devices = Vec::new();

        for output in self.source.outputs() {
            let output = match output {
                Ok(output) => output,
                Err(e) => {
                    tracing::warn!("display enumeration stopped early: {e}");
                    break;
                }
            };
            if !output.attached {
                continue;
            }
            let Some(raw_id) = device::extract_device_id(&output.device_path) else {
                tracing::debug!(path = %output.device_path, "skipping output without monitor id");
                continue;
            };

            let device_id = if raw_id == PLACEHOLDER_ID {
                device::disambiguate(raw_id, self.machine_id())
            } else {
                raw_id.to_string()
            };
            let scaling = self.scaling.get_scaling(&device_id);

            devices.push(DisplayDeviceInfo {
                device_label: output.label,
                device_id,
                scaling,
                enabled: false,
            });
        }

        DisplayInfo::new(devices)
    }

    /// The machine identifier, queried on first use only.
    fn machine_id(&self) -> &str {
        self.machine_id.get_or_init(|| {
            self.identity.machine_id().unwrap_or_else(|| {
                tracing::warn!("machine identity unavailable; placeholder ids are not unique");
                String::new()
            })
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::*;
    use crate::{Error, MemoryStore};

    /// Scripted display source; `None` items become enumeration errors.
    #[derive(Default, Clone)]
    pub(crate) struct FakeSource {
        pub outputs: Arc<Mutex<Vec<Option<DisplayOutput>>>>,
    }

    impl FakeSource {
        pub fn with(outputs: Vec<Option<DisplayOutput>>) -> Self {
            Self {
                outputs: Arc::new(Mutex::new(outputs)),
            }
        }
    }

    impl DisplaySource for FakeSource {
        fn outputs(&self) -> Box<dyn Iterator<Item = Result<DisplayOutput>> + '_> {
            let items: Vec<_> = self
                .outputs
                .lock()
                .iter()
                .map(|o| {
                    o.clone()
                        .ok_or_else(|| Error::Enumeration("device query failed".into()))
                })
                .collect();
            Box::new(items.into_iter())
        }
    }

    pub(crate) struct FakeIdentity {
        pub id: Option<String>,
        pub calls: Arc<AtomicUsize>,
    }

    impl FakeIdentity {
        pub fn new(id: &str) -> Self {
            Self {
                id: Some(id.to_string()),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl MachineIdentity for FakeIdentity {
        fn machine_id(&self) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.id.clone()
        }
    }

    pub(crate) fn monitor(id: &str, label: &str) -> Option<DisplayOutput> {
        Some(DisplayOutput {
            attached: true,
            label: label.to_string(),
            device_path: format!(r"MONITOR\{id}\{{4d36e96e-e325-11ce-bfc1-08002be10318}}\0001"),
        })
    }

    fn enumerator(source: FakeSource, identity: FakeIdentity, store: MemoryStore) -> DeviceEnumerator {
        DeviceEnumerator::new(
            Box::new(source),
            Box::new(identity),
            ScalingAccessor::new(Arc::new(store)),
        )
    }

    #[test]
    fn lists_attached_monitors_with_stored_scaling() {
        // Arrange
        let source = FakeSource::with(vec![
            monitor("MON123", "Dell U2720Q"),
            monitor("DEL4097", "Generic PnP Monitor"),
        ]);
        let store = MemoryStore::new().with_entry("MON123_00_07E4_3C^AB", 100);
        let enumerator = enumerator(source, FakeIdentity::new("m"), store);

        // Act
        let info = enumerator.enumerate();

        // Assert
        assert_eq!(info.len(), 2);
        assert_eq!(info.devices[0].device_id, "MON123");
        assert_eq!(info.devices[0].device_label, "Dell U2720Q");
        assert_eq!(info.devices[0].scaling, 100);
        assert_eq!(info.devices[1].scaling, 0);
    }

    #[test]
    fn skips_detached_and_unrecognised_outputs() {
        // Arrange
        let mut detached = monitor("MON999", "Off").unwrap();
        detached.attached = false;
        let unresolved = DisplayOutput {
            attached: true,
            label: "Adapter".into(),
            device_path: r"PCI\VEN_10DE&DEV_2484".into(),
        };
        let source = FakeSource::with(vec![
            Some(detached),
            Some(unresolved),
            monitor("MON123", "Dell"),
        ]);
        let enumerator = enumerator(source, FakeIdentity::new("m"), MemoryStore::new());

        // Act
        let info = enumerator.enumerate();

        // Assert
        assert_eq!(info.len(), 1);
        assert_eq!(info.devices[0].device_id, "MON123");
    }

    #[test]
    fn enumeration_error_keeps_partial_results() {
        // Arrange
        let source = FakeSource::with(vec![
            monitor("MON123", "Dell"),
            None,
            monitor("DEL4097", "Never reached"),
        ]);
        let enumerator = enumerator(source, FakeIdentity::new("m"), MemoryStore::new());

        // Act
        let info = enumerator.enumerate();

        // Assert
        assert_eq!(info.len(), 1);
        assert_eq!(info.devices[0].device_id, "MON123");
    }

    #[test]
    fn placeholder_ids_differ_between_machines() {
        // Arrange
        let a = enumerator(
            FakeSource::with(vec![monitor(PLACEHOLDER_ID, "Generic")]),
            FakeIdentity::new("machine-a"),
            MemoryStore::new(),
        );
        let b = enumerator(
            FakeSource::with(vec![monitor(PLACEHOLDER_ID, "Generic")]),
            FakeIdentity::new("machine-b"),
            MemoryStore::new(),
        );

        // Act
        let id_a = a.enumerate().devices[0].device_id.clone();
        let id_b = b.enumerate().devices[0].device_id.clone();

        // Assert
        assert_eq!(id_a, "Default_Monitormachine-a");
        assert_ne!(id_a, id_b);
    }

    #[test]
    fn placeholder_scaling_comes_from_no_edid_entry() {
        // Arrange
        let store = MemoryStore::new().with_entry("NOEDID_8086_0046_00000000_00020000_0^12", 175);
        let enumerator = enumerator(
            FakeSource::with(vec![monitor(PLACEHOLDER_ID, "Generic")]),
            FakeIdentity::new("machine-a"),
            store,
        );

        // Act / Assert
        assert_eq!(enumerator.enumerate().devices[0].scaling, 175);
    }

    #[test]
    fn machine_identity_is_queried_once() {
        // Arrange
        let identity = FakeIdentity::new("machine-a");
        let calls = identity.calls.clone();
        let enumerator = enumerator(
            FakeSource::with(vec![
                monitor(PLACEHOLDER_ID, "Generic"),
                monitor(PLACEHOLDER_ID, "Generic"),
            ]),
            identity,
            MemoryStore::new(),
        );

        // Act
        enumerator.enumerate();
        enumerator.enumerate();

        // Assert
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn identity_is_not_queried_without_placeholders() {
        // Arrange
        let identity = FakeIdentity::new("machine-a");
        let calls = identity.calls.clone();
        let enumerator = enumerator(
            FakeSource::with(vec![monitor("MON123", "Dell")]),
            identity,
            MemoryStore::new(),
        );

        // Act
        enumerator.enumerate();

        // Assert
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
