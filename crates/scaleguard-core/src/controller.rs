//! Adjust/restore orchestration with single-owner sessions.
//!
//! The controller is `Idle` until an adjustment writes at least one
//! scaling value; it is then `Owned` by the requesting session and holds
//! the pre-change values of every device it attempted to write. Only the
//! owner can restore. Named sessions other than the owner are refused
//! until then.
//!
//! The whole check, diff, write and restart sequence runs under one lock.
//! A driver restart waits for the elevated helper without a timeout, so
//! concurrent callers block for as long as the helper (or the elevation
//! prompt) takes.

use parking_lot::Mutex;

use crate::{
    DeviceEnumerator, DisplayDeviceInfo, DisplayInfo, DriverRestart, RestartOutcome,
    ScalingAccessor, Session,
};

/// Result of an [`AdjustmentController::adjust`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdjustOutcome {
    /// Another named session owns the display; nothing was touched.
    Refused { owner: Session },
    /// No write succeeded; no restart was triggered.
    Unchanged,
    /// At least one device was written and a restart was requested.
    Applied {
        changed: Vec<String>,
        restart: RestartOutcome,
    },
}

/// Result of an [`AdjustmentController::restore`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The session does not own a pending adjustment.
    NotOwner,
    /// The rollback snapshot was written back and ownership released.
    Restored {
        reverted: Vec<String>,
        restart: RestartOutcome,
    },
}

/// Snapshot of the controller's ownership state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Owned {
        owner: Session,
        snapshot: DisplayInfo,
    },
}

struct Ownership {
    owner: Session,
    snapshot: DisplayInfo,
}

struct Applied {
    rollback: DisplayInfo,
    changed: Vec<String>,
}

/// Process-wide display scaling service.
///
/// Share one instance (e.g. in an `Arc`) between every caller that may
/// adjust or restore scaling.
pub struct AdjustmentController {
    enumerator: DeviceEnumerator,
    scaling: ScalingAccessor,
    restarter: Box<dyn DriverRestart>,
    state: Mutex<Option<Ownership>>,
}

impl AdjustmentController {
    pub fn new(
        enumerator: DeviceEnumerator,
        scaling: ScalingAccessor,
        restarter: Box<dyn DriverRestart>,
    ) -> Self {
        Self {
            enumerator,
            scaling,
            restarter,
            state: Mutex::new(None),
        }
    }

    /// Returns all attached monitors with their stored scaling.
    pub fn display_devices(&self) -> DisplayInfo {
        self.enumerator.enumerate()
    }

    /// The scaling accessor shared with the enumerator.
    pub fn scaling(&self) -> &ScalingAccessor {
        &self.scaling
    }

    /// Applies the enabled entries of `desired` on behalf of `session`.
    pub fn adjust(&self, desired: &DisplayInfo, session: &Session) -> AdjustOutcome {
        let mut state = self.state.lock();

        if let Some(current) = state.as_ref()
            && !session.is_ambient()
            && *session != current.owner
        {
            tracing::info!(%session, owner = %current.owner, "display owned by another session; adjustment refused");
            return AdjustOutcome::Refused {
                owner: current.owner.clone(),
            };
        }

        let applied = self.apply(desired);
        if applied.changed.is_empty() {
            tracing::debug!(%session, "no scaling change applied");
            return AdjustOutcome::Unchanged;
        }

        let restart = self.restarter.restart();

        match state.as_mut() {
            Some(current) => {
                // Keep the earliest pre-change value of each device.
                for entry in applied.rollback.devices {
                    if !current.snapshot.contains(&entry.device_id) {
                        current.snapshot.devices.push(entry);
                    }
                }
            }
            None => {
                *state = Some(Ownership {
                    owner: session.clone(),
                    snapshot: applied.rollback,
                });
            }
        }
        tracing::info!(%session, changed = ?applied.changed, ?restart, "display scaling adjusted");

        AdjustOutcome::Applied {
            changed: applied.changed,
            restart,
        }
    }

    /// Writes back the rollback snapshot if `session` owns the display.
    pub fn restore(&self, session: &Session) -> RestoreOutcome {
        let mut state = self.state.lock();

        let Some(ownership) = state.take_if(|o| o.owner == *session) else {
            tracing::debug!(%session, "restore ignored; session does not own the display");
            return RestoreOutcome::NotOwner;
        };

        let applied = self.apply(&ownership.snapshot);
        let restart = if applied.changed.is_empty() {
            RestartOutcome::Skipped
        } else {
            self.restarter.restart()
        };
        tracing::info!(%session, reverted = ?applied.changed, ?restart, "display scaling restored");

        RestoreOutcome::Restored {
            reverted: applied.changed,
            restart,
        }
    }

    /// Returns the current ownership state.
    pub fn state(&self) -> ControllerState {
        match self.state.lock().as_ref() {
            None => ControllerState::Idle,
            Some(o) => ControllerState::Owned {
                owner: o.owner.clone(),
                snapshot: o.snapshot.clone(),
            },
        }
    }

    /// Writes every enabled, attached entry whose scaling differs.
    ///
    /// Every attempted write is recorded for rollback, successful or not.
    /// A device listed more than once keeps its first pre-change value.
    fn apply(&self, desired: &DisplayInfo) -> Applied {
        let attached = self.enumerator.enumerate();
        let mut rollback: Vec<DisplayDeviceInfo> = Vec::new();
        let mut changed: Vec<String> = Vec::new();

        for device in desired.iter().filter(|d| d.enabled) {
            if !attached.contains(&device.device_id) {
                tracing::debug!(device_id = %device.device_id, "device not attached; skipped");
                continue;
            }
            let before = self.scaling.get_scaling(&device.device_id);
            if device.scaling == before {
                continue;
            }

            if !rollback.iter().any(|r| r.device_id == device.device_id) {
                rollback.push(DisplayDeviceInfo::new(device.device_id.clone(), before));
            }
            if self.scaling.set_scaling(&device.device_id, device.scaling)
                && !changed.contains(&device.device_id)
            {
                changed.push(device.device_id.clone());
            }
        }

        Applied {
            rollback: DisplayInfo::new(rollback),
            changed,
        }
    }
}
