pub mod config;
pub mod controller;
pub mod device;
pub mod enumerate;
pub mod error;
pub mod log;
pub mod restart;
pub mod session;
pub mod store;

pub use controller::{AdjustOutcome, AdjustmentController, ControllerState, RestoreOutcome};
pub use device::{DisplayDeviceInfo, DisplayInfo};
pub use enumerate::{DeviceEnumerator, DisplayOutput, DisplaySource, MachineIdentity};
pub use error::{Error, Result};
pub use restart::{DriverRestart, RestartOutcome};
pub use session::Session;
pub use store::{MemoryStore, MonitorSettingsStore, ScalingAccessor};
