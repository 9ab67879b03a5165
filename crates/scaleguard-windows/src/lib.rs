//! Windows implementations of the scaleguard OS collaborators.
//!
//! On other hosts only the constructors exist: [`controller`] and
//! [`restarter`] return [`Error::Unsupported`] and [`helper_path`] is `None`.

use std::path::PathBuf;

use scaleguard_core::config::{Config, RestartConfig};
use scaleguard_core::{AdjustmentController, DriverRestart, Error, Result};

/// Ctrl+C shield for the launcher console.
#[cfg(windows)]
pub mod ctrl_c;

/// Monitor enumeration via `EnumDisplayDevicesW`.
#[cfg(windows)]
pub mod display;

/// Machine identity via WMI.
#[cfg(windows)]
pub mod identity;

/// Elevated helper launch via `ShellExecuteExW`.
#[cfg(windows)]
pub mod launcher;

/// `PerMonitorSettings` registry store.
#[cfg(windows)]
pub mod registry;

#[cfg(any(windows, test))]
mod wide;

/// Builds the adjustment controller wired to the Windows collaborators.
#[cfg(windows)]
pub fn controller(config: &Config) -> Result<AdjustmentController> {
    use std::sync::Arc;

    use scaleguard_core::{DeviceEnumerator, ScalingAccessor};

    let scaling = ScalingAccessor::new(Arc::new(registry::PerMonitorSettings));
    let enumerator = DeviceEnumerator::new(
        Box::new(display::Win32Displays),
        Box::new(identity::WmiIdentity),
        scaling.clone(),
    );
    Ok(AdjustmentController::new(
        enumerator,
        scaling,
        restarter(&config.restart)?,
    ))
}

#[cfg(not(windows))]
pub fn controller(_config: &Config) -> Result<AdjustmentController> {
    Err(Error::Unsupported)
}

/// Builds the driver restart trigger described by the config.
///
/// A missing helper file is not an error here; it surfaces as a failed
/// restart when one is attempted.
#[cfg(windows)]
pub fn restarter(config: &RestartConfig) -> Result<Box<dyn DriverRestart>> {
    use scaleguard_core::restart::{DisabledRestart, HelperImage, HelperRestart};

    if !config.enabled {
        return Ok(Box::new(DisabledRestart));
    }
    let helper = helper_path(config).ok_or(Error::NoConfigDir)?;
    tracing::debug!(helper = %helper.display(), "using restart helper");
    Ok(Box::new(HelperRestart::new(
        HelperImage::File(helper),
        config.arguments.clone(),
        launcher::ShellRunAs,
    )))
}

#[cfg(not(windows))]
pub fn restarter(_config: &RestartConfig) -> Result<Box<dyn DriverRestart>> {
    Err(Error::Unsupported)
}

/// Returns the helper executable matching the OS architecture.
#[cfg(windows)]
pub fn helper_path(config: &RestartConfig) -> Option<PathBuf> {
    config.helper_path(launcher::is_native_64bit())
}

#[cfg(not(windows))]
pub fn helper_path(_config: &RestartConfig) -> Option<PathBuf> {
    None
}
