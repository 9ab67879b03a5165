pub mod apply;
pub mod doctor;
pub mod init;
pub mod list;
pub mod restart_driver;
pub mod run;

use scaleguard_core::config::Config;
use scaleguard_core::{AdjustOutcome, AdjustmentController, DisplayDeviceInfo, RestartOutcome};

/// Builds the platform controller or exits with an error.
pub(crate) fn controller(config: &Config) -> AdjustmentController {
    match scaleguard_windows::controller(config) {
        Ok(controller) => controller,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Parses a `--set` value of the form `DEVICE_ID=SCALING`.
pub(crate) fn parse_override(s: &str) -> Result<DisplayDeviceInfo, String> {
    let (id, value) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected DEVICE_ID=SCALING, got '{s}'"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing device id in '{s}'"));
    }
    let scaling: i32 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid scaling '{value}': {e}"))?;
    Ok(DisplayDeviceInfo::new(id, scaling))
}

/// Prints what an adjustment did.
pub(crate) fn report_adjust(outcome: &AdjustOutcome) {
    match outcome {
        AdjustOutcome::Refused { owner } => {
            println!("Display scaling is held by '{owner}'; nothing changed.");
        }
        AdjustOutcome::Unchanged => println!("Scaling already matches; nothing changed."),
        AdjustOutcome::Applied { changed, restart } => {
            println!("Changed scaling on: {}", changed.join(", "));
            report_restart(restart);
        }
    }
}

/// Prints the result of a driver restart.
pub(crate) fn report_restart(outcome: &RestartOutcome) {
    match outcome {
        RestartOutcome::Completed => println!("Display drivers restarted."),
        RestartOutcome::Skipped => {
            println!("Driver restart skipped; changes apply at next sign-in.");
        }
        RestartOutcome::Failed(e) => {
            println!("Driver restart failed ({e}); changes apply at next sign-in.");
        }
    }
}
