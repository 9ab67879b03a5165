use clap::Args;

use scaleguard_core::config::{self, Config};
use scaleguard_core::{DisplayDeviceInfo, DisplayInfo, Session};

/// Arguments for the `apply` subcommand.
#[derive(Args)]
pub struct ApplyArgs {
    /// Profile from profiles.toml to apply
    #[arg(long, conflicts_with = "set")]
    profile: Option<String>,
    /// Scaling for one device, e.g. DEL4097=0 (repeatable)
    #[arg(long, value_name = "ID=SCALING", value_parser = super::parse_override)]
    set: Vec<DisplayDeviceInfo>,
}

/// Applies scaling as the ambient session. Nothing restores it.
pub fn execute(config: &Config, args: &ApplyArgs) {
    let desired = desired(args.profile.as_deref(), &args.set);
    let controller = super::controller(config);
    let outcome = controller.adjust(&desired, &Session::Ambient);
    super::report_adjust(&outcome);
}

/// Resolves the desired configuration from a profile or `--set` values.
///
/// Exits when a named profile does not exist or nothing was given.
pub(crate) fn desired(profile: Option<&str>, overrides: &[DisplayDeviceInfo]) -> DisplayInfo {
    let desired = match profile {
        Some(name) => {
            let profiles = config::load_profiles();
            match config::find_profile(&profiles, name) {
                Some(p) => p.devices.clone(),
                None => {
                    eprintln!("Error: no profile named '{name}' in profiles.toml.");
                    std::process::exit(1);
                }
            }
        }
        None => DisplayInfo::new(overrides.to_vec()),
    };

    if desired.is_empty() {
        eprintln!("Error: nothing to apply; pass --profile or --set ID=SCALING.");
        std::process::exit(2);
    }
    desired
}
