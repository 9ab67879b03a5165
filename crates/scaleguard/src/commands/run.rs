use std::path::Path;
use std::process::Command;

use clap::Args;

use scaleguard_core::config::Config;
use scaleguard_core::{DisplayDeviceInfo, RestoreOutcome, Session};

/// Arguments for the `run` subcommand.
#[derive(Args)]
pub struct RunArgs {
    /// Profile from profiles.toml to apply
    #[arg(long, conflicts_with = "set")]
    profile: Option<String>,
    /// Scaling for one device, e.g. DEL4097=0 (repeatable)
    #[arg(long, value_name = "ID=SCALING", value_parser = super::parse_override)]
    set: Vec<DisplayDeviceInfo>,
    /// Session that owns the change (defaults to the profile or program name)
    #[arg(long)]
    session: Option<String>,
    /// Program to launch, followed by its arguments
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

/// Adjusts scaling, runs the program to completion, then restores.
///
/// Exits with the program's exit code.
pub fn execute(config: &Config, args: &RunArgs) {
    let desired = super::apply::desired(args.profile.as_deref(), &args.set);
    let Some((program, program_args)) = args.command.split_first() else {
        eprintln!("Error: no program given.");
        std::process::exit(2);
    };
    let session = Session::named(session_name(args, program));

    let controller = super::controller(config);

    // Installed before adjusting: Ctrl+C during the helper wait or while
    // the child runs must not skip the restore.
    #[cfg(windows)]
    scaleguard_windows::ctrl_c::shield();

    let adjusted = controller.adjust(&desired, &session);
    super::report_adjust(&adjusted);

    tracing::info!(%session, %program, "launching");
    let code = match Command::new(program).args(program_args).status() {
        Ok(status) => status.code().unwrap_or(1),
        Err(e) => {
            eprintln!("Error: could not start {program}: {e}");
            1
        }
    };

    match controller.restore(&session) {
        RestoreOutcome::NotOwner => {}
        RestoreOutcome::Restored { reverted, restart } => {
            if !reverted.is_empty() {
                println!("Restored scaling on: {}", reverted.join(", "));
                super::report_restart(&restart);
            }
        }
    }

    std::process::exit(code);
}

/// Picks the session name: explicit, then profile, then program stem.
fn session_name(args: &RunArgs, program: &str) -> String {
    args.session
        .clone()
        .or_else(|| args.profile.clone())
        .unwrap_or_else(|| {
            Path::new(program)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| program.to_string())
        })
}
