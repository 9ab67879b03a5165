mod commands;

use clap::{Parser, Subcommand};

use scaleguard_core::config;

#[derive(Parser)]
#[command(
    name = "scaleguard",
    version,
    about = "Per-monitor display scaling for launched programs, restored on exit"
)]
struct Cli {
    /// Print debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default configuration files
    Init,
    /// List attached monitors and their stored scaling
    List {
        /// Print the device list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Apply scaling now without restoring it later
    Apply(commands::apply::ApplyArgs),
    /// Run a program with adjusted scaling and restore it when it exits
    Run(commands::run::RunArgs),
    /// Restart the display drivers now
    RestartDriver,
    /// Check configuration, settings store and restart helper
    Doctor,
}

fn main() {
    let cli = Cli::parse();

    let config = config::load();
    let console_level = if cli.verbose { "debug" } else { "warn" };
    scaleguard_core::log::init(&config.logging, console_level);

    match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::List { json } => commands::list::execute(&config, json),
        Commands::Apply(args) => commands::apply::execute(&config, &args),
        Commands::Run(args) => commands::run::execute(&config, &args),
        Commands::RestartDriver => commands::restart_driver::execute(&config),
        Commands::Doctor => commands::doctor::execute(&config),
    }
}
