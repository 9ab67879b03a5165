use scaleguard_core::RestartOutcome;
use scaleguard_core::config::Config;

/// Restarts display drivers through the configured helper.
///
/// Blocks until the helper exits or the elevation prompt is dismissed.
pub fn execute(config: &Config) {
    let restarter = match scaleguard_windows::restarter(&config.restart) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let outcome = restarter.restart();
    super::report_restart(&outcome);
    if matches!(outcome, RestartOutcome::Failed(_)) {
        std::process::exit(1);
    }
}
