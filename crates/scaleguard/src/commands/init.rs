use scaleguard_core::config;

/// Creates the default configuration files at `~/.config/scaleguard/`.
///
/// Generates `config.toml` and `profiles.toml` with comments explaining
/// every option, plus an empty `helpers/` directory for the driver
/// restart helper. Existing files are not overwritten.
pub fn execute() {
    let Some(dir) = config::config_dir() else {
        eprintln!("Error: could not determine home directory.");
        std::process::exit(1);
    };

    if let Some(helpers) = config::helpers_dir()
        && let Err(e) = std::fs::create_dir_all(&helpers)
    {
        eprintln!("Error: could not create {}: {e}", helpers.display());
        std::process::exit(1);
    }

    write_if_missing(
        &dir.join("config.toml"),
        &config::template::generate_config(),
    );
    write_if_missing(
        &dir.join("profiles.toml"),
        &config::template::generate_profiles(),
    );

    println!("\nAdd profiles to profiles.toml; `scaleguard list` shows device ids.");
    println!("Put devcon64.exe / devcon.exe in helpers/ to apply changes without signing out.");
}

/// Writes content to a file only if it doesn't already exist.
fn write_if_missing(path: &std::path::Path, content: &str) {
    if path.exists() {
        println!("Already exists: {}", path.display());
        return;
    }

    match std::fs::write(path, content) {
        Ok(()) => println!("Created {}", path.display()),
        Err(e) => eprintln!("Error: could not write {}: {e}", path.display()),
    }
}
