use scaleguard_core::config::{self, Config};

/// ANSI escape helpers for doctor output.
const OK: &str = "\x1b[32m[ok]\x1b[0m";
const WARN: &str = "\x1b[33m[warn]\x1b[0m";
const FAIL: &str = "\x1b[31m[fail]\x1b[0m";
const FIXED: &str = "\x1b[36m[fixed]\x1b[0m";

pub fn execute(config: &Config) {
    println!();
    check_config_dir();
    check_config_file();
    check_profiles_file();
    check_helper(config);
    check_displays(config);
    println!();
}

fn check_config_dir() {
    match config::config_dir() {
        Some(dir) if dir.is_dir() => {
            println!("  {OK} Config directory exists ({})", dir.display());
        }
        Some(dir) => match std::fs::create_dir_all(&dir) {
            Ok(()) => println!("  {FIXED} Created config directory ({})", dir.display()),
            Err(e) => println!("  {FAIL} Could not create {}: {e}", dir.display()),
        },
        None => println!("  {FAIL} Could not determine home directory"),
    }
}

fn check_config_file() {
    let Some(path) = config::config_path() else {
        println!("  {FAIL} Could not determine config path");
        return;
    };
    if !path.exists() {
        println!("  {WARN} config.toml not found (using defaults)");
        return;
    }
    match config::try_load() {
        Ok(_) => println!("  {OK} config.toml is valid"),
        Err(e) => println!("  {FAIL} {e}"),
    }
}

fn check_profiles_file() {
    let Some(path) = config::profiles_path() else {
        println!("  {FAIL} Could not determine profiles path");
        return;
    };
    if !path.exists() {
        println!("  {WARN} profiles.toml not found (no profiles)");
        return;
    }
    match config::try_load_profiles() {
        Ok(profiles) => println!("  {OK} profiles.toml is valid ({} profiles)", profiles.len()),
        Err(e) => println!("  {FAIL} {e}"),
    }
}

fn check_helper(config: &Config) {
    if !config.restart.enabled {
        println!("  {WARN} Driver restart disabled (changes apply at next sign-in)");
        return;
    }
    match scaleguard_windows::helper_path(&config.restart) {
        Some(path) if path.is_file() => {
            println!("  {OK} Restart helper found ({})", path.display());
        }
        Some(path) => {
            println!("  {FAIL} Restart helper missing ({})", path.display());
        }
        None => println!("  {FAIL} Restart helper unavailable on this platform"),
    }
}

fn check_displays(config: &Config) {
    let controller = match scaleguard_windows::controller(config) {
        Ok(c) => c,
        Err(e) => {
            println!("  {FAIL} {e}");
            return;
        }
    };

    let scaling = controller.scaling();
    if scaling.has_subsection() {
        println!("  {OK} Per-monitor settings store exists");
    } else {
        println!("  {FAIL} Per-monitor settings store missing (change scaling once in Settings)");
    }

    let devices = controller.display_devices();
    if devices.is_empty() {
        println!("  {FAIL} No attached monitors found");
        return;
    }
    for device in &devices {
        match scaling.find_entry(&device.device_id) {
            Some(_) => println!(
                "  {OK} {} ({}) has a settings entry",
                device.device_id, device.device_label
            ),
            None => println!(
                "  {WARN} {} ({}) has no settings entry; it cannot be adjusted",
                device.device_id, device.device_label
            ),
        }
    }

    for profile in config::load_profiles() {
        for device in profile.devices.iter().filter(|d| d.enabled) {
            if !devices.contains(&device.device_id) {
                println!(
                    "  {WARN} Profile '{}' targets {} which is not attached",
                    profile.name, device.device_id
                );
            }
        }
    }
}
