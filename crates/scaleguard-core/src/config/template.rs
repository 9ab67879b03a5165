/// Generates the default `config.toml` contents with explanatory comments.
///
/// This is used by `scaleguard init` to create a starter config file that
/// users can immediately edit.
pub fn generate_config() -> String {
    r##"# scaleguard configuration
# Location: ~/.config/scaleguard/config.toml

[restart]
# Restart display drivers after changing scaling so the change shows
# immediately. Requires an elevation prompt. When false, new scaling
# takes effect at the next sign-in.
enabled = true
# Arguments passed to the helper (devcon syntax).
arguments = "restart =display"
# Helper executables. Defaults: ~/.config/scaleguard/helpers/devcon64.exe
# on 64-bit Windows and ~/.config/scaleguard/helpers/devcon.exe otherwise.
# helper_x64 = 'C:\Tools\devcon64.exe'
# helper_x86 = 'C:\Tools\devcon.exe'

[logging]
# Enable file logging to ~/.config/scaleguard/logs/.
enabled = false
# Minimum log level: "trace", "debug", "info", "warn", or "error".
level = "info"
# Number of daily log files to keep.
max_files = 5
"##
    .to_string()
}

/// Generates the default `profiles.toml` contents.
///
/// Profiles name a desired scaling per monitor. Run `scaleguard list`
/// to see the device ids of attached monitors.
pub fn generate_profiles() -> String {
    r##"# scaleguard profiles
# Location: ~/.config/scaleguard/profiles.toml
#
# Each profile lists the scaling to apply while a program launched with
# `scaleguard run --profile <name> -- <program>` is running. The previous
# values are restored when the program exits.
#
# [[profile]]
# name = "game"
#
# [[profile.device]]
# device_id = "DEL4097"   # from `scaleguard list`
# scaling = 0             # value as stored by Windows
# enabled = true
"##
    .to_string()
}
