mod loader;
pub mod template;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::DisplayInfo;
use crate::log::LogConfig;
use crate::restart::DEFAULT_ARGUMENTS;

pub use loader::{
    config_dir, config_path, helpers_dir, load, load_profiles, profiles_path, try_load,
    try_load_profiles,
};

/// Top-level configuration for scaleguard.
///
/// Loaded from `~/.config/scaleguard/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display driver restart settings.
    pub restart: RestartConfig,
    /// File logging settings.
    pub logging: LogConfig,
}

/// How a scaling change is made visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestartConfig {
    /// Whether to restart display drivers after a change. When off, new
    /// scaling takes effect at the next sign-in.
    pub enabled: bool,
    /// Command line passed to the helper.
    pub arguments: String,
    /// Helper used on 64-bit Windows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_x64: Option<PathBuf>,
    /// Helper used on 32-bit Windows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_x86: Option<PathBuf>,
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            arguments: DEFAULT_ARGUMENTS.into(),
            helper_x64: None,
            helper_x86: None,
        }
    }
}

impl RestartConfig {
    /// Returns the helper for the host architecture.
    ///
    /// Unset paths default to `devcon64.exe` / `devcon.exe` in the
    /// helpers directory next to the config file.
    pub fn helper_path(&self, native_64bit: bool) -> Option<PathBuf> {
        let (configured, file_name) = if native_64bit {
            (&self.helper_x64, "devcon64.exe")
        } else {
            (&self.helper_x86, "devcon.exe")
        };
        configured
            .clone()
            .or_else(|| helpers_dir().map(|d| d.join(file_name)))
    }
}

impl Config {
    /// Clamps values to safe ranges.
    pub fn validate(&mut self) {
        if self.restart.arguments.trim().is_empty() {
            self.restart.arguments = DEFAULT_ARGUMENTS.into();
        }
        self.logging.max_files = self.logging.max_files.clamp(1, 100);
    }
}

/// A named desired display configuration.
///
/// The profile name doubles as the session that owns the adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default, rename = "device")]
    pub devices: DisplayInfo,
}

/// Returns the profile with the given name (case-insensitive).
pub fn find_profile<'a>(profiles: &'a [Profile], name: &str) -> Option<&'a Profile> {
    profiles.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Wrapper for deserializing the profiles file.
///
/// The file contains a top-level `[[profile]]` array of tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct ProfilesFile {
    #[serde(default)]
    profile: Vec<Profile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        // Arrange / Act
        let config = Config::default();

        // Assert
        assert!(config.restart.enabled);
        assert_eq!(config.restart.arguments, "restart =display");
        assert!(!config.logging.enabled);
    }

    #[test]
    fn partial_toml_uses_defaults_for_missing_sections() {
        // Arrange
        let toml_str = "[restart]\nenabled = false\n";

        // Act
        let config: Config = toml::from_str(toml_str).unwrap();

        // Assert
        assert!(!config.restart.enabled);
        assert_eq!(config.restart.arguments, "restart =display");
        assert_eq!(config.logging, LogConfig::default());
    }

    #[test]
    fn validate_restores_blank_arguments_and_clamps_files() {
        // Arrange
        let mut config = Config::default();
        config.restart.arguments = "  ".into();
        config.logging.max_files = 0;

        // Act
        config.validate();

        // Assert
        assert_eq!(config.restart.arguments, DEFAULT_ARGUMENTS);
        assert_eq!(config.logging.max_files, 1);
    }

    #[test]
    fn configured_helper_wins_over_default_location() {
        // Arrange
        let config = RestartConfig {
            helper_x64: Some(PathBuf::from(r"C:\Tools\devcon64.exe")),
            ..Default::default()
        };

        // Act / Assert
        assert_eq!(
            config.helper_path(true),
            Some(PathBuf::from(r"C:\Tools\devcon64.exe"))
        );
        if let Some(x86) = config.helper_path(false) {
            assert!(x86.ends_with("devcon.exe"));
        }
    }

    #[test]
    fn profiles_parse_with_devices() {
        // Arrange
        let toml_str = r#"
[[profile]]
name = "gameA"

[[profile.device]]
device_id = "MON123"
scaling = 125

[[profile.device]]
device_id = "DEL4097"
scaling = 100
enabled = false
"#;

        // Act
        let file: ProfilesFile = toml::from_str(toml_str).unwrap();

        // Assert
        let profile = find_profile(&file.profile, "GAMEA").unwrap();
        assert_eq!(profile.devices.len(), 2);
        assert_eq!(profile.devices.get("MON123").unwrap().scaling, 125);
        assert!(!profile.devices.get("DEL4097").unwrap().enabled);
    }

    #[test]
    fn unknown_profile_is_none() {
        assert!(find_profile(&[], "gameA").is_none());
    }
}
