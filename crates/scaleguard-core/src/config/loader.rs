use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::{Config, Profile, ProfilesFile};
use crate::{Error, Result};

/// Returns the config directory: `~/.config/scaleguard/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("scaleguard"))
}

/// Returns the config file path: `~/.config/scaleguard/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Returns the profiles file path: `~/.config/scaleguard/profiles.toml`.
pub fn profiles_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("profiles.toml"))
}

/// Returns the default helper directory: `~/.config/scaleguard/helpers/`.
pub fn helpers_dir() -> Option<PathBuf> {
    config_dir().map(|d| d.join("helpers"))
}

/// Tries to load and parse `config.toml`.
pub fn try_load() -> Result<Config> {
    let path = config_path().ok_or(Error::NoConfigDir)?;
    let mut config: Config = read_toml(&path)?;
    config.validate();
    Ok(config)
}

/// Loads the configuration from disk, falling back to defaults.
///
/// After loading, values are clamped to safe ranges via [`Config::validate`].
/// Non-existent files silently return defaults; other errors are logged.
pub fn load() -> Config {
    load_or_default(try_load, Config::default)
}

/// Tries to load and parse `profiles.toml`.
pub fn try_load_profiles() -> Result<Vec<Profile>> {
    let path = profiles_path().ok_or(Error::NoConfigDir)?;
    let file: ProfilesFile = read_toml(&path)?;
    Ok(file.profile)
}

/// Loads profiles from `~/.config/scaleguard/profiles.toml`.
///
/// Falls back to no profiles if the file is missing or invalid.
pub fn load_profiles() -> Vec<Profile> {
    load_or_default(try_load_profiles, Vec::new)
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::File {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a config value from disk, falling back to defaults.
fn load_or_default<T>(try_load: impl FnOnce() -> Result<T>, default: impl Fn() -> T) -> T {
    match try_load() {
        Ok(val) => val,
        Err(e) if e.is_not_found() => default(),
        Err(e) => {
            tracing::warn!("{e}");
            default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_toml_reports_missing_file_as_not_found() {
        // Arrange
        let path = std::env::temp_dir().join("scaleguard-no-such-config.toml");

        // Act
        let err = read_toml::<Config>(&path).unwrap_err();

        // Assert
        assert!(err.is_not_found());
    }

    #[test]
    fn read_toml_reports_parse_errors_with_path() {
        // Arrange
        let path = std::env::temp_dir().join(format!(
            "scaleguard-bad-config-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[restart\nenabled = ").unwrap();

        // Act
        let err = read_toml::<Config>(&path).unwrap_err();

        // Assert
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("scaleguard-bad-config"));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn load_or_default_falls_back_on_errors() {
        // Act
        let config = load_or_default(|| Err(Error::Store("boom".into())), Config::default);

        // Assert
        assert_eq!(config, Config::default());
    }
}
