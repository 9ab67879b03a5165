use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by scaleguard collaborators and configuration loading.
///
/// The adjustment controller never hands these to its callers; they are
/// logged where they occur and degrade to "no visible effect".
#[derive(Debug, Error)]
pub enum Error {
    /// The home or config directory could not be determined.
    #[error("could not determine config directory")]
    NoConfigDir,

    /// Reading or writing a file failed.
    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A TOML file did not parse.
    #[error("{}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The OS display enumeration API reported a failure.
    #[error("display enumeration failed: {0}")]
    Enumeration(String),

    /// The per-monitor settings store could not be read or written.
    #[error("settings store: {0}")]
    Store(String),

    /// The driver restart helper could not be materialized or launched.
    #[error("restart helper: {0}")]
    Helper(String),

    /// The current host has no implementation of the OS collaborators.
    #[error("display scaling is not supported on this platform")]
    Unsupported,
}

impl Error {
    /// Returns true if the error is a missing file rather than a bad one.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::File { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
