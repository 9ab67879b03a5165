//! Logging setup on top of `tracing`.
//!
//! Console output always goes to stderr. When enabled, logs are also
//! written to `~/.config/scaleguard/logs/scaleguard.<date>.log`, rotated
//! daily with a bounded number of files kept.

use serde::{Deserialize, Serialize};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const LOG_FILE_PREFIX: &str = "scaleguard";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether file logging is enabled. Defaults to `false`.
    pub enabled: bool,
    /// Minimum log level: "trace", "debug", "info", "warn", or "error".
    pub level: String,
    /// Number of daily log files to keep.
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".into(),
            max_files: 5,
        }
    }
}

/// Builds the filter for a configured level. `RUST_LOG` wins when set.
fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
    })
}

/// Initialises the global subscriber. Call once at startup.
///
/// `console_level` is used for stderr output; the file layer (if
/// enabled) uses `config.level`. A second call is ignored.
pub fn init(config: &LogConfig, console_level: &str) {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter(console_level));

    let file = config
        .enabled
        .then(|| file_appender(config))
        .flatten()
        .map(|appender| {
            fmt::layer()
                .with_ansi(false)
                .with_writer(appender)
                .with_filter(filter(&config.level))
        });

    let _ = tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init();

    if config.enabled {
        tracing::debug!("file logging enabled");
    }
}

fn file_appender(config: &LogConfig) -> Option<RollingFileAppender> {
    let dir = crate::config::config_dir()?.join("logs");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Warning: could not create {}: {e}", dir.display());
        return None;
    }
    match RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(config.max_files)
        .build(&dir)
    {
        Ok(appender) => Some(appender),
        Err(e) => {
            eprintln!("Warning: could not open log file in {}: {e}", dir.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_log_config_is_disabled() {
        let config = LogConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.level, "info");
    }
}
