//! Tracing setup for the binary.

use anyhow::{anyhow, Context, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Environment variable holding a log filter; checked before `RUST_LOG`.
pub const ENV_LOG: &str = "PHONEBOOK_LOG";

const DEFAULT_LEVEL: &str = "warn";

/// Filter used when neither `PHONEBOOK_LOG` nor `RUST_LOG` is set.
pub fn default_directive(config: &Config) -> &str {
    config
        .log_level
        .as_deref()
        .map(str::trim)
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_LEVEL)
}

/// Install the global subscriber. Logs go to stderr, or are appended to
/// `log_file` when the configuration names one.
pub fn init(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_env(ENV_LOG)
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(default_directive(config)))
        .context("invalid log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match config.log_file {
        Some(ref path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file: {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| anyhow!("failed to install logger: {}", e))
}
