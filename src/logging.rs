//! Log subscriber setup. Nothing is installed until the binary calls
//! [`initialize`].

use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogConfig;
use crate::error::LoggingError;

/// Installs the global subscriber: stderr output plus, when configured, a
/// plain-text file appended to. `RUST_LOG` overrides the configured filter.
pub fn initialize(config: &LogConfig) -> Result<(), LoggingError> {
    let filter = build_filter(config)?;

    let file_layer = match &config.file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|source| LoggingError::OpenFile {
                    path: path.clone(),
                    source,
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::OpenFile {
                    path: path.clone(),
                    source,
                })?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInstalled)?;

    tracing::debug!(filter = %config.filter, file = ?config.file, "logging initialized");
    Ok(())
}

fn build_filter(config: &LogConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.filter).map_err(|e| LoggingError::Filter {
        directive: config.filter.clone(),
        message: e.to_string(),
    })
}
