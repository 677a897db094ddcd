//! Application configuration.
//!
//! Values are layered: defaults < TOML file < environment < explicit setter
//! calls. Paths are normalized once in [`LensConfigBuilder::build`]; the
//! resulting [`LensConfig`] is immutable.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_DATA_DIRECTORY: &str = "archlens_data";
pub const DEFAULT_LOG_FILTER: &str = "info";

pub const ENV_DATA_DIR: &str = "ARCHLENS_DATA_DIR";
pub const ENV_LOG_LEVEL: &str = "ARCHLENS_LOG_LEVEL";
pub const ENV_LOG_FILE: &str = "ARCHLENS_LOG_FILE";

/// Where log output goes and how much of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `info` or `archlens=debug`.
    pub filter: String,
    /// Optional log file, always absolute or rooted at the data directory.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LensConfig {
    data_directory: PathBuf,
    reports_directory: PathBuf,
    log: LogConfig,
}

impl LensConfig {
    #[must_use]
    pub fn builder() -> LensConfigBuilder {
        LensConfigBuilder::default()
    }

    /// Directory holding one JSON file per model.
    #[must_use]
    pub fn data_directory(&self) -> &Path {
        &self.data_directory
    }

    #[must_use]
    pub fn reports_directory(&self) -> &Path {
        &self.reports_directory
    }

    #[must_use]
    pub fn log(&self) -> &LogConfig {
        &self.log
    }
}

impl Default for LensConfig {
    fn default() -> Self {
        let data_directory = PathBuf::from(DEFAULT_DATA_DIRECTORY);
        Self {
            reports_directory: data_directory.join("reports"),
            data_directory,
            log: LogConfig {
                filter: DEFAULT_LOG_FILTER.to_string(),
                file: None,
            },
        }
    }
}

/// One source of configuration values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Layer {
    data_directory: Option<PathBuf>,
    log_filter: Option<String>,
    log_file: Option<PathBuf>,
}

impl Layer {
    /// Fills gaps in `self` from a lower-precedence layer.
    fn or(self, lower: Layer) -> Layer {
        Layer {
            data_directory: self.data_directory.or(lower.data_directory),
            log_filter: self.log_filter.or(lower.log_filter),
            log_file: self.log_file.or(lower.log_file),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    data_directory: Option<PathBuf>,
    #[serde(default)]
    log: FileLogConfig,
}

#[derive(Debug, Default, Deserialize)]
struct FileLogConfig {
    level: Option<String>,
    file: Option<PathBuf>,
}

/// Collects configuration layers; call order does not affect precedence.
#[derive(Debug, Clone, Default)]
pub struct LensConfigBuilder {
    file: Layer,
    env: Layer,
    explicit: Layer,
}

impl LensConfigBuilder {
    /// Reads a TOML file:
    ///
    /// ```toml
    /// data_directory = "models"
    ///
    /// [log]
    /// level = "debug"
    /// file = "logs/archlens.log"
    /// ```
    pub fn load_file(mut self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: FileConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        self.file = Layer {
            data_directory: parsed.data_directory,
            log_filter: parsed.log.level,
            log_file: parsed.log.file,
        };
        Ok(self)
    }

    /// Reads `ARCHLENS_DATA_DIR`, `ARCHLENS_LOG_LEVEL` and `ARCHLENS_LOG_FILE`.
    #[must_use]
    pub fn load_env(self) -> Self {
        self.load_env_with(|key| std::env::var(key).ok())
    }

    /// Like [`Self::load_env`] with a custom variable lookup. Empty values are
    /// ignored.
    #[must_use]
    pub fn load_env_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        self.env = Layer {
            data_directory: var(ENV_DATA_DIR).map(PathBuf::from),
            log_filter: var(ENV_LOG_LEVEL),
            log_file: var(ENV_LOG_FILE).map(PathBuf::from),
        };
        self
    }

    #[must_use]
    pub fn data_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit.data_directory = Some(path.into());
        self
    }

    #[must_use]
    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.explicit.log_filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit.log_file = Some(path.into());
        self
    }

    /// Resolves the layers. A relative log file is placed under the data
    /// directory; reports always go to `<data>/reports`.
    pub fn build(self) -> Result<LensConfig, ConfigError> {
        let merged = self.explicit.or(self.env).or(self.file);

        let data_directory = merged
            .data_directory
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIRECTORY));
        if data_directory.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                key: "data_directory",
                reason: "path must not be empty".to_string(),
            });
        }

        let filter = merged
            .log_filter
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        if filter.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "log.level",
                reason: "filter must not be empty".to_string(),
            });
        }

        let file = merged.log_file.map(|file| {
            if file.is_relative() {
                data_directory.join(file)
            } else {
                file
            }
        });

        Ok(LensConfig {
            reports_directory: data_directory.join("reports"),
            data_directory,
            log: LogConfig { filter, file },
        })
    }
}
