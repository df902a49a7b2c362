//! Application configuration.
//!
//! Read from an optional TOML file, then overridden by command-line flags.
//! Every section has defaults, so running without a file is fine. A file
//! looks like:
//!
//! ```toml
//! [cache]
//! backend = "sqlite"
//! connection_string = "estimate.db"
//!
//! [report]
//! vat_rate = "0.20"
//! quote_validity_days = 30
//!
//! [log]
//! level = "debug"
//! file = "estimate.log"
//! ```

use std::path::{Path, PathBuf};

use estimate_core::{CacheConfig, ReportConfig};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Any `EnvFilter` directive. `RUST_LOG` wins when neither this nor
    /// `--log-level` is set.
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub cache: CacheConfig,
    pub report: ReportConfig,
    pub log: LogConfig,
}

/// Without a file, progress is kept in `estimate.db` so a later run can
/// resume it.
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig {
                backend: "sqlite".to_string(),
                connection_string: "estimate.db".to_string(),
            },
            report: ReportConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Applies `--backend`, `--cache` and `--log-level`.
    pub fn with_overrides(
        mut self,
        backend: Option<String>,
        connection_string: Option<String>,
        log_level: Option<String>,
    ) -> Self {
        if let Some(backend) = backend {
            self.cache.backend = backend;
        }
        if let Some(connection_string) = connection_string {
            self.cache.connection_string = connection_string;
        }
        if log_level.is_some() {
            self.log.level = log_level;
        }
        self
    }
}
