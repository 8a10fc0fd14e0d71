//! `tax-console.toml` handling.
//!
//! ```toml
//! log_level = "info"
//! log_file = "tax-console.log"
//!
//! [source]
//! backend = "fixture"
//! location = "data/tax-rates.json"
//! ```
//!
//! Every key is optional. Command-line flags win over file values.

use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tax_core::SourceConfig;
use thiserror::Error;
use tracing::debug;

use crate::logging::DEFAULT_LOG_LEVEL;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "tax-console.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleConfig {
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub source: SourceConfig,
}

impl ConsoleConfig {
    /// Reads the configuration.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// used when present and defaults apply otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        match fs::read_to_string(path) {
            Ok(contents) => {
                debug!(path = %path.display(), "read config file");
                Self::from_toml_str(&contents)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound && !required => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies command-line flags. A `source` without a `backend` selects
    /// the `fixture` backend.
    pub fn apply_overrides(
        &mut self,
        backend: Option<String>,
        source: Option<String>,
        log_level: Option<String>,
    ) {
        match (backend, source) {
            (Some(backend), source) => {
                self.source.backend = backend;
                if let Some(location) = source {
                    self.source.location = location;
                }
            }
            (None, Some(location)) => {
                self.source.backend = "fixture".to_string();
                self.source.location = location;
            }
            (None, None) => {}
        }
        if log_level.is_some() {
            self.log_level = log_level;
        }
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}
