//! Run configuration.
//!
//! Configuration is optional: every field has a default and command-line
//! flags override what the file says. A typical file looks like:
//!
//! ```yaml
//! logger:
//!   enable: true
//!   level: info
//!   format: compact
//! store:
//!   uri: bolt://localhost:7687
//!   user: neo4j
//!   password: secret
//! ```

use std::{
    fmt::{self, Debug, Formatter},
    fs,
    path::Path,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{errors::Error, logger, Result};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub logger: Logger,
    /// Graph store to populate. Without one the run writes a transcript.
    pub store: Option<StoreConfig>,
}

impl Config {
    /// Reads a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigIo`] when the file can not be read and
    /// [`Error::ConfigParse`] when it is not a valid configuration.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Logger configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Logger {
    /// Enable or disable log output.
    pub enable: bool,
    /// Base level; `RUST_LOG` and `-v` flags take precedence.
    pub level: logger::LogLevel,
    pub format: logger::Format,
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            enable: true,
            level: logger::LogLevel::Info,
            format: logger::Format::Compact,
        }
    }
}

/// Connection settings of the graph store.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreConfig {
    /// `protocol://host:port`
    pub uri: String,
    pub user: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

impl Debug for StoreConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("uri", &self.uri)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

/// Why a `user:password@protocol://host:port` string was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionStringError {
    #[error("expected `user:password@protocol://host:port`, found no `@`")]
    MissingAt,
    #[error("expected `user:password` before `@`")]
    MissingCredentials,
    #[error("no protocol specified in `{0}`")]
    MissingProtocol(String),
}

impl FromStr for StoreConfig {
    type Err = ConnectionStringError;

    /// Parses `user:password@protocol://host:port`.
    ///
    /// The password may contain `:` and `@`; the address is everything after
    /// the last `@`.
    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let (credentials, uri) = value
            .rsplit_once('@')
            .ok_or(ConnectionStringError::MissingAt)?;
        let (user, password) = credentials
            .split_once(':')
            .filter(|(user, _)| !user.is_empty())
            .ok_or(ConnectionStringError::MissingCredentials)?;
        if !uri.contains("://") {
            return Err(ConnectionStringError::MissingProtocol(uri.to_string()));
        }
        Ok(Self {
            uri: uri.to_string(),
            user: user.to_string(),
            password: password.to_string(),
            database: None,
        })
    }
}
