//! Fatal error taxonomy.
//!
//! Everything represented here aborts a run. Per-entry and per-statement
//! problems are not errors; they are recorded as
//! [`crate::diagnostics::Issue`]s and the run carries on.

use std::path::PathBuf;

use crate::{config::ConnectionStringError, graph::StoreError, ontology::LoadError};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A model fragment could not be loaded or failed its shape checks.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The graph store rejected the supplied credentials.
    #[error("could not authenticate against the graph store: {0}")]
    StoreAuthentication(String),

    /// Connecting to or preparing the graph store failed.
    #[error("graph store error: {0}")]
    Store(#[from] StoreError),

    /// A `--db` value or prompted connection could not be used.
    #[error("invalid graph store connection: {0}")]
    ConnectionString(#[from] ConnectionStringError),

    /// Reading the configuration file failed.
    #[error("failed to read configuration `{path}`: {source}")]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for [`crate::config::Config`].
    #[error("invalid configuration `{path}`: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("logger initialization failed: {0}")]
    Logger(String),

    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error("{0}")]
    Message(String),
}

impl Error {
    #[must_use]
    pub fn string(s: &str) -> Self {
        Self::Message(s.to_string())
    }

    /// Lifts a store failure, keeping refused credentials distinct.
    #[must_use]
    pub fn from_store(err: StoreError) -> Self {
        match err {
            StoreError::Authentication(message) => Self::StoreAuthentication(message),
            other => Self::Store(other),
        }
    }
}
