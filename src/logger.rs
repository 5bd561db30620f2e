//! Initializes the global tracing subscriber.
//!
//! Logs always go to stderr so a dry-run transcript on stdout stays a clean
//! Cypher script.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::{config, errors::Error, Result};

/// Log verbosity, ordered from quietest to loudest.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Level requested for this crate by repeated `-v` flags, if any.
    ///
    /// `-v` shows statement descriptions, `-vv` also the statement text.
    /// `-vvv` keeps the crate at trace and opens up dependencies too, see
    /// [`directive`].
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Option<Self> {
        match verbosity {
            0 => None,
            1 => Some(Self::Debug),
            _ => Some(Self::Trace),
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Level actually used: the louder of the configured level and the one
/// requested on the command line. `None` when logging stays disabled.
#[must_use]
pub fn effective_level(config: &config::Logger, verbosity: u8) -> Option<LogLevel> {
    let requested = LogLevel::from_verbosity(verbosity);
    if !config.enable {
        return requested;
    }
    Some(requested.map_or(config.level, |level| level.max(config.level)))
}

/// `EnvFilter` directive for the computed level.
///
/// Dependencies stay at the configured level (`warn` when logging is
/// disabled) until `-vvv`, which traces them as well.
#[must_use]
pub fn directive(config: &config::Logger, verbosity: u8) -> Option<String> {
    let level = effective_level(config, verbosity)?;
    let dependencies = if verbosity >= 3 {
        LogLevel::Trace
    } else if config.enable {
        config.level
    } else {
        LogLevel::Warn
    };
    Some(format!("{dependencies},{}={level}", env!("CARGO_CRATE_NAME")))
}

/// Installs the global subscriber.
///
/// `RUST_LOG`, when set, replaces the computed level entirely.
///
/// # Errors
///
/// Returns [`Error::Logger`] when the filter is invalid or a subscriber was
/// already installed.
pub fn init(config: &config::Logger, verbosity: u8) -> Result<()> {
    let Some(directive) = directive(config, verbosity) else {
        return Ok(());
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&directive))
        .map_err(|err| Error::Logger(err.to_string()))?;

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        Format::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .boxed(),
        Format::Pretty => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .boxed(),
        Format::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(|err| Error::Logger(err.to_string()))
}
