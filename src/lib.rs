//! Compile domain-model fragments (classes, relations, properties and
//! namespaces) into property-graph mutation statements.
//!
//! The crate is split the same way the pipeline runs: [`ontology`] loads and
//! validates fragments, [`synthesis`] turns entries into [`graph::Statement`]s,
//! [`graph`] owns statement rendering and the store port, and [`run`] drives a
//! whole population run and applies the end-of-run compensation policy.

pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod graph;
pub mod logger;
pub mod ontology;
pub mod run;
pub mod synthesis;

#[cfg(feature = "cli")]
pub mod cli;

pub use errors::Error;

/// Application results options list
pub type Result<T, E = Error> = std::result::Result<T, E>;
