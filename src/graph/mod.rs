//! Graph side of the compiler: statement rendering, the store port and the
//! query sink that routes statements to a store or a transcript.

pub mod repositories;
pub mod sink;
pub mod statement;

#[cfg(feature = "neo4j")]
pub mod neo4j;

pub use repositories::{GraphStore, StoreError};
pub use sink::QuerySink;
pub use statement::Statement;
