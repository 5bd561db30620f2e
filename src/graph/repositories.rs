use std::sync::Arc;

use async_trait::async_trait;

/// Failures reported by a [`GraphStore`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store refused the credentials.
    #[error("authentication failed: {0}")]
    Authentication(String),
    /// The store could not be reached or the connection broke.
    #[error("connection failed: {0}")]
    Connection(String),
    /// The store rejected an individual statement.
    #[error("statement rejected: {0}")]
    Rejected(String),
}

/// Contract describing the graph store the compiler writes to.
///
/// Each call is one unit of work; there is no transaction spanning several
/// statements.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Executes a single Cypher statement.
    ///
    /// Implementors must not return before the store has applied or rejected
    /// the statement.
    async fn execute(&self, statement: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<T> GraphStore for Arc<T>
where
    T: GraphStore + ?Sized,
{
    async fn execute(&self, statement: &str) -> Result<(), StoreError> {
        (**self).execute(statement).await
    }
}
