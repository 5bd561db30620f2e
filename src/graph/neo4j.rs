//! [`GraphStore`] adapter for Neo4j over Bolt.

use async_trait::async_trait;
use neo4rs::{query, ConfigBuilder, Graph};
use tracing::info;

use super::repositories::{GraphStore, StoreError};
use crate::config::StoreConfig;

pub struct Neo4jStore {
    graph: Graph,
}

impl Neo4jStore {
    /// Opens the connection pool described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Authentication`] when the credentials are
    /// refused and [`StoreError::Connection`] for every other failure.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        info!(uri = %config.uri, user = %config.user, "connecting to graph store");
        let mut builder = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str());
        if let Some(database) = &config.database {
            builder = builder.db(database.as_str());
        }
        let settings = builder.build().map_err(classify)?;
        let graph = Graph::connect(settings).await.map_err(classify)?;
        Ok(Self { graph })
    }
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn execute(&self, statement: &str) -> Result<(), StoreError> {
        self.graph
            .run(query(statement))
            .await
            .map_err(|err| match classify(err) {
                StoreError::Connection(message) => StoreError::Rejected(message),
                other => other,
            })
    }
}

fn classify(err: neo4rs::Error) -> StoreError {
    match err {
        neo4rs::Error::AuthenticationError(message) => StoreError::Authentication(message),
        other => StoreError::Connection(other.to_string()),
    }
}
