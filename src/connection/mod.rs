//! Connection management for MongoDB
//!
//! This module provides:
//! - Connection establishment from a URI, verified with a `ping`
//! - Collection listing and full collection reads for the exporter
//! - Guaranteed release of the client through `disconnect` or `Drop`

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::{Client, Database, options::ClientOptions};
use tracing::{debug, info, warn};

use crate::config::{MongoConfig, redact_uri};
use crate::error::{ConnectionError, Result, extract_error_info};
use crate::export::{DocumentSource, SourceConnector};

/// MongoDB connection manager
///
/// Owns at most one client. The exporter opens it once per invocation and
/// closes it before returning.
pub struct ConnectionManager {
    /// MongoDB client instance
    client: Option<Client>,

    /// Connection configuration
    config: MongoConfig,

    /// Database every operation targets
    database: String,

    /// Current connection state
    state: ConnectionState,
}

/// Connection state information
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected
    Disconnected,

    /// Connected and ready
    Connected,

    /// Connection failed
    Failed(String),
}

impl ConnectionManager {
    /// Create a new connection manager
    ///
    /// # Arguments
    /// * `config` - Connection configuration
    /// * `database` - Database name
    pub fn new(config: MongoConfig, database: impl Into<String>) -> Self {
        Self {
            client: None,
            config,
            database: database.into(),
            state: ConnectionState::Disconnected,
        }
    }

    /// Establish connection to MongoDB
    ///
    /// The driver connects lazily, so a `ping` is sent to surface an
    /// unreachable server here rather than at the first read. On failure the
    /// client is shut down before returning.
    pub async fn connect(&mut self) -> Result<()> {
        let options = self.client_options().await?;
        let client = Client::with_options(options).map_err(|e| {
            self.state = ConnectionState::Failed(e.to_string());
            ConnectionError::ConnectionFailed(describe(&e))
        })?;

        if let Err(e) = client.database("admin").run_command(doc! { "ping": 1 }).await {
            let message = describe(&e);
            self.state = ConnectionState::Failed(message.clone());
            client.shutdown().await;
            return Err(ConnectionError::PingFailed(message).into());
        }

        info!("Connected to MongoDB database '{}'", self.database);
        self.client = Some(client);
        self.state = ConnectionState::Connected;
        Ok(())
    }

    /// Disconnect from MongoDB
    ///
    /// Safe to call more than once.
    pub async fn disconnect(&mut self) -> Result<()> {
        if let Some(client) = self.client.take() {
            client.shutdown().await;
            info!("Closed MongoDB connection");
        }
        self.state = ConnectionState::Disconnected;
        Ok(())
    }

    /// Get a handle to the export database
    pub fn get_database(&self) -> Result<Database> {
        self.client
            .as_ref()
            .map(|client| client.database(&self.database))
            .ok_or_else(|| ConnectionError::NotConnected.into())
    }

    /// Get current connection state
    pub fn get_state(&self) -> &ConnectionState {
        &self.state
    }

    /// Check if currently connected
    pub fn is_connected(&self) -> bool {
        matches!(self.state, ConnectionState::Connected)
    }

    /// Parse the URI and apply timeouts and app name
    async fn client_options(&mut self) -> Result<ClientOptions> {
        let mut options = match ClientOptions::parse(&self.config.uri).await {
            Ok(options) => options,
            Err(e) => {
                self.state = ConnectionState::Failed(e.to_string());
                return Err(ConnectionError::InvalidUri(format!(
                    "{} ({})",
                    redact_uri(&self.config.uri),
                    describe(&e)
                ))
                .into());
            }
        };

        let timeout = self.config.connection_timeout();
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);
        if options.app_name.is_none() {
            options.app_name = Some(self.config.app_name.clone());
        }
        Ok(options)
    }
}

#[async_trait]
impl DocumentSource for ConnectionManager {
    async fn list_collections(&mut self) -> Result<Vec<String>> {
        let db = self.get_database()?;
        let names = db
            .list_collection_names()
            .await
            .map_err(|e| ConnectionError::ListFailed(describe(&e)))?;
        debug!("Found {} collections in '{}'", names.len(), self.database);
        Ok(names)
    }

    async fn fetch_all(&mut self, collection: &str) -> Result<Vec<Document>> {
        let db = self.get_database()?;
        let fetch_failed = |e: mongodb::error::Error| ConnectionError::FetchFailed {
            collection: collection.to_string(),
            message: describe(&e),
        };

        let cursor = db
            .collection::<Document>(collection)
            .find(doc! {})
            .await
            .map_err(fetch_failed)?;
        let docs: Vec<Document> = cursor.try_collect().await.map_err(fetch_failed)?;

        debug!("Fetched {} documents from '{}'", docs.len(), collection);
        Ok(docs)
    }

    async fn close(&mut self) -> Result<()> {
        self.disconnect().await
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        if self.client.take().is_some() {
            warn!("ConnectionManager dropped without explicit disconnect");
        }
    }
}

/// Opens [`ConnectionManager`]s for the exporter
#[derive(Debug, Clone)]
pub struct MongoConnector {
    config: MongoConfig,
    database: String,
}

impl MongoConnector {
    /// Create a connector for `database` on the configured server
    pub fn new(config: MongoConfig, database: impl Into<String>) -> Self {
        Self {
            config,
            database: database.into(),
        }
    }
}

#[async_trait]
impl SourceConnector for MongoConnector {
    async fn connect(&self) -> Result<Box<dyn DocumentSource>> {
        let mut manager = ConnectionManager::new(self.config.clone(), self.database.clone());
        manager.connect().await?;
        Ok(Box::new(manager))
    }
}

/// One-line description of a driver error for diagnostics
fn describe(error: &mongodb::error::Error) -> String {
    let info = extract_error_info(error);
    info.to_json_compact()
        .unwrap_or_else(|_| error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(uri: &str) -> MongoConfig {
        MongoConfig {
            uri: uri.to_string(),
            timeout: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_manager_is_disconnected() {
        let manager = ConnectionManager::new(config("mongodb://localhost"), "configurator");
        assert_eq!(manager.get_state(), &ConnectionState::Disconnected);
        assert!(!manager.is_connected());
        assert!(manager.get_database().is_err());
    }

    #[tokio::test]
    async fn test_invalid_uri_fails_without_client() {
        let mut manager = ConnectionManager::new(config("not-a-uri"), "configurator");
        let err = manager.connect().await.unwrap_err();
        assert!(err.to_string().contains("Invalid connection URI"));
        assert!(matches!(manager.get_state(), ConnectionState::Failed(_)));
        assert!(manager.get_database().is_err());
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        let mut manager = ConnectionManager::new(config("mongodb://localhost"), "configurator");
        manager.disconnect().await.unwrap();
        manager.disconnect().await.unwrap();
        assert_eq!(manager.get_state(), &ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_list_without_connection_is_error() {
        let mut manager = ConnectionManager::new(config("mongodb://localhost"), "configurator");
        let err = manager.list_collections().await.unwrap_err();
        assert!(err.to_string().contains("Not connected"));
    }

    #[tokio::test]
    async fn test_connector_reports_invalid_uri() {
        let connector = MongoConnector::new(config("http://nope"), "configurator");
        assert!(connector.connect().await.is_err());
    }
}
