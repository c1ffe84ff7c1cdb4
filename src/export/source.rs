//! Document source abstractions for export runs
//!
//! The exporter reads through these traits so it can run against MongoDB or
//! against in-memory sources in tests.

use async_trait::async_trait;
use mongodb::bson::Document;

use crate::error::Result;

/// An open connection to the database being exported
#[async_trait]
pub trait DocumentSource: Send {
    /// List collection names in driver order
    async fn list_collections(&mut self) -> Result<Vec<String>>;

    /// Read every document of a collection into memory
    async fn fetch_all(&mut self, collection: &str) -> Result<Vec<Document>>;

    /// Release the connection
    async fn close(&mut self) -> Result<()>;
}

/// Opens a [`DocumentSource`] at the start of each run
#[async_trait]
pub trait SourceConnector: Send + Sync {
    /// Open and verify a connection
    ///
    /// On error nothing is left open.
    async fn connect(&self) -> Result<Box<dyn DocumentSource>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traits_are_object_safe() {
        fn _accepts_source(_source: Box<dyn DocumentSource>) {}
        fn _accepts_connector(_connector: &dyn SourceConnector) {}
    }
}
