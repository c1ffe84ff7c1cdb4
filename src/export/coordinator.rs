//! Export coordinator for dumping a database to an object store
//!
//! Brings together the document source, the artifact encoder and the object
//! store. Failures are handled in two tiers:
//! - an upload failure is recorded for that collection and the run continues
//! - any other failure ends the run early
//!
//! The source is closed on every path once it has been opened.

use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::formatter::{ARTIFACT_CONTENT_TYPE, ArtifactEncoder};
use crate::storage::ObjectStore;

use super::artifact_key;
use super::report::ExportReport;
use super::source::{DocumentSource, SourceConnector};

/// Coordinator for export runs
///
/// Processes collections strictly one at a time: fetch, encode, upload.
pub struct ExportCoordinator<'a> {
    /// Opens the source connection
    connector: &'a dyn SourceConnector,
    /// Destination for artifacts
    store: &'a dyn ObjectStore,
    /// Converts documents to artifact bodies
    encoder: ArtifactEncoder,
    /// Database name recorded in the report
    database: String,
}

impl<'a> ExportCoordinator<'a> {
    /// Create a new export coordinator
    pub fn new(
        connector: &'a dyn SourceConnector,
        store: &'a dyn ObjectStore,
        database: impl Into<String>,
    ) -> Self {
        Self {
            connector,
            store,
            encoder: ArtifactEncoder::new(),
            database: database.into(),
        }
    }

    /// Execute the export
    ///
    /// 1. Open the source
    /// 2. Export every collection
    /// 3. Close the source, whatever happened in step 2
    ///
    /// # Returns
    /// * `ExportReport` - Per-collection outcomes and any abort reason
    pub async fn run(&self) -> ExportReport {
        let start_time = Instant::now();
        let mut report = ExportReport::new(&self.database);

        info!(
            "Starting export of '{}' to {}",
            self.database,
            self.store.location()
        );

        let mut source = match self.connector.connect().await {
            Ok(source) => source,
            Err(e) => {
                error!("An error occurred: {}", e);
                report.abort(e.to_string());
                report.finish();
                return report;
            }
        };

        if let Err(e) = self.export_collections(source.as_mut(), &mut report).await {
            error!("An error occurred: {}", e);
            report.abort(e.to_string());
        }

        if let Err(e) = source.close().await {
            warn!("Failed to close source connection: {}", e);
        }

        report.finish();
        info!(
            "Export finished in {} ms: {}",
            start_time.elapsed().as_millis(),
            report.summary()
        );
        report
    }

    /// Export collections in the order the source lists them
    ///
    /// Upload failures are recorded in the report; any other error is
    /// returned and stops the loop.
    async fn export_collections(
        &self,
        source: &mut dyn DocumentSource,
        report: &mut ExportReport,
    ) -> Result<()> {
        let collections = source.list_collections().await?;
        debug!("Exporting {} collections", collections.len());

        for name in collections {
            let docs = source.fetch_all(&name).await?;
            let body = self.encoder.encode(&name, &docs)?;
            let key = artifact_key(&name);
            let bytes = body.len();

            match self
                .store
                .put_object(&key, body, ARTIFACT_CONTENT_TYPE)
                .await
            {
                Ok(()) => {
                    info!(
                        "Data from {} exported to {} successfully ({} documents, {} bytes)",
                        name,
                        self.store.location(),
                        docs.len(),
                        bytes
                    );
                    report.record_exported(name, key, docs.len(), bytes);
                }
                Err(e) => {
                    error!(
                        "Error exporting data from {} to {}: {}",
                        name,
                        self.store.location(),
                        e.provider_message()
                    );
                    report.record_failed(name, key, e.provider_message());
                }
            }
        }

        Ok(())
    }
}
