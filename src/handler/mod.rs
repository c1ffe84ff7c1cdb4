//! Lambda entry point
//!
//! The S3 client is built once per execution environment; each invocation
//! opens and closes its own MongoDB connection. The event payload is ignored.

use lambda_runtime::LambdaEvent;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::{Config, DATABASE_NAME};
use crate::connection::MongoConnector;
use crate::export::{ExportCoordinator, ExportReport, SourceConnector};
use crate::storage::{ObjectStore, S3ObjectStore};

/// Long-lived state shared by all invocations
pub struct ExportFunction<C = MongoConnector, S = S3ObjectStore> {
    connector: C,
    store: S,
}

impl ExportFunction {
    /// Build the production function from configuration
    pub async fn from_config(config: &Config) -> Self {
        Self::new(
            MongoConnector::new(config.mongo.clone(), DATABASE_NAME),
            S3ObjectStore::from_config(&config.s3).await,
        )
    }
}

impl<C, S> ExportFunction<C, S>
where
    C: SourceConnector,
    S: ObjectStore,
{
    pub fn new(connector: C, store: S) -> Self {
        Self { connector, store }
    }

    /// Run one export of the fixed database
    pub async fn invoke(&self) -> ExportReport {
        ExportCoordinator::new(&self.connector, &self.store, DATABASE_NAME)
            .run()
            .await
    }
}

/// Lambda handler
///
/// Always returns the report. Partial and aborted runs are reported in the
/// body rather than as invocation errors.
pub async fn function_handler<C, S>(
    function: &ExportFunction<C, S>,
    event: LambdaEvent<Value>,
) -> Result<ExportReport, lambda_runtime::Error>
where
    C: SourceConnector,
    S: ObjectStore,
{
    info!("Invocation {} started", event.context.request_id);

    let report = function.invoke().await;
    if !report.is_success() {
        warn!("Export incomplete: {}", report.summary());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConnectionError, Result, StorageError};
    use crate::export::DocumentSource;
    use async_trait::async_trait;
    use lambda_runtime::Context;
    use mongodb::bson::{Document, doc};
    use std::sync::Mutex;

    struct StaticSource;

    #[async_trait]
    impl DocumentSource for StaticSource {
        async fn list_collections(&mut self) -> Result<Vec<String>> {
            Ok(vec!["flags".to_string()])
        }

        async fn fetch_all(&mut self, _collection: &str) -> Result<Vec<Document>> {
            Ok(vec![doc! { "enabled": true }])
        }

        async fn close(&mut self) -> Result<()> {
            Ok(())
        }
    }

    struct StaticConnector {
        reachable: bool,
    }

    #[async_trait]
    impl SourceConnector for StaticConnector {
        async fn connect(&self) -> Result<Box<dyn DocumentSource>> {
            if self.reachable {
                Ok(Box::new(StaticSource))
            } else {
                Err(ConnectionError::ConnectionFailed("no route to host".into()).into())
            }
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        keys: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ObjectStore for RecordingStore {
        async fn put_object(
            &self,
            key: &str,
            _body: Vec<u8>,
            _content_type: &str,
        ) -> std::result::Result<(), StorageError> {
            self.keys.lock().unwrap().push(key.to_string());
            Ok(())
        }

        fn location(&self) -> String {
            "memory://".to_string()
        }
    }

    fn event(payload: Value) -> LambdaEvent<Value> {
        LambdaEvent::new(payload, Context::default())
    }

    #[tokio::test]
    async fn test_handler_ignores_payload() {
        let function = ExportFunction::new(
            StaticConnector { reachable: true },
            RecordingStore::default(),
        );

        let first = function_handler(&function, event(Value::Null)).await.unwrap();
        let second = function_handler(&function, event(serde_json::json!({ "any": "thing" })))
            .await
            .unwrap();

        assert_eq!(first.database, "configurator");
        assert_eq!(first.exported_count(), 1);
        assert_eq!(second.exported_count(), 1);
        assert_eq!(
            *function.store.keys.lock().unwrap(),
            vec!["flags.json", "flags.json"]
        );
    }

    #[tokio::test]
    async fn test_handler_returns_ok_when_database_unreachable() {
        let function = ExportFunction::new(
            StaticConnector { reachable: false },
            RecordingStore::default(),
        );

        let report = function_handler(&function, event(Value::Null)).await.unwrap();

        assert!(report.aborted.unwrap().contains("no route to host"));
        assert!(function.store.keys.lock().unwrap().is_empty());
    }
}
