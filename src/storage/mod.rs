//! Object store abstraction for export artifacts
//!
//! The exporter only needs a single write primitive. Failures come back as
//! the typed [`StorageError`] so the caller can keep them per-collection.

use async_trait::async_trait;

use crate::error::StorageError;

pub mod s3;

pub use s3::S3ObjectStore;

/// Trait for writing artifacts to an object store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `body` under `key`, replacing any existing object
    ///
    /// # Arguments
    /// * `key` - Object key within the configured bucket
    /// * `body` - Object contents
    /// * `content_type` - MIME type stored with the object
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> std::result::Result<(), StorageError>;

    /// Location description for log lines, e.g. `s3://bucket`
    fn location(&self) -> String;
}
