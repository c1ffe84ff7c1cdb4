//! S3 implementation of [`ObjectStore`]

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::primitives::ByteStream;
use tracing::debug;

use super::ObjectStore;
use crate::config::S3Config;
use crate::error::StorageError;

const STATIC_CREDENTIALS_PROVIDER: &str = "exporter-static";

/// Writes artifacts to one S3 bucket
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Wrap an existing client
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a client from configuration
    ///
    /// Static credentials and region are used when configured; anything left
    /// unset falls back to the AWS default provider chain. An endpoint
    /// override switches to path-style addressing for S3-compatible stores.
    pub async fn from_config(config: &S3Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let (Some(key_id), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                key_id.clone(),
                secret.clone(),
                None,
                None,
                STATIC_CREDENTIALS_PROVIDER,
            ));
        }
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint.clone());
        }

        let sdk_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.endpoint_url.is_some())
            .build();

        debug!("Created S3 client for bucket '{}'", config.bucket);
        Self::new(Client::from_conf(s3_config), config.bucket.clone())
    }

    /// Target bucket
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> std::result::Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map(|_| ())
            .map_err(|e| storage_error(key, &e))
    }

    fn location(&self) -> String {
        format!("s3://{}", self.bucket)
    }
}

/// Convert an SDK error into a [`StorageError`]
///
/// Prefers the provider's own error message; falls back to the full error
/// chain when the response carried none (timeouts, dispatch failures).
pub(crate) fn storage_error<E>(key: &str, err: &E) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let message = err
        .message()
        .map(str::to_owned)
        .unwrap_or_else(|| DisplayErrorContext(err).to_string());

    StorageError::PutFailed {
        key: key.to_string(),
        code: err.code().map(str::to_owned),
        message,
    }
}
