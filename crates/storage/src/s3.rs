//! [`BlobStore`] backed by an S3-compatible service.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;

use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::{Blob, BlobStore};

/// Fallback when an object was stored without a content type.
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    /// Build a client from `config`.
    ///
    /// Explicit keys take precedence; otherwise the default AWS credential
    /// chain is used. Path-style addressing is always enabled so MinIO works
    /// without wildcard DNS.
    pub async fn connect(config: &StorageConfig) -> Result<Self, StorageError> {
        if config.bucket.is_empty() {
            return Err(StorageError::Config("bucket name is empty".into()));
        }
        let region = Region::new(config.region.clone());

        let mut builder = match (&config.access_key, &config.secret_key) {
            (Some(access), Some(secret)) => aws_sdk_s3::config::Builder::new()
                .behavior_version(BehaviorVersion::latest())
                .region(region)
                .credentials_provider(Credentials::new(
                    access.clone(),
                    secret.clone(),
                    None,
                    None,
                    "gemeinde-env",
                )),
            _ => {
                let shared = aws_config::defaults(BehaviorVersion::latest())
                    .region(region)
                    .load()
                    .await;
                aws_sdk_s3::config::Builder::from(&shared)
            }
        };

        builder = builder.force_path_style(true);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        tracing::info!(
            bucket = %config.bucket,
            endpoint = config.endpoint.as_deref().unwrap_or("aws"),
            "S3 blob store configured"
        );

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
        })
    }
}

fn backend_error(op: &str, key: &str, err: impl std::error::Error) -> StorageError {
    StorageError::Backend(format!("{op} {key}: {}", DisplayErrorContext(err)))
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), StorageError> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| backend_error("put", key, e))?;

        tracing::debug!(key, size, "Blob stored");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Blob, StorageError> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|s| s.is_no_such_key()) => {
                return Err(StorageError::NotFound(key.to_string()));
            }
            Err(e) => return Err(backend_error("get", key, e)),
        };

        let content_type = output
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| backend_error("read", key, e))?
            .into_bytes();

        Ok(Blob {
            bytes,
            content_type,
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| backend_error("delete", key, e))?;

        tracing::debug!(key, "Blob deleted");
        Ok(())
    }
}
