//! Blob storage for uploaded media.
//!
//! - [`BlobStore`] -- the trait handlers depend on.
//! - [`S3BlobStore`] -- S3-compatible backend (MinIO in production).
//! - [`MemoryBlobStore`] -- process-local backend for tests and development.

pub mod config;
pub mod error;
pub mod memory;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;

pub use config::StorageConfig;
pub use error::StorageError;
pub use memory::MemoryBlobStore;
pub use s3::S3BlobStore;

/// A stored object together with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Key/value object storage.
///
/// Keys are `/`-separated paths such as `gallery/12/<uuid>.png`; callers
/// validate them before they reach a store.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any existing object.
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), StorageError>;

    /// Fetch the object at `key`. Missing objects are [`StorageError::NotFound`].
    async fn get(&self, key: &str) -> Result<Blob, StorageError>;

    /// Remove the object at `key`. Deleting a missing object succeeds.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}
