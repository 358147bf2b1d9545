use std::sync::Arc;

use gemeinde_core::media::is_content_key;
use gemeinde_db::repositories::MediaRepo;
use gemeinde_storage::BlobStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: gemeinde_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Object storage for uploaded images.
    pub blobs: Arc<dyn BlobStore>,
}

impl AppState {
    /// Delete a blob whose database row is already gone.
    ///
    /// Failures only leave an orphaned object behind, so they are logged
    /// rather than surfaced to the client.
    pub async fn discard_blob(&self, key: &str) {
        if let Err(e) = self.blobs.delete(key).await {
            tracing::warn!(key, error = %e, "Failed to delete blob");
        }
    }

    /// Delete a content image a news item or event no longer uses, unless
    /// another news item or event still points at it.
    ///
    /// Keys outside the content prefix are never touched.
    pub async fn release_content_blob(&self, key: &str) {
        if !is_content_key(key) {
            tracing::warn!(key, "Refusing to release a non-content blob");
            return;
        }
        match MediaRepo::is_content_key_referenced(&self.pool, key).await {
            Ok(false) => self.discard_blob(key).await,
            Ok(true) => tracing::debug!(key, "Content blob still referenced; kept"),
            Err(e) => tracing::warn!(key, error = %e, "Could not check blob references; kept"),
        }
    }
}
