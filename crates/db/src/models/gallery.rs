//! Photo gallery models and DTOs.

use gemeinde_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from `gallery_albums`, plus its image count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Album {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub cover_image_id: Option<DbId>,
    pub is_published: bool,
    pub image_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateAlbum {
    pub title: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAlbum {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub is_published: Option<bool>,
    pub cover_image_id: Option<DbId>,
}

/// A row from `gallery_images`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GalleryImage {
    pub id: DbId,
    pub album_id: DbId,
    pub blob_key: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub width: i32,
    pub height: i32,
    pub caption: Option<String>,
    pub sort_order: i32,
    pub created_at: Timestamp,
}

/// Insert DTO built by the upload handler after the blob is stored.
#[derive(Debug)]
pub struct CreateGalleryImage {
    pub album_id: DbId,
    pub blob_key: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub width: i32,
    pub height: i32,
    pub caption: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateGalleryImage {
    pub caption: Option<String>,
    pub sort_order: Option<i32>,
}
