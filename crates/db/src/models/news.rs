//! News article model and DTOs.

use gemeinde_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `news` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct News {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub body: String,
    pub image_key: Option<String>,
    pub is_published: bool,
    pub published_at: Option<Timestamp>,
    pub is_pinned: bool,
    /// 1..=3 while pinned, `None` otherwise.
    pub pin_order: Option<i16>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateNews {
    pub title: String,
    /// Derived from `title` when omitted.
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub body: String,
    pub image_key: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateNews {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub image_key: Option<String>,
    /// Remove the teaser (takes precedence over `summary`).
    #[serde(default)]
    pub clear_summary: bool,
    /// Detach the header image (takes precedence over `image_key`).
    #[serde(default)]
    pub clear_image_key: bool,
}
