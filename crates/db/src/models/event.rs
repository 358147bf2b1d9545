//! Calendar event model and DTOs.

use gemeinde_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Option<Timestamp>,
    pub all_day: bool,
    pub category: Option<String>,
    pub verein_id: Option<DbId>,
    pub image_key: Option<String>,
    pub is_published: bool,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateEvent {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Option<Timestamp>,
    #[serde(default)]
    pub all_day: bool,
    pub category: Option<String>,
    pub verein_id: Option<DbId>,
    pub image_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub all_day: Option<bool>,
    pub category: Option<String>,
    pub verein_id: Option<DbId>,
    pub image_key: Option<String>,
    #[serde(default)]
    pub clear_location: bool,
    /// Make the event open-ended (takes precedence over `ends_at`).
    #[serde(default)]
    pub clear_ends_at: bool,
    #[serde(default)]
    pub clear_image_key: bool,
}

/// Listing filter. `None` fields do not restrict the result.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Events still running at or after this instant.
    pub from: Option<Timestamp>,
    /// Events starting at or before this instant.
    pub to: Option<Timestamp>,
    pub category: Option<String>,
    pub verein_id: Option<DbId>,
    pub published_only: bool,
    pub limit: i64,
    pub offset: i64,
}
