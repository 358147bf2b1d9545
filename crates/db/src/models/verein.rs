//! Verein (local club) entity model and DTOs.

use gemeinde_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Verein {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateVerein {
    pub name: String,
    /// Derived from `name` when omitted.
    pub slug: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateVerein {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
}
