//! Portrait submission model and DTOs.

use gemeinde_core::error::CoreError;
use gemeinde_core::portrait::PortraitStatus;
use gemeinde_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `portraits` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Portrait {
    pub id: DbId,
    pub name: String,
    pub title: String,
    pub body: String,
    /// Only exposed to admins; see [`PublicPortrait`].
    pub contact_email: Option<String>,
    pub image_key: Option<String>,
    pub status: String,
    pub review_note: Option<String>,
    pub reviewed_by: Option<DbId>,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Portrait {
    pub fn status(&self) -> Result<PortraitStatus, CoreError> {
        PortraitStatus::parse(&self.status)
    }
}

/// The public view of an approved portrait.
#[derive(Debug, Clone, Serialize)]
pub struct PublicPortrait {
    pub id: DbId,
    pub name: String,
    pub title: String,
    pub body: String,
    pub image_key: Option<String>,
    pub created_at: Timestamp,
}

impl From<Portrait> for PublicPortrait {
    fn from(p: Portrait) -> Self {
        Self {
            id: p.id,
            name: p.name,
            title: p.title,
            body: p.body,
            image_key: p.image_key,
            created_at: p.created_at,
        }
    }
}

/// Insert DTO built by the submission handler from multipart fields.
#[derive(Debug, Default)]
pub struct CreatePortrait {
    pub name: String,
    pub title: String,
    pub body: String,
    pub contact_email: Option<String>,
    pub image_key: Option<String>,
}
