//! Contact directory model and DTOs.

use gemeinde_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contact {
    pub id: DbId,
    pub name: String,
    pub position: Option<String>,
    pub organization: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub verein_id: Option<DbId>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateContact {
    pub name: String,
    pub position: Option<String>,
    pub organization: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub verein_id: Option<DbId>,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateContact {
    pub name: Option<String>,
    pub position: Option<String>,
    pub organization: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub verein_id: Option<DbId>,
    pub sort_order: Option<i32>,
}
