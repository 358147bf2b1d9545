//! Permission catalogue rows.

use gemeinde_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the seeded `permissions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PermissionRow {
    pub id: DbId,
    pub name: String,
    pub category: String,
    pub description: String,
}
