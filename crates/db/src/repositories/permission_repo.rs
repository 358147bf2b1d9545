//! Repository for the seeded `permissions` catalogue.

use sqlx::PgPool;

use crate::models::permission::PermissionRow;

/// Read-only access to the permission catalogue.
pub struct PermissionRepo;

impl PermissionRepo {
    /// List all permissions grouped by category, in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<PermissionRow>, sqlx::Error> {
        sqlx::query_as::<_, PermissionRow>(
            "SELECT id, name, category, description FROM permissions ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
    }
}
