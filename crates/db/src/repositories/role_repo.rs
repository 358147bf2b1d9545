//! Repository for the `roles` table.

use gemeinde_core::types::DbId;
use sqlx::PgPool;

use crate::models::role::{CreateRole, Role, UpdateRole};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, permissions, created_at, updated_at";

/// Provides CRUD operations for roles.
pub struct RoleRepo;

impl RoleRepo {
    /// Insert a new role, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateRole) -> Result<Role, sqlx::Error> {
        let query = format!(
            "INSERT INTO roles (name, description, permissions)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Role>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.permissions)
            .fetch_one(pool)
            .await
    }

    /// Find a role by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE id = $1");
        sqlx::query_as::<_, Role>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a role by name (case-sensitive).
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE name = $1");
        sqlx::query_as::<_, Role>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all roles ordered by ID ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles ORDER BY id ASC");
        sqlx::query_as::<_, Role>(&query).fetch_all(pool).await
    }

    /// Update a role. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRole,
    ) -> Result<Option<Role>, sqlx::Error> {
        let query = format!(
            "UPDATE roles SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                permissions = COALESCE($4, permissions)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Role>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.permissions)
            .fetch_optional(pool)
            .await
    }

    /// Delete a role. Users holding it fall back to no role.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
