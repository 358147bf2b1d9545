//! Repository for the `vereine` table.

use gemeinde_core::types::DbId;
use sqlx::PgPool;

use crate::models::verein::{UpdateVerein, Verein};

const COLUMNS: &str = "id, name, slug, description, website, created_at, updated_at";

/// Provides CRUD operations for Vereine.
pub struct VereinRepo;

impl VereinRepo {
    /// Insert a Verein. `slug` is already resolved by the caller.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        slug: &str,
        description: Option<&str>,
        website: Option<&str>,
    ) -> Result<Verein, sqlx::Error> {
        let query = format!(
            "INSERT INTO vereine (name, slug, description, website)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Verein>(&query)
            .bind(name)
            .bind(slug)
            .bind(description)
            .bind(website)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Verein>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vereine WHERE id = $1");
        sqlx::query_as::<_, Verein>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all Vereine alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<Verein>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vereine ORDER BY name ASC");
        sqlx::query_as::<_, Verein>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVerein,
    ) -> Result<Option<Verein>, sqlx::Error> {
        let query = format!(
            "UPDATE vereine SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                website = COALESCE($5, website)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Verein>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.website)
            .fetch_optional(pool)
            .await
    }

    /// Delete a Verein; users, events and contacts referencing it are detached.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vereine WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
