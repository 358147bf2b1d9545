//! Repository for the `portraits` table.

use gemeinde_core::portrait::PortraitStatus;
use gemeinde_core::types::DbId;
use sqlx::PgPool;

use crate::models::portrait::{CreatePortrait, Portrait};

const COLUMNS: &str = "id, name, title, body, contact_email, image_key, status, review_note, \
                       reviewed_by, reviewed_at, created_at, updated_at";

/// Provides submission, review and listing operations for portraits.
pub struct PortraitRepo;

impl PortraitRepo {
    /// Insert a new submission in `pending` state.
    pub async fn create(pool: &PgPool, input: &CreatePortrait) -> Result<Portrait, sqlx::Error> {
        let query = format!(
            "INSERT INTO portraits (name, title, body, contact_email, image_key)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Portrait>(&query)
            .bind(&input.name)
            .bind(&input.title)
            .bind(&input.body)
            .bind(&input.contact_email)
            .bind(&input.image_key)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Portrait>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM portraits WHERE id = $1");
        sqlx::query_as::<_, Portrait>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether `image_key` is the photo of an approved portrait.
    pub async fn is_approved_image(pool: &PgPool, image_key: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM portraits WHERE image_key = $1 AND status = 'approved')",
        )
        .bind(image_key)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// List portraits, newest first, optionally restricted to one status.
    pub async fn list(
        pool: &PgPool,
        status: Option<PortraitStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Portrait>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM portraits
             WHERE ($1::text IS NULL OR status = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Portrait>(&query)
            .bind(status.map(PortraitStatus::as_str))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Record a review decision on a pending portrait.
    ///
    /// Returns `None` if the portrait does not exist or is no longer pending,
    /// so two reviewers cannot both decide.
    pub async fn review(
        pool: &PgPool,
        id: DbId,
        status: PortraitStatus,
        note: Option<&str>,
        reviewed_by: DbId,
    ) -> Result<Option<Portrait>, sqlx::Error> {
        let query = format!(
            "UPDATE portraits SET
                status = $2,
                review_note = $3,
                reviewed_by = $4,
                reviewed_at = NOW()
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Portrait>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(note)
            .bind(reviewed_by)
            .fetch_optional(pool)
            .await
    }

    /// Delete a portrait, returning it so its photo can be removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Portrait>, sqlx::Error> {
        let query = format!("DELETE FROM portraits WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Portrait>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
