//! Repository for the `news` table, including the pinned-news slots.

use gemeinde_core::error::CoreError;
use gemeinde_core::pinning::{pin_orders, plan_unpin};
use gemeinde_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::news::{CreateNews, News, UpdateNews};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, slug, summary, body, image_key, is_published, published_at, \
                       is_pinned, pin_order, created_by, created_at, updated_at";

/// Advisory lock key serializing every change to the pinned set.
const PIN_LOCK_KEY: i64 = 0x6e65_7773_7069_6e73; // "newspins"

/// Homepage ordering: pinned first by slot, then newest.
const LIST_ORDER: &str =
    "is_pinned DESC, pin_order ASC NULLS LAST, COALESCE(published_at, created_at) DESC, id DESC";

/// Failure of a pinned-set update.
#[derive(Debug, thiserror::Error)]
pub enum PinUpdateError {
    /// The requested change is not allowed (e.g. a fourth pin).
    #[error(transparent)]
    Rejected(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Provides CRUD and pinning operations for news.
pub struct NewsRepo;

impl NewsRepo {
    /// Insert a new news item. `slug` is already resolved by the caller.
    pub async fn create(
        pool: &PgPool,
        input: &CreateNews,
        slug: &str,
        created_by: DbId,
    ) -> Result<News, sqlx::Error> {
        let query = format!(
            "INSERT INTO news
                (title, slug, summary, body, image_key, is_published, published_at, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, CASE WHEN $6 THEN NOW() END, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, News>(&query)
            .bind(&input.title)
            .bind(slug)
            .bind(&input.summary)
            .bind(&input.body)
            .bind(&input.image_key)
            .bind(input.is_published)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<News>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM news WHERE id = $1");
        sqlx::query_as::<_, News>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<News>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM news WHERE slug = $1");
        sqlx::query_as::<_, News>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List news in homepage order.
    pub async fn list(
        pool: &PgPool,
        published_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<News>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM news
             WHERE (NOT $1 OR is_published)
             ORDER BY {LIST_ORDER}
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, News>(&query)
            .bind(published_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// The pinned news items ordered by slot.
    pub async fn list_pinned(pool: &PgPool) -> Result<Vec<News>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM news WHERE is_pinned ORDER BY pin_order ASC");
        sqlx::query_as::<_, News>(&query).fetch_all(pool).await
    }

    /// Update a news item. Only non-`None` fields in `input` are applied;
    /// the `clear_*` flags null their column.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNews,
    ) -> Result<Option<News>, sqlx::Error> {
        let query = format!(
            "UPDATE news SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                summary = CASE WHEN $7 THEN NULL ELSE COALESCE($4, summary) END,
                body = COALESCE($5, body),
                image_key = CASE WHEN $8 THEN NULL ELSE COALESCE($6, image_key) END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, News>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.summary)
            .bind(&input.body)
            .bind(&input.image_key)
            .bind(input.clear_summary)
            .bind(input.clear_image_key)
            .fetch_optional(pool)
            .await
    }

    /// Publish or unpublish. The first publication stamps `published_at`.
    pub async fn set_published(
        pool: &PgPool,
        id: DbId,
        published: bool,
    ) -> Result<Option<News>, sqlx::Error> {
        let query = format!(
            "UPDATE news SET
                is_published = $2,
                published_at = CASE WHEN $2 THEN COALESCE(published_at, NOW()) ELSE published_at END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, News>(&query)
            .bind(id)
            .bind(published)
            .fetch_optional(pool)
            .await
    }

    /// Replace the pinned set with the ordering `plan` computes from the
    /// current one, atomically.
    ///
    /// `plan` receives the pinned ids ordered by slot and returns the new
    /// ordering (see `gemeinde_core::pinning`). Returns the pinned items
    /// after the change.
    pub async fn update_pins<F>(pool: &PgPool, plan: F) -> Result<Vec<News>, PinUpdateError>
    where
        F: FnOnce(&[DbId]) -> Result<Vec<DbId>, CoreError>,
    {
        let mut tx = pool.begin().await?;

        let current = Self::lock_pinned_ids(&mut *tx).await?;
        let next = plan(&current)?;
        if next != current {
            Self::write_pins(&mut *tx, &next).await?;
        }

        let query =
            format!("SELECT {COLUMNS} FROM news WHERE is_pinned ORDER BY pin_order ASC");
        let pinned = sqlx::query_as::<_, News>(&query)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(pinned)
    }

    /// Delete a news item, closing the gap in the pinned slots if it was pinned.
    ///
    /// Returns the removed row.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<News>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current = Self::lock_pinned_ids(&mut *tx).await?;

        let query = format!("DELETE FROM news WHERE id = $1 RETURNING {COLUMNS}");
        let deleted = sqlx::query_as::<_, News>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        if deleted.as_ref().is_some_and(|n| n.is_pinned) {
            Self::write_pins(&mut *tx, &plan_unpin(&current, id)).await?;
        }

        tx.commit().await?;
        Ok(deleted)
    }

    /// Take the pin lock for this transaction and read the pinned ids by slot.
    async fn lock_pinned_ids(conn: &mut PgConnection) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(PIN_LOCK_KEY)
            .execute(&mut *conn)
            .await?;

        let rows: Vec<(DbId,)> =
            sqlx::query_as("SELECT id FROM news WHERE is_pinned ORDER BY pin_order ASC")
                .fetch_all(&mut *conn)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Clear every slot, then assign `plan` to slots 1..=n.
    ///
    /// Clearing first keeps the unique slot index satisfied during swaps.
    async fn write_pins(conn: &mut PgConnection, plan: &[DbId]) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE news SET is_pinned = false, pin_order = NULL WHERE is_pinned")
            .execute(&mut *conn)
            .await?;

        for (id, order) in pin_orders(plan) {
            sqlx::query("UPDATE news SET is_pinned = true, pin_order = $2 WHERE id = $1")
                .bind(id)
                .bind(order)
                .execute(&mut *conn)
                .await?;
        }

        tracing::debug!(pinned = ?plan, "News pin slots rewritten");
        Ok(())
    }
}
