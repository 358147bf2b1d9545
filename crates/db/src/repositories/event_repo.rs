//! Repository for the `events` table.

use gemeinde_core::types::DbId;
use sqlx::PgPool;

use crate::models::event::{CreateEvent, Event, EventFilter, UpdateEvent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, location, starts_at, ends_at, all_day, category, \
                       verein_id, image_key, is_published, created_by, created_at, updated_at";

/// Provides CRUD operations for calendar events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new (unpublished) event, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateEvent,
        created_by: DbId,
    ) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events
                (title, description, location, starts_at, ends_at, all_day, category,
                 verein_id, image_key, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.location)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.all_day)
            .bind(&input.category)
            .bind(input.verein_id)
            .bind(&input.image_key)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List events matching `filter`, soonest first.
    ///
    /// An event with no end counts as ending when it starts.
    pub async fn list(pool: &PgPool, filter: &EventFilter) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE ($1::timestamptz IS NULL OR COALESCE(ends_at, starts_at) >= $1)
               AND ($2::timestamptz IS NULL OR starts_at <= $2)
               AND ($3::text IS NULL OR category = $3)
               AND ($4::bigint IS NULL OR verein_id = $4)
               AND (NOT $5 OR is_published)
             ORDER BY starts_at ASC, id ASC
             LIMIT $6 OFFSET $7"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(filter.from)
            .bind(filter.to)
            .bind(&filter.category)
            .bind(filter.verein_id)
            .bind(filter.published_only)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Update an event. Only non-`None` fields in `input` are applied;
    /// the `clear_*` flags null their column.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                location = CASE WHEN $11 THEN NULL ELSE COALESCE($4, location) END,
                starts_at = COALESCE($5, starts_at),
                ends_at = CASE WHEN $12 THEN NULL ELSE COALESCE($6, ends_at) END,
                all_day = COALESCE($7, all_day),
                category = COALESCE($8, category),
                verein_id = COALESCE($9, verein_id),
                image_key = CASE WHEN $13 THEN NULL ELSE COALESCE($10, image_key) END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.location)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.all_day)
            .bind(&input.category)
            .bind(input.verein_id)
            .bind(&input.image_key)
            .bind(input.clear_location)
            .bind(input.clear_ends_at)
            .bind(input.clear_image_key)
            .fetch_optional(pool)
            .await
    }

    /// Publish or unpublish an event.
    pub async fn set_published(
        pool: &PgPool,
        id: DbId,
        published: bool,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET is_published = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(published)
            .fetch_optional(pool)
            .await
    }

    /// Delete an event, returning the removed row so its image can be cleaned up.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("DELETE FROM events WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
