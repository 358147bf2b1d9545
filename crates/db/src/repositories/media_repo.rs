//! Reference checks for content images shared by news and events.

use sqlx::PgPool;

/// Queries across the tables that attach content images.
pub struct MediaRepo;

impl MediaRepo {
    /// Whether any news item or event still uses `image_key`.
    pub async fn is_content_key_referenced(
        pool: &PgPool,
        image_key: &str,
    ) -> Result<bool, sqlx::Error> {
        let (referenced,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM news WHERE image_key = $1)
                 OR EXISTS (SELECT 1 FROM events WHERE image_key = $1)",
        )
        .bind(image_key)
        .fetch_one(pool)
        .await?;
        Ok(referenced)
    }
}
