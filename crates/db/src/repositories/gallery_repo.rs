//! Repositories for `gallery_albums` and `gallery_images`.

use gemeinde_core::types::DbId;
use sqlx::PgPool;

use crate::models::gallery::{
    Album, CreateAlbum, CreateGalleryImage, GalleryImage, UpdateAlbum, UpdateGalleryImage,
};

/// Album columns plus a correlated image count, selected from `gallery_albums a`.
const ALBUM_COLUMNS: &str = "a.id, a.title, a.slug, a.description, a.cover_image_id, \
                             a.is_published, \
                             (SELECT COUNT(*) FROM gallery_images i WHERE i.album_id = a.id) AS image_count, \
                             a.created_at, a.updated_at";

const IMAGE_COLUMNS: &str = "id, album_id, blob_key, content_type, size_bytes, width, height, \
                             caption, sort_order, created_at";

/// Provides CRUD operations for gallery albums.
pub struct AlbumRepo;

impl AlbumRepo {
    /// Insert an album. `slug` is already resolved by the caller.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAlbum,
        slug: &str,
    ) -> Result<Album, sqlx::Error> {
        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO gallery_albums (title, slug, description, is_published)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&input.title)
        .bind(slug)
        .bind(&input.description)
        .bind(input.is_published)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Album>, sqlx::Error> {
        let query = format!("SELECT {ALBUM_COLUMNS} FROM gallery_albums a WHERE a.id = $1");
        sqlx::query_as::<_, Album>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List albums, newest first.
    pub async fn list(pool: &PgPool, published_only: bool) -> Result<Vec<Album>, sqlx::Error> {
        let query = format!(
            "SELECT {ALBUM_COLUMNS} FROM gallery_albums a
             WHERE (NOT $1 OR a.is_published)
             ORDER BY a.created_at DESC, a.id DESC"
        );
        sqlx::query_as::<_, Album>(&query)
            .bind(published_only)
            .fetch_all(pool)
            .await
    }

    /// Update an album. Only non-`None` fields in `input` are applied.
    ///
    /// A `cover_image_id` is only accepted if the image belongs to this album;
    /// otherwise the cover is left unchanged.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAlbum,
    ) -> Result<Option<Album>, sqlx::Error> {
        let updated = sqlx::query(
            "UPDATE gallery_albums SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                is_published = COALESCE($5, is_published),
                cover_image_id = COALESCE(
                    (SELECT i.id FROM gallery_images i WHERE i.id = $6 AND i.album_id = $1),
                    cover_image_id)
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(input.is_published)
        .bind(input.cover_image_id)
        .execute(pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    /// Delete an album and (by cascade) its image rows.
    ///
    /// Returns the blob keys of the removed images so the caller can delete
    /// the objects, or `None` if the album did not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Vec<String>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let keys: Vec<(String,)> =
            sqlx::query_as("SELECT blob_key FROM gallery_images WHERE album_id = $1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        let result = sqlx::query("DELETE FROM gallery_albums WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(keys.into_iter().map(|(k,)| k).collect()))
    }
}

/// Provides CRUD operations for gallery images.
pub struct GalleryImageRepo;

impl GalleryImageRepo {
    /// Insert an image at the end of its album.
    pub async fn create(
        pool: &PgPool,
        input: &CreateGalleryImage,
    ) -> Result<GalleryImage, sqlx::Error> {
        let query = format!(
            "INSERT INTO gallery_images
                (album_id, blob_key, content_type, size_bytes, width, height, caption, sort_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7,
                     (SELECT COALESCE(MAX(sort_order), -1) + 1 FROM gallery_images WHERE album_id = $1))
             RETURNING {IMAGE_COLUMNS}"
        );
        sqlx::query_as::<_, GalleryImage>(&query)
            .bind(input.album_id)
            .bind(&input.blob_key)
            .bind(&input.content_type)
            .bind(input.size_bytes)
            .bind(input.width)
            .bind(input.height)
            .bind(&input.caption)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<GalleryImage>, sqlx::Error> {
        let query = format!("SELECT {IMAGE_COLUMNS} FROM gallery_images WHERE id = $1");
        sqlx::query_as::<_, GalleryImage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the images of an album in display order.
    pub async fn list_for_album(
        pool: &PgPool,
        album_id: DbId,
    ) -> Result<Vec<GalleryImage>, sqlx::Error> {
        let query = format!(
            "SELECT {IMAGE_COLUMNS} FROM gallery_images
             WHERE album_id = $1
             ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, GalleryImage>(&query)
            .bind(album_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGalleryImage,
    ) -> Result<Option<GalleryImage>, sqlx::Error> {
        let query = format!(
            "UPDATE gallery_images SET
                caption = COALESCE($2, caption),
                sort_order = COALESCE($3, sort_order)
             WHERE id = $1
             RETURNING {IMAGE_COLUMNS}"
        );
        sqlx::query_as::<_, GalleryImage>(&query)
            .bind(id)
            .bind(&input.caption)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    /// Delete an image row, returning it so the blob can be removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<GalleryImage>, sqlx::Error> {
        let query = format!("DELETE FROM gallery_images WHERE id = $1 RETURNING {IMAGE_COLUMNS}");
        sqlx::query_as::<_, GalleryImage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
