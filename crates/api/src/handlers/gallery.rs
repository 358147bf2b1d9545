//! Handlers for the `/gallery` resource (albums and their images).

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use gemeinde_core::error::CoreError;
use gemeinde_core::media::GALLERY_PREFIX;
use gemeinde_core::permissions::names;
use gemeinde_core::types::DbId;
use gemeinde_core::validation::{
    optional_text, require_text, slugify, validate_slug, MAX_TITLE_LENGTH,
};
use gemeinde_db::models::gallery::{
    Album, CreateAlbum, CreateGalleryImage, GalleryImage, UpdateAlbum, UpdateGalleryImage,
};
use gemeinde_db::repositories::{AlbumRepo, GalleryImageRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::upload::{store_image, UploadForm};

/// Maximum length of an image caption.
const MAX_CAPTION_LENGTH: usize = 500;

/// An album with its images in display order.
#[derive(Debug, Serialize)]
pub struct AlbumDetail {
    #[serde(flatten)]
    pub album: Album,
    pub images: Vec<GalleryImage>,
}

fn album_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Album", id })
}

fn image_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "GalleryImage", id })
}

/// Unpublished albums are visible to anyone who may edit the gallery.
fn sees_drafts(viewer: &MaybeAuthUser) -> bool {
    viewer.can(names::GALLERY_UPDATE)
}

// ---------------------------------------------------------------------------
// Albums
// ---------------------------------------------------------------------------

/// GET /api/v1/gallery/albums
pub async fn list_albums(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
) -> AppResult<Json<DataResponse<Vec<Album>>>> {
    let albums = AlbumRepo::list(&state.pool, !sees_drafts(&viewer)).await?;
    Ok(Json(DataResponse { data: albums }))
}

/// GET /api/v1/gallery/albums/{id}
pub async fn get_album(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AlbumDetail>>> {
    let album = AlbumRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|a| a.is_published || sees_drafts(&viewer))
        .ok_or_else(|| album_not_found(id))?;
    let images = GalleryImageRepo::list_for_album(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: AlbumDetail { album, images },
    }))
}

/// POST /api/v1/gallery/albums
pub async fn create_album(
    State(state): State<AppState>,
    user: AuthUser,
    Json(mut input): Json<CreateAlbum>,
) -> AppResult<(StatusCode, Json<DataResponse<Album>>)> {
    user.require(names::GALLERY_CREATE)?;

    input.title = require_text("title", &input.title, MAX_TITLE_LENGTH)?;
    let slug = match input.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => slugify(&input.title),
    };
    validate_slug(&slug)?;

    let album = AlbumRepo::create(&state.pool, &input, &slug).await?;
    tracing::info!(album_id = album.id, user_id = user.user_id, "Album created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: album })))
}

/// PUT /api/v1/gallery/albums/{id}
///
/// A `cover_image_id` from another album is ignored.
pub async fn update_album(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateAlbum>,
) -> AppResult<Json<DataResponse<Album>>> {
    user.require(names::GALLERY_UPDATE)?;

    if let Some(title) = &input.title {
        input.title = Some(require_text("title", title, MAX_TITLE_LENGTH)?);
    }
    if let Some(slug) = &input.slug {
        validate_slug(slug)?;
    }

    let album = AlbumRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| album_not_found(id))?;

    tracing::info!(album_id = id, user_id = user.user_id, "Album updated");
    Ok(Json(DataResponse { data: album }))
}

/// DELETE /api/v1/gallery/albums/{id}
///
/// Removes the album, its image rows and every stored image.
pub async fn delete_album(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    user.require(names::GALLERY_DELETE)?;

    let keys = AlbumRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| album_not_found(id))?;
    for key in &keys {
        state.discard_blob(key).await;
    }

    tracing::info!(album_id = id, images = keys.len(), "Album deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// POST /api/v1/gallery/albums/{id}/images
///
/// Multipart form with a required `file` and an optional `caption`.
pub async fn upload_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(album_id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<GalleryImage>>)> {
    user.require(names::GALLERY_UPLOAD)?;

    AlbumRepo::find_by_id(&state.pool, album_id)
        .await?
        .ok_or_else(|| album_not_found(album_id))?;

    let form = UploadForm::read(multipart).await?;
    let caption = optional_text("caption", form.field("caption"), MAX_CAPTION_LENGTH)?;
    let bytes = form.require_file()?.clone();

    let stored = store_image(&state, bytes, GALLERY_PREFIX, Some(&album_id.to_string())).await?;

    let input = CreateGalleryImage {
        album_id,
        blob_key: stored.key.clone(),
        content_type: stored.info.content_type.to_string(),
        size_bytes: stored.size_bytes as i64,
        width: stored.info.width as i32,
        height: stored.info.height as i32,
        caption,
    };

    let image = match GalleryImageRepo::create(&state.pool, &input).await {
        Ok(image) => image,
        Err(e) => {
            // The album may have been deleted meanwhile; don't orphan the blob.
            state.discard_blob(&stored.key).await;
            return Err(e.into());
        }
    };

    tracing::info!(image_id = image.id, album_id, user_id = user.user_id, "Gallery image uploaded");
    Ok((StatusCode::CREATED, Json(DataResponse { data: image })))
}

/// PUT /api/v1/gallery/images/{id}
pub async fn update_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateGalleryImage>,
) -> AppResult<Json<DataResponse<GalleryImage>>> {
    user.require(names::GALLERY_UPDATE)?;

    if let Some(caption) = &input.caption {
        input.caption = optional_text("caption", Some(caption.as_str()), MAX_CAPTION_LENGTH)?;
    }

    let image = GalleryImageRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| image_not_found(id))?;
    Ok(Json(DataResponse { data: image }))
}

/// DELETE /api/v1/gallery/images/{id}
pub async fn delete_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    user.require(names::GALLERY_DELETE)?;

    let image = GalleryImageRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| image_not_found(id))?;
    state.discard_blob(&image.blob_key).await;

    tracing::info!(image_id = id, album_id = image.album_id, "Gallery image deleted");
    Ok(StatusCode::NO_CONTENT)
}
