//! Image upload for news/event content and serving of stored media.

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use gemeinde_core::error::CoreError;
use gemeinde_core::media::{validate_object_key, CONTENT_PREFIX, PORTRAIT_PREFIX};
use gemeinde_core::permissions::names;
use gemeinde_db::repositories::PortraitRepo;
use gemeinde_storage::StorageError;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::upload::{store_image, UploadForm};

/// Keys are immutable, so public media can be cached aggressively.
const PUBLIC_CACHE: &str = "public, max-age=31536000, immutable";
const PRIVATE_CACHE: &str = "private, no-store";

/// Permissions that allow attaching images to news or events.
const UPLOAD_PERMISSIONS: &[&str] = &[
    names::NEWS_CREATE,
    names::NEWS_UPDATE,
    names::EVENTS_CREATE,
    names::EVENTS_UPDATE,
];

#[derive(Debug, Serialize)]
pub struct MediaUploadResponse {
    pub key: String,
    pub content_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub size_bytes: usize,
}

/// POST /api/v1/media
///
/// Stores a content image and returns its key for use as `image_key`.
pub async fn upload_media(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<MediaUploadResponse>>)> {
    if !UPLOAD_PERMISSIONS.iter().any(|p| user.principal.can(p)) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Uploading images requires a news or events permission".into(),
        )));
    }

    let form = UploadForm::read(multipart).await?;
    let bytes = form.require_file()?.clone();
    let stored = store_image(&state, bytes, CONTENT_PREFIX, None).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: MediaUploadResponse {
                key: stored.key,
                content_type: stored.info.content_type,
                width: stored.info.width,
                height: stored.info.height,
                size_bytes: stored.size_bytes,
            },
        }),
    ))
}

/// GET /api/v1/media/{*key}
///
/// Portrait photos are only served once the portrait is approved, except to
/// users holding `portraits.view`.
pub async fn get_media(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(key): Path<String>,
) -> AppResult<Response> {
    validate_object_key(&key)?;

    let mut cache = PUBLIC_CACHE;
    if key.starts_with(&format!("{PORTRAIT_PREFIX}/"))
        && !PortraitRepo::is_approved_image(&state.pool, &key).await?
    {
        if !viewer.can(names::PORTRAITS_VIEW) {
            return Err(AppError::Storage(StorageError::NotFound(key)));
        }
        cache = PRIVATE_CACHE;
    }

    let blob = state.blobs.get(&key).await?;
    Ok((
        [
            (header::CONTENT_TYPE, blob.content_type),
            (header::CACHE_CONTROL, cache.to_string()),
        ],
        blob.bytes,
    )
        .into_response())
}
