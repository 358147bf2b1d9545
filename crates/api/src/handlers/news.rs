//! Handlers for the `/news` resource, including the pinned slots.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gemeinde_core::error::CoreError;
use gemeinde_core::media::validate_content_key;
use gemeinde_core::permissions::names;
use gemeinde_core::pinning::{plan_move, plan_pin, plan_reorder, plan_unpin, PinDirection};
use gemeinde_core::types::DbId;
use gemeinde_core::validation::{
    optional_text, require_text, slugify, validate_slug, MAX_BODY_LENGTH, MAX_TITLE_LENGTH,
};
use gemeinde_db::models::news::{CreateNews, News, UpdateNews};
use gemeinde_db::repositories::NewsRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::query::{PaginationParams, PublishRequest};
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum length of the teaser text.
const MAX_SUMMARY_LENGTH: usize = 500;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /news/{id}/pin/move`.
#[derive(Debug, Deserialize)]
pub struct MovePinRequest {
    pub direction: PinDirection,
}

/// Request body for `PUT /news/pinned`.
#[derive(Debug, Deserialize)]
pub struct ReorderPinsRequest {
    pub ids: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "News", id })
}

async fn load(state: &AppState, id: DbId) -> AppResult<News> {
    NewsRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Drafts are visible to anyone who may edit news.
fn sees_drafts(viewer: &MaybeAuthUser) -> bool {
    viewer.can(names::NEWS_UPDATE)
}

fn resolve_slug(slug: Option<&str>, title: &str) -> AppResult<String> {
    let slug = match slug.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => slugify(title),
    };
    if slug.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot derive a slug from the title; please provide one".into(),
        )));
    }
    validate_slug(&slug)?;
    Ok(slug)
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// GET /api/v1/news
///
/// Pinned items first (by slot), then newest.
pub async fn list_news(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<News>>>> {
    let (limit, offset) = params.resolve();
    let news = NewsRepo::list(&state.pool, !sees_drafts(&viewer), limit, offset).await?;
    Ok(Json(DataResponse { data: news }))
}

/// GET /api/v1/news/pinned
pub async fn list_pinned(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
) -> AppResult<Json<DataResponse<Vec<News>>>> {
    let mut pinned = NewsRepo::list_pinned(&state.pool).await?;
    if !sees_drafts(&viewer) {
        pinned.retain(|n| n.is_published);
    }
    Ok(Json(DataResponse { data: pinned }))
}

/// GET /api/v1/news/{id}
pub async fn get_news(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<News>>> {
    let news = load(&state, id).await?;
    if !news.is_published && !sees_drafts(&viewer) {
        return Err(not_found(id));
    }
    Ok(Json(DataResponse { data: news }))
}

/// GET /api/v1/news/by-slug/{slug}
pub async fn get_news_by_slug(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<News>>> {
    let news = NewsRepo::find_by_slug(&state.pool, &slug)
        .await?
        .filter(|n| n.is_published || sees_drafts(&viewer))
        .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;
    Ok(Json(DataResponse { data: news }))
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// POST /api/v1/news
///
/// The slug is derived from the title when omitted. Creating an already
/// published item also needs `news.publish`.
pub async fn create_news(
    State(state): State<AppState>,
    user: AuthUser,
    Json(mut input): Json<CreateNews>,
) -> AppResult<(StatusCode, Json<DataResponse<News>>)> {
    user.require(names::NEWS_CREATE)?;
    if input.is_published {
        user.require(names::NEWS_PUBLISH)?;
    }

    input.title = require_text("title", &input.title, MAX_TITLE_LENGTH)?;
    input.body = require_text("body", &input.body, MAX_BODY_LENGTH)?;
    input.summary = optional_text("summary", input.summary.as_deref(), MAX_SUMMARY_LENGTH)?;
    if let Some(key) = &input.image_key {
        validate_content_key(key)?;
    }
    let slug = resolve_slug(input.slug.as_deref(), &input.title)?;

    let news = NewsRepo::create(&state.pool, &input, &slug, user.user_id).await?;
    tracing::info!(news_id = news.id, slug = %news.slug, user_id = user.user_id, "News created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: news })))
}

/// PUT /api/v1/news/{id}
pub async fn update_news(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateNews>,
) -> AppResult<Json<DataResponse<News>>> {
    user.require(names::NEWS_UPDATE)?;
    let existing = load(&state, id).await?;

    if let Some(title) = &input.title {
        input.title = Some(require_text("title", title, MAX_TITLE_LENGTH)?);
    }
    if let Some(body) = &input.body {
        input.body = Some(require_text("body", body, MAX_BODY_LENGTH)?);
    }
    if let Some(summary) = &input.summary {
        input.summary = optional_text("summary", Some(summary.as_str()), MAX_SUMMARY_LENGTH)?;
    }
    if let Some(slug) = &input.slug {
        validate_slug(slug)?;
    }
    if let Some(key) = &input.image_key {
        validate_content_key(key)?;
    }

    let news = NewsRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(old) = existing.image_key.as_deref() {
        if news.image_key.as_deref() != Some(old) {
            state.release_content_blob(old).await;
        }
    }

    tracing::info!(news_id = id, user_id = user.user_id, "News updated");
    Ok(Json(DataResponse { data: news }))
}

/// POST /api/v1/news/{id}/publish
pub async fn publish_news(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<PublishRequest>,
) -> AppResult<Json<DataResponse<News>>> {
    user.require(names::NEWS_PUBLISH)?;
    let news = NewsRepo::set_published(&state.pool, id, input.published)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(news_id = id, published = input.published, "News publication changed");
    Ok(Json(DataResponse { data: news }))
}

/// DELETE /api/v1/news/{id}
///
/// Frees the item's pinned slot, if any.
pub async fn delete_news(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    user.require(names::NEWS_DELETE)?;
    let deleted = NewsRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(key) = deleted.image_key.as_deref() {
        state.release_content_blob(key).await;
    }

    tracing::info!(news_id = id, was_pinned = deleted.is_pinned, "News deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Pinning
// ---------------------------------------------------------------------------

/// POST /api/v1/news/{id}/pin
///
/// Appends the item to the pinned list. 409 when three are already pinned.
pub async fn pin_news(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<News>>>> {
    user.require(names::NEWS_PIN)?;
    load(&state, id).await?;

    let pinned = NewsRepo::update_pins(&state.pool, |current| plan_pin(current, id)).await?;
    tracing::info!(news_id = id, pinned = pinned.len(), "News pinned");
    Ok(Json(DataResponse { data: pinned }))
}

/// DELETE /api/v1/news/{id}/pin
pub async fn unpin_news(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<News>>>> {
    user.require(names::NEWS_PIN)?;
    load(&state, id).await?;

    let pinned =
        NewsRepo::update_pins(&state.pool, |current| Ok(plan_unpin(current, id))).await?;
    tracing::info!(news_id = id, "News unpinned");
    Ok(Json(DataResponse { data: pinned }))
}

/// POST /api/v1/news/{id}/pin/move
pub async fn move_pin(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<MovePinRequest>,
) -> AppResult<Json<DataResponse<Vec<News>>>> {
    user.require(names::NEWS_PIN)?;

    let pinned =
        NewsRepo::update_pins(&state.pool, |current| plan_move(current, id, input.direction))
            .await?;
    tracing::info!(news_id = id, direction = ?input.direction, "Pinned news moved");
    Ok(Json(DataResponse { data: pinned }))
}

/// PUT /api/v1/news/pinned
///
/// Replace the pinned order. `ids` must be exactly the pinned items.
pub async fn reorder_pins(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ReorderPinsRequest>,
) -> AppResult<Json<DataResponse<Vec<News>>>> {
    user.require(names::NEWS_PIN)?;

    let pinned =
        NewsRepo::update_pins(&state.pool, |current| plan_reorder(current, &input.ids)).await?;
    tracing::info!(order = ?input.ids, "Pinned news reordered");
    Ok(Json(DataResponse { data: pinned }))
}
