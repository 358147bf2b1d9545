//! Handlers for the `/events` resource.
//!
//! Listing and reading are public (published events only, unless the caller
//! holds `events.view`). Writes require the matching `events.*` permission
//! and are confined to the caller's Verein when they have one.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gemeinde_core::error::CoreError;
use gemeinde_core::media::validate_content_key;
use gemeinde_core::permissions::names;
use gemeinde_core::types::{DbId, Timestamp};
use gemeinde_core::validation::{require_text, validate_date_range, MAX_TITLE_LENGTH};
use gemeinde_db::models::event::{CreateEvent, Event, EventFilter, UpdateEvent};
use gemeinde_db::repositories::EventRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::query::{PaginationParams, PublishRequest};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /events`.
#[derive(Debug, Default, Deserialize)]
pub struct EventListParams {
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub category: Option<String>,
    pub verein_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Event", id })
}

async fn load(state: &AppState, id: DbId) -> AppResult<Event> {
    EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// GET /api/v1/events
pub async fn list_events(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Query(params): Query<EventListParams>,
) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();

    let filter = EventFilter {
        from: params.from,
        to: params.to,
        category: params.category,
        verein_id: params.verein_id,
        published_only: !viewer.can(names::EVENTS_VIEW),
        limit,
        offset,
    };

    let events = EventRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Event>>> {
    let event = load(&state, id).await?;
    if !event.is_published && !viewer.can(names::EVENTS_VIEW) {
        return Err(not_found(id));
    }
    Ok(Json(DataResponse { data: event }))
}

/// POST /api/v1/events
pub async fn create_event(
    State(state): State<AppState>,
    user: AuthUser,
    Json(mut input): Json<CreateEvent>,
) -> AppResult<(StatusCode, Json<DataResponse<Event>>)> {
    user.require(names::EVENTS_CREATE)?;

    input.verein_id = user.default_verein(input.verein_id);
    user.require_verein(input.verein_id)?;

    input.title = require_text("title", &input.title, MAX_TITLE_LENGTH)?;
    validate_date_range(input.starts_at, input.ends_at)?;
    if let Some(key) = &input.image_key {
        validate_content_key(key)?;
    }

    let event = EventRepo::create(&state.pool, &input, user.user_id).await?;
    tracing::info!(event_id = event.id, user_id = user.user_id, "Event created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// PUT /api/v1/events/{id}
pub async fn update_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateEvent>,
) -> AppResult<Json<DataResponse<Event>>> {
    user.require(names::EVENTS_UPDATE)?;

    let existing = load(&state, id).await?;
    user.require_verein(existing.verein_id)?;
    if input.verein_id.is_some() {
        user.require_verein(input.verein_id)?;
    }

    if let Some(title) = &input.title {
        input.title = Some(require_text("title", title, MAX_TITLE_LENGTH)?);
    }
    let ends_at = if input.clear_ends_at {
        None
    } else {
        input.ends_at.or(existing.ends_at)
    };
    validate_date_range(input.starts_at.unwrap_or(existing.starts_at), ends_at)?;
    if let Some(key) = &input.image_key {
        validate_content_key(key)?;
    }

    let event = EventRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(old) = existing.image_key.as_deref() {
        if event.image_key.as_deref() != Some(old) {
            state.release_content_blob(old).await;
        }
    }

    tracing::info!(event_id = id, user_id = user.user_id, "Event updated");
    Ok(Json(DataResponse { data: event }))
}

/// POST /api/v1/events/{id}/publish
pub async fn publish_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<PublishRequest>,
) -> AppResult<Json<DataResponse<Event>>> {
    user.require(names::EVENTS_PUBLISH)?;
    let existing = load(&state, id).await?;
    user.require_verein(existing.verein_id)?;

    let event = EventRepo::set_published(&state.pool, id, input.published)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(event_id = id, published = input.published, "Event publication changed");
    Ok(Json(DataResponse { data: event }))
}

/// DELETE /api/v1/events/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    user.require(names::EVENTS_DELETE)?;
    let existing = load(&state, id).await?;
    user.require_verein(existing.verein_id)?;

    let deleted = EventRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if let Some(key) = deleted.image_key.as_deref() {
        state.release_content_blob(key).await;
    }

    tracing::info!(event_id = id, user_id = user.user_id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}
