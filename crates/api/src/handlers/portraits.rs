//! Handlers for resident portraits.
//!
//! Anyone may submit a portrait; it stays invisible until an admin with
//! `portraits.review` approves it. A decision cannot be changed afterwards.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gemeinde_core::error::CoreError;
use gemeinde_core::media::PORTRAIT_PREFIX;
use gemeinde_core::permissions::names;
use gemeinde_core::portrait::{validate_review, PortraitStatus, ReviewDecision};
use gemeinde_core::types::DbId;
use gemeinde_core::validation::{
    optional_text, require_text, validate_email, MAX_BODY_LENGTH, MAX_TITLE_LENGTH,
};
use gemeinde_db::models::portrait::{CreatePortrait, Portrait, PublicPortrait};
use gemeinde_db::repositories::PortraitRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::upload::{store_image, UploadForm};

const MAX_NOTE_LENGTH: usize = 1_000;

/// Query parameters for `GET /portraits/submissions`.
#[derive(Debug, Default, Deserialize)]
pub struct SubmissionListParams {
    pub status: Option<PortraitStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for `POST /portraits/{id}/review`.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub decision: ReviewDecision,
    pub note: Option<String>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Portrait", id })
}

async fn load(state: &AppState, id: DbId) -> AppResult<Portrait> {
    PortraitRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// POST /api/v1/portraits
///
/// Public multipart submission. Fields: `name`, `title`, `body`, optional
/// `contact_email` and an optional `file` photo.
pub async fn submit_portrait(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<PublicPortrait>>)> {
    let form = UploadForm::read(multipart).await?;

    let mut input = CreatePortrait {
        name: require_text("name", form.field("name").unwrap_or(""), MAX_TITLE_LENGTH)?,
        title: require_text("title", form.field("title").unwrap_or(""), MAX_TITLE_LENGTH)?,
        body: require_text("body", form.field("body").unwrap_or(""), MAX_BODY_LENGTH)?,
        contact_email: optional_text("contact_email", form.field("contact_email"), MAX_TITLE_LENGTH)?,
        image_key: None,
    };
    if let Some(email) = &input.contact_email {
        validate_email(email)?;
    }

    if let Some(bytes) = form.file.clone() {
        let stored = store_image(&state, bytes, PORTRAIT_PREFIX, None).await?;
        input.image_key = Some(stored.key);
    }

    let portrait = match PortraitRepo::create(&state.pool, &input).await {
        Ok(p) => p,
        Err(e) => {
            if let Some(key) = &input.image_key {
                state.discard_blob(key).await;
            }
            return Err(e.into());
        }
    };

    tracing::info!(portrait_id = portrait.id, has_image = portrait.image_key.is_some(), "Portrait submitted");
    Ok((StatusCode::CREATED, Json(DataResponse { data: portrait.into() })))
}

/// GET /api/v1/portraits
///
/// Approved portraits only, without contact details.
pub async fn list_public_portraits(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<PublicPortrait>>>> {
    let (limit, offset) = params.resolve();
    let portraits =
        PortraitRepo::list(&state.pool, Some(PortraitStatus::Approved), limit, offset).await?;
    Ok(Json(DataResponse {
        data: portraits.into_iter().map(PublicPortrait::from).collect(),
    }))
}

/// GET /api/v1/portraits/submissions
pub async fn list_submissions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<SubmissionListParams>,
) -> AppResult<Json<DataResponse<Vec<Portrait>>>> {
    user.require(names::PORTRAITS_VIEW)?;

    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();
    let portraits = PortraitRepo::list(&state.pool, params.status, limit, offset).await?;
    Ok(Json(DataResponse { data: portraits }))
}

/// GET /api/v1/portraits/{id}
pub async fn get_portrait(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Portrait>>> {
    user.require(names::PORTRAITS_VIEW)?;
    let portrait = load(&state, id).await?;
    Ok(Json(DataResponse { data: portrait }))
}

/// POST /api/v1/portraits/{id}/review
///
/// 409 when the portrait was already approved or rejected.
pub async fn review_portrait(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ReviewRequest>,
) -> AppResult<Json<DataResponse<Portrait>>> {
    user.require(names::PORTRAITS_REVIEW)?;

    let existing = load(&state, id).await?;
    validate_review(existing.status()?)?;
    let note = optional_text("note", input.note.as_deref(), MAX_NOTE_LENGTH)?;

    let status = input.decision.target_status();
    // A concurrent reviewer may have decided between the check and the update.
    let portrait = PortraitRepo::review(&state.pool, id, status, note.as_deref(), user.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict("Portrait has already been reviewed".into()))
        })?;

    tracing::info!(portrait_id = id, status = status.as_str(), reviewer = user.user_id, "Portrait reviewed");
    Ok(Json(DataResponse { data: portrait }))
}

/// DELETE /api/v1/portraits/{id}
pub async fn delete_portrait(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    user.require(names::PORTRAITS_DELETE)?;

    let deleted = PortraitRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if let Some(key) = deleted.image_key.as_deref() {
        state.discard_blob(key).await;
    }

    tracing::info!(portrait_id = id, user_id = user.user_id, "Portrait deleted");
    Ok(StatusCode::NO_CONTENT)
}
