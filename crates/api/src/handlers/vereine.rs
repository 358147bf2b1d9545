//! Handlers for the `/vereine` resource (local clubs).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gemeinde_core::error::CoreError;
use gemeinde_core::permissions::names;
use gemeinde_core::types::DbId;
use gemeinde_core::validation::{
    optional_text, require_text, slugify, validate_slug, MAX_TITLE_LENGTH,
};
use gemeinde_db::models::verein::{CreateVerein, UpdateVerein, Verein};
use gemeinde_db::repositories::VereinRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const MAX_DESCRIPTION_LENGTH: usize = 2_000;
const MAX_WEBSITE_LENGTH: usize = 300;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Verein", id })
}

/// GET /api/v1/vereine
pub async fn list_vereine(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Verein>>>> {
    let vereine = VereinRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: vereine }))
}

/// GET /api/v1/vereine/{id}
pub async fn get_verein(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Verein>>> {
    let verein = VereinRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: verein }))
}

/// POST /api/v1/vereine
pub async fn create_verein(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateVerein>,
) -> AppResult<(StatusCode, Json<DataResponse<Verein>>)> {
    user.require(names::VEREINE_MANAGE)?;

    let name = require_text("name", &input.name, MAX_TITLE_LENGTH)?;
    let slug = match input.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => slugify(&name),
    };
    validate_slug(&slug)?;
    let description =
        optional_text("description", input.description.as_deref(), MAX_DESCRIPTION_LENGTH)?;
    let website = optional_text("website", input.website.as_deref(), MAX_WEBSITE_LENGTH)?;

    let verein = VereinRepo::create(
        &state.pool,
        &name,
        &slug,
        description.as_deref(),
        website.as_deref(),
    )
    .await?;

    tracing::info!(verein_id = verein.id, slug = %verein.slug, "Verein created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: verein })))
}

/// PUT /api/v1/vereine/{id}
pub async fn update_verein(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateVerein>,
) -> AppResult<Json<DataResponse<Verein>>> {
    user.require(names::VEREINE_MANAGE)?;

    if let Some(name) = &input.name {
        input.name = Some(require_text("name", name, MAX_TITLE_LENGTH)?);
    }
    if let Some(slug) = &input.slug {
        validate_slug(slug)?;
    }
    if let Some(website) = &input.website {
        input.website = optional_text("website", Some(website.as_str()), MAX_WEBSITE_LENGTH)?;
    }

    let verein = VereinRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(verein_id = id, "Verein updated");
    Ok(Json(DataResponse { data: verein }))
}

/// DELETE /api/v1/vereine/{id}
///
/// Members, events and contacts of the Verein stay, detached from it.
pub async fn delete_verein(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    user.require(names::VEREINE_MANAGE)?;

    if !VereinRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(verein_id = id, "Verein deleted");
    Ok(StatusCode::NO_CONTENT)
}
