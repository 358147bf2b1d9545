//! Handlers for the `/contacts` directory.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gemeinde_core::error::CoreError;
use gemeinde_core::permissions::names;
use gemeinde_core::types::DbId;
use gemeinde_core::validation::{optional_text, require_text, validate_email, MAX_TITLE_LENGTH};
use gemeinde_db::models::contact::{Contact, CreateContact, UpdateContact};
use gemeinde_db::repositories::ContactRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum length of the short contact fields (position, phone, ...).
const MAX_FIELD_LENGTH: usize = 200;

/// Maximum length of a postal address.
const MAX_ADDRESS_LENGTH: usize = 500;

#[derive(Debug, Default, Deserialize)]
pub struct ContactListParams {
    pub verein_id: Option<DbId>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Contact", id })
}

async fn load(state: &AppState, id: DbId) -> AppResult<Contact> {
    ContactRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

fn clean_optional(
    field: &str,
    value: &Option<String>,
    max_len: usize,
) -> Result<Option<String>, CoreError> {
    optional_text(field, value.as_deref(), max_len)
}

fn check_email(email: &Option<String>) -> Result<(), CoreError> {
    match email {
        Some(e) => validate_email(e.trim()),
        None => Ok(()),
    }
}

/// GET /api/v1/contacts
pub async fn list_contacts(
    State(state): State<AppState>,
    Query(params): Query<ContactListParams>,
) -> AppResult<Json<DataResponse<Vec<Contact>>>> {
    let contacts = ContactRepo::list(&state.pool, params.verein_id).await?;
    Ok(Json(DataResponse { data: contacts }))
}

/// GET /api/v1/contacts/{id}
pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Contact>>> {
    let contact = load(&state, id).await?;
    Ok(Json(DataResponse { data: contact }))
}

/// POST /api/v1/contacts
pub async fn create_contact(
    State(state): State<AppState>,
    user: AuthUser,
    Json(mut input): Json<CreateContact>,
) -> AppResult<(StatusCode, Json<DataResponse<Contact>>)> {
    user.require(names::CONTACTS_CREATE)?;

    input.verein_id = user.default_verein(input.verein_id);
    user.require_verein(input.verein_id)?;

    input.name = require_text("name", &input.name, MAX_TITLE_LENGTH)?;
    input.position = clean_optional("position", &input.position, MAX_FIELD_LENGTH)?;
    input.organization = clean_optional("organization", &input.organization, MAX_FIELD_LENGTH)?;
    input.email = clean_optional("email", &input.email, MAX_FIELD_LENGTH)?;
    input.phone = clean_optional("phone", &input.phone, MAX_FIELD_LENGTH)?;
    input.address = clean_optional("address", &input.address, MAX_ADDRESS_LENGTH)?;
    check_email(&input.email)?;

    let contact = ContactRepo::create(&state.pool, &input).await?;
    tracing::info!(contact_id = contact.id, user_id = user.user_id, "Contact created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: contact })))
}

/// PUT /api/v1/contacts/{id}
pub async fn update_contact(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateContact>,
) -> AppResult<Json<DataResponse<Contact>>> {
    user.require(names::CONTACTS_UPDATE)?;

    let existing = load(&state, id).await?;
    user.require_verein(existing.verein_id)?;
    if input.verein_id.is_some() {
        user.require_verein(input.verein_id)?;
    }

    if let Some(name) = &input.name {
        input.name = Some(require_text("name", name, MAX_TITLE_LENGTH)?);
    }
    input.position = clean_optional("position", &input.position, MAX_FIELD_LENGTH)?;
    input.organization = clean_optional("organization", &input.organization, MAX_FIELD_LENGTH)?;
    input.email = clean_optional("email", &input.email, MAX_FIELD_LENGTH)?;
    input.phone = clean_optional("phone", &input.phone, MAX_FIELD_LENGTH)?;
    input.address = clean_optional("address", &input.address, MAX_ADDRESS_LENGTH)?;
    check_email(&input.email)?;

    let contact = ContactRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(contact_id = id, user_id = user.user_id, "Contact updated");
    Ok(Json(DataResponse { data: contact }))
}

/// DELETE /api/v1/contacts/{id}
pub async fn delete_contact(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    user.require(names::CONTACTS_DELETE)?;
    let existing = load(&state, id).await?;
    user.require_verein(existing.verein_id)?;

    if !ContactRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(contact_id = id, user_id = user.user_id, "Contact deleted");
    Ok(StatusCode::NO_CONTENT)
}
