//! Handlers for `/admin/users` (back-office accounts).
//!
//! Non-super-admins can only hand out permissions they hold themselves and
//! can neither create super-admins nor touch existing ones.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gemeinde_core::error::CoreError;
use gemeinde_core::permissions::{first_ungrantable, names, validate_permission_list};
use gemeinde_core::roles::is_super_admin;
use gemeinde_core::types::DbId;
use gemeinde_core::validation::{require_text, validate_email, MAX_TITLE_LENGTH};
use gemeinde_db::models::user::{CreateUser, UpdateUser, UserResponse};
use gemeinde_db::repositories::{RoleRepo, UserRepo, VereinRepo};
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role_id: Option<DbId>,
    #[serde(default)]
    pub custom_permissions: Vec<String>,
    pub verein_id: Option<DbId>,
}

/// Request body for `POST /admin/users/{id}/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

fn forbidden(msg: impl Into<String>) -> AppError {
    AppError::Core(CoreError::Forbidden(msg.into()))
}

async fn load(state: &AppState, id: DbId) -> AppResult<UserResponse> {
    UserRepo::find_response(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

fn hash(password: &str) -> AppResult<String> {
    validate_password_strength(password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

/// Check that `actor` may give a user the role `role_id`.
///
/// The role must exist, and its permissions must all be grantable by the actor.
async fn check_role_assignment(state: &AppState, actor: &AuthUser, role_id: DbId) -> AppResult<()> {
    let role = RoleRepo::find_by_id(&state.pool, role_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Validation(format!("Role {role_id} does not exist"))))?;

    if actor.is_super_admin() {
        return Ok(());
    }
    if is_super_admin(Some(&role.name)) {
        return Err(forbidden("Only a super admin can assign the super admin role"));
    }
    if let Some(p) = first_ungrantable(&actor.principal, &role.permissions) {
        return Err(forbidden(format!(
            "Role '{}' includes '{p}', which you cannot grant",
            role.name
        )));
    }
    Ok(())
}

fn check_custom_permissions(actor: &AuthUser, permissions: &[String]) -> AppResult<()> {
    validate_permission_list(permissions)?;
    match first_ungrantable(&actor.principal, permissions) {
        Some(p) => Err(forbidden(format!("You cannot grant '{p}'"))),
        None => Ok(()),
    }
}

async fn check_verein_exists(state: &AppState, verein_id: Option<DbId>) -> AppResult<()> {
    if let Some(id) = verein_id {
        VereinRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::Validation(format!("Verein {id} does not exist"))))?;
    }
    Ok(())
}

/// Only super-admins may modify super-admin accounts.
fn check_target(actor: &AuthUser, target: &UserResponse) -> AppResult<()> {
    if is_super_admin(target.role.as_deref()) && !actor.is_super_admin() {
        return Err(forbidden("Only a super admin can modify a super admin"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    user.require(names::USERS_VIEW)?;
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    user.require(names::USERS_VIEW)?;
    let found = load(&state, id).await?;
    Ok(Json(DataResponse { data: found }))
}

/// POST /api/v1/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    actor: AuthUser,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    actor.require(names::USERS_CREATE)?;

    let username = require_text("username", &input.username, MAX_TITLE_LENGTH)?;
    let email = input.email.trim().to_string();
    validate_email(&email)?;
    if let Some(role_id) = input.role_id {
        check_role_assignment(&state, &actor, role_id).await?;
    }
    check_custom_permissions(&actor, &input.custom_permissions)?;
    check_verein_exists(&state, input.verein_id).await?;
    let password_hash = hash(&input.password)?;

    let created = UserRepo::create(
        &state.pool,
        &CreateUser {
            username,
            email,
            password_hash,
            role_id: input.role_id,
            custom_permissions: input.custom_permissions,
            verein_id: input.verein_id,
        },
    )
    .await?;

    tracing::info!(user_id = created.id, username = %created.username, by = actor.user_id, "User created");
    let response = load(&state, created.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// PUT /api/v1/admin/users/{id}
///
/// Profile, role, custom permissions, Verein and active flag. Not password.
pub async fn update_user(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateUser>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    actor.require(names::USERS_UPDATE)?;

    let target = load(&state, id).await?;
    check_target(&actor, &target)?;

    if let Some(username) = &input.username {
        input.username = Some(require_text("username", username, MAX_TITLE_LENGTH)?);
    }
    if let Some(email) = &input.email {
        let email = email.trim().to_string();
        validate_email(&email)?;
        input.email = Some(email);
    }
    if let Some(role_id) = input.role_id {
        check_role_assignment(&state, &actor, role_id).await?;
    }
    if let Some(perms) = &input.custom_permissions {
        check_custom_permissions(&actor, perms)?;
    }
    if !input.clear_verein {
        check_verein_exists(&state, input.verein_id).await?;
    }
    if input.is_active == Some(false) && id == actor.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot deactivate your own account".into(),
        )));
    }

    UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(user_id = id, by = actor.user_id, "User updated");
    let response = load(&state, id).await?;
    Ok(Json(DataResponse { data: response }))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Soft-deactivates the account. The session of a deactivated user stops
/// working on its next request.
pub async fn deactivate_user(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    actor.require(names::USERS_DELETE)?;
    if id == actor.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot deactivate your own account".into(),
        )));
    }

    let target = load(&state, id).await?;
    check_target(&actor, &target)?;

    if !UserRepo::deactivate(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "User is already deactivated".into(),
        )));
    }

    tracing::info!(user_id = id, by = actor.user_id, "User deactivated");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/users/{id}/reset-password
///
/// Also lifts any login lockout.
pub async fn reset_password(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    actor.require(names::USERS_UPDATE)?;

    let target = load(&state, id).await?;
    check_target(&actor, &target)?;

    let hashed = hash(&input.new_password)?;
    if !UserRepo::update_password(&state.pool, id, &hashed).await? {
        return Err(not_found(id));
    }

    tracing::info!(user_id = id, by = actor.user_id, "Password reset");
    Ok(StatusCode::NO_CONTENT)
}
