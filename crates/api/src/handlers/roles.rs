//! Handlers for `/admin/roles`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gemeinde_core::error::CoreError;
use gemeinde_core::permissions::{first_ungrantable, names, validate_permission_list};
use gemeinde_core::roles::PROTECTED_ROLES;
use gemeinde_core::types::DbId;
use gemeinde_core::validation::{optional_text, require_text};
use gemeinde_db::models::role::{CreateRole, Role, UpdateRole};
use gemeinde_db::repositories::RoleRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const MAX_ROLE_NAME_LENGTH: usize = 50;
const MAX_DESCRIPTION_LENGTH: usize = 500;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Role", id })
}

async fn load(state: &AppState, id: DbId) -> AppResult<Role> {
    RoleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

fn reject_protected(role: &Role) -> AppResult<()> {
    if PROTECTED_ROLES.contains(&role.name.as_str()) {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Role '{}' is built in and cannot be changed",
            role.name
        ))));
    }
    Ok(())
}

fn check_permissions(actor: &AuthUser, permissions: &[String]) -> AppResult<()> {
    validate_permission_list(permissions)?;
    if let Some(p) = first_ungrantable(&actor.principal, permissions) {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "You cannot grant '{p}'"
        ))));
    }
    Ok(())
}

/// GET /api/v1/admin/roles
pub async fn list_roles(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Role>>>> {
    user.require(names::ROLES_VIEW)?;
    let roles = RoleRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: roles }))
}

/// GET /api/v1/admin/roles/{id}
pub async fn get_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Role>>> {
    user.require(names::ROLES_VIEW)?;
    let role = load(&state, id).await?;
    Ok(Json(DataResponse { data: role }))
}

/// POST /api/v1/admin/roles
pub async fn create_role(
    State(state): State<AppState>,
    user: AuthUser,
    Json(mut input): Json<CreateRole>,
) -> AppResult<(StatusCode, Json<DataResponse<Role>>)> {
    user.require(names::ROLES_MANAGE)?;

    input.name = require_text("name", &input.name, MAX_ROLE_NAME_LENGTH)?;
    input.description =
        optional_text("description", input.description.as_deref(), MAX_DESCRIPTION_LENGTH)?;
    check_permissions(&user, &input.permissions)?;

    let role = RoleRepo::create(&state.pool, &input).await?;
    tracing::info!(role_id = role.id, name = %role.name, "Role created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: role })))
}

/// PUT /api/v1/admin/roles/{id}
pub async fn update_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateRole>,
) -> AppResult<Json<DataResponse<Role>>> {
    user.require(names::ROLES_MANAGE)?;
    reject_protected(&load(&state, id).await?)?;

    if let Some(name) = &input.name {
        input.name = Some(require_text("name", name, MAX_ROLE_NAME_LENGTH)?);
    }
    if let Some(perms) = &input.permissions {
        check_permissions(&user, perms)?;
    }

    let role = RoleRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(role_id = id, "Role updated");
    Ok(Json(DataResponse { data: role }))
}

/// DELETE /api/v1/admin/roles/{id}
///
/// Users holding the role are left without one.
pub async fn delete_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    user.require(names::ROLES_MANAGE)?;
    reject_protected(&load(&state, id).await?)?;

    if !RoleRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(role_id = id, "Role deleted");
    Ok(StatusCode::NO_CONTENT)
}
