//! Handlers for the `/auth` resource (login, logout, current user).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use gemeinde_core::error::CoreError;
use gemeinde_core::permissions::{Principal, CATALOG};
use gemeinde_core::session::{sign_session, SessionPayload};
use gemeinde_core::types::DbId;
use gemeinde_db::models::user::UserResponse;
use gemeinde_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::password::verify_password;
use crate::auth::session::{clear_session_cookie, session_cookie};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum consecutive failed login attempts before locking the account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
const LOCK_DURATION_MINS: i64 = 15;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// The signed-in user and what they may do.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
    pub is_super_admin: bool,
    /// Catalogue permissions the user holds, wildcards expanded.
    pub permissions: Vec<&'static str>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with username + password and set the session cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid username or password".into()));

    let user = UserRepo::find_by_username(&state.pool, input.username.trim())
        .await?
        .ok_or_else(invalid)?;

    let locked = user.locked_until.is_some_and(|until| until > Utc::now());

    // Account state is only revealed to someone who knows the password.
    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        if user.is_active && !locked {
            let failed = UserRepo::increment_failed_login(&state.pool, user.id).await?;
            if failed >= MAX_FAILED_ATTEMPTS {
                let lock_until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
                UserRepo::lock_account(&state.pool, user.id, lock_until).await?;
                tracing::warn!(user_id = user.id, failed, "Account locked after failed logins");
            }
        }
        return Err(invalid());
    }

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }
    if locked {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is temporarily locked. Try again later.".into(),
        )));
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let access = UserRepo::find_access(&state.pool, user.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id: user.id }))?;

    let payload = SessionPayload::new(
        user.id,
        &user.username,
        access.role_name.as_deref(),
        Utc::now(),
    );
    let token = sign_session(&payload, &state.config.session.secret)?;

    let me = build_me(&state, user.id, &access.principal()).await?;
    tracing::info!(user_id = user.id, username = %user.username, "User signed in");

    Ok((
        [(SET_COOKIE, session_cookie(&token, &state.config.session))],
        Json(DataResponse { data: me }),
    ))
}

/// POST /api/v1/auth/logout
///
/// Clear the session cookie. Always succeeds; sessions are stateless.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, clear_session_cookie(&state.config.session))],
    )
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<MeResponse>>> {
    let me = build_me(&state, user.user_id, &user.principal).await?;
    Ok(Json(DataResponse { data: me }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn build_me(state: &AppState, user_id: DbId, principal: &Principal) -> AppResult<MeResponse> {
    let user = UserRepo::find_response(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id: user_id }))?;

    Ok(MeResponse {
        user,
        is_super_admin: principal.is_super_admin(),
        permissions: effective_permissions(principal),
    })
}

/// The catalogue permissions `principal` holds.
pub fn effective_permissions(principal: &Principal) -> Vec<&'static str> {
    CATALOG
        .iter()
        .filter(|def| principal.can(def.name))
        .map(|def| def.name)
        .collect()
}
