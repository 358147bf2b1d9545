//! Session-cookie authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use gemeinde_core::error::CoreError;
use gemeinde_core::permissions::Principal;
use gemeinde_core::session::{is_expired, verify_session};
use gemeinde_core::types::DbId;
use gemeinde_db::repositories::UserRepo;

use crate::auth::session::session_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from the `gemeinde_session` cookie.
///
/// The token only proves who the user is; role, permissions and Verein are
/// reloaded from the database on every request so that edits and
/// deactivations apply immediately.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     user.require(names::NEWS_CREATE)?;
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub username: String,
    pub principal: Principal,
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or_else(|| unauthorized("Not signed in"))?;

        let payload = verify_session(token, &state.config.session.secret)
            .ok_or_else(|| unauthorized("Invalid session"))?;

        if is_expired(&payload, Utc::now()) {
            return Err(unauthorized("Session expired"));
        }

        let access = UserRepo::find_access(&state.pool, payload.user_id)
            .await?
            .ok_or_else(|| unauthorized("User no longer exists"))?;

        if !access.is_active {
            return Err(unauthorized("Account is deactivated"));
        }

        Ok(AuthUser {
            user_id: access.id,
            username: access.username.clone(),
            principal: access.principal(),
        })
    }
}

/// Optional authentication for public routes that show more to staff.
///
/// Never rejects: a missing or invalid session yields `MaybeAuthUser(None)`.
/// Database failures are still reported.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    /// Whether there is a user and they hold `permission`.
    pub fn can(&self, permission: &str) -> bool {
        self.0.as_ref().is_some_and(|u| u.principal.can(permission))
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match AuthUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(MaybeAuthUser(Some(user))),
            Err(AppError::Core(CoreError::Unauthorized(_))) => Ok(MaybeAuthUser(None)),
            Err(e) => Err(e),
        }
    }
}
