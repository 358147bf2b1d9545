//! Permission and Verein checks on top of [`AuthUser`].
//!
//! Every mutating handler takes an [`AuthUser`] (or [`RequireAuth`]) and
//! calls [`AuthUser::require`] with the permission it needs.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use gemeinde_core::error::CoreError;
use gemeinde_core::permissions::can_access_verein;
use gemeinde_core::types::DbId;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

impl AuthUser {
    /// Reject with 403 unless the user holds `permission`.
    pub fn require(&self, permission: &str) -> Result<(), AppError> {
        if self.principal.can(permission) {
            Ok(())
        } else {
            Err(AppError::Core(CoreError::Forbidden(format!(
                "Missing permission '{permission}'"
            ))))
        }
    }

    /// Reject with 403 unless the user may touch records of `verein_id`.
    pub fn require_verein(&self, verein_id: Option<DbId>) -> Result<(), AppError> {
        if can_access_verein(&self.principal, verein_id) {
            Ok(())
        } else {
            Err(AppError::Core(CoreError::Forbidden(
                "This record belongs to another Verein".into(),
            )))
        }
    }

    /// The Verein new records default to when the client names none.
    ///
    /// Scoped users create records for their own Verein; everyone else
    /// creates municipality records.
    pub fn default_verein(&self, requested: Option<DbId>) -> Option<DbId> {
        requested.or(self.principal.verein_id)
    }

    pub fn is_super_admin(&self) -> bool {
        self.principal.is_super_admin()
    }
}

/// Requires any authenticated user.
///
/// Functionally equivalent to [`AuthUser`] but named explicitly for routes
/// where "this requires a session" should be self-documenting.
///
/// ```ignore
/// async fn me(RequireAuth(user): RequireAuth) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}
