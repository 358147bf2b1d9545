//! Route definitions for the `/admin` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{permissions, roles, users};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// Each handler checks its own `users.*` / `roles.*` permission.
///
/// ```text
/// GET    /users                       -> list_users
/// POST   /users                       -> create_user
/// GET    /users/{id}                  -> get_user
/// PUT    /users/{id}                  -> update_user
/// DELETE /users/{id}                  -> deactivate_user
/// POST   /users/{id}/reset-password   -> reset_password
///
/// GET    /roles                       -> list_roles
/// POST   /roles                       -> create_role
/// GET    /roles/{id}                  -> get_role
/// PUT    /roles/{id}                  -> update_role
/// DELETE /roles/{id}                  -> delete_role
///
/// GET    /permissions                 -> list_permissions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::deactivate_user),
        )
        .route("/users/{id}/reset-password", post(users::reset_password))
        .route("/roles", get(roles::list_roles).post(roles::create_role))
        .route(
            "/roles/{id}",
            get(roles::get_role)
                .put(roles::update_role)
                .delete(roles::delete_role),
        )
        .route("/permissions", get(permissions::list_permissions))
}
