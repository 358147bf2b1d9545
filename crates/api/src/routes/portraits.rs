//! Route definitions for the `/portraits` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::portraits;
use crate::state::AppState;

/// Routes mounted at `/portraits`.
///
/// ```text
/// GET    /                 -> list_public_portraits (public, approved only)
/// POST   /                 -> submit_portrait (public, multipart)
/// GET    /submissions      -> list_submissions (?status)
/// GET    /{id}             -> get_portrait
/// DELETE /{id}             -> delete_portrait
/// POST   /{id}/review      -> review_portrait
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(portraits::list_public_portraits).post(portraits::submit_portrait),
        )
        .route("/submissions", get(portraits::list_submissions))
        .route(
            "/{id}",
            get(portraits::get_portrait).delete(portraits::delete_portrait),
        )
        .route("/{id}/review", post(portraits::review_portrait))
}
