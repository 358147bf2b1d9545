//! Route definitions for the `/vereine` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::vereine;
use crate::state::AppState;

/// Routes mounted at `/vereine`.
///
/// ```text
/// GET    /        -> list_vereine (public)
/// POST   /        -> create_verein
/// GET    /{id}    -> get_verein (public)
/// PUT    /{id}    -> update_verein
/// DELETE /{id}    -> delete_verein
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(vereine::list_vereine).post(vereine::create_verein))
        .route(
            "/{id}",
            get(vereine::get_verein)
                .put(vereine::update_verein)
                .delete(vereine::delete_verein),
        )
}
