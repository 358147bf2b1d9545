//! Route definitions for the `/media` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Routes mounted at `/media`.
///
/// ```text
/// POST   /          -> upload_media (multipart)
/// GET    /{*key}    -> get_media (public; portrait photos gated)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(media::upload_media))
        .route("/{*key}", get(media::get_media))
}
