//! Route definitions for the `/gallery` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::gallery;
use crate::state::AppState;

/// Routes mounted at `/gallery`.
///
/// ```text
/// GET    /albums                -> list_albums (public)
/// POST   /albums                -> create_album
/// GET    /albums/{id}           -> get_album (public)
/// PUT    /albums/{id}           -> update_album
/// DELETE /albums/{id}           -> delete_album
/// POST   /albums/{id}/images    -> upload_image (multipart)
/// PUT    /images/{id}           -> update_image
/// DELETE /images/{id}           -> delete_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/albums", get(gallery::list_albums).post(gallery::create_album))
        .route(
            "/albums/{id}",
            get(gallery::get_album)
                .put(gallery::update_album)
                .delete(gallery::delete_album),
        )
        .route("/albums/{id}/images", post(gallery::upload_image))
        .route(
            "/images/{id}",
            put(gallery::update_image).delete(gallery::delete_image),
        )
}
