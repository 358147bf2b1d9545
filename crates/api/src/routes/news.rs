//! Route definitions for the `/news` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::news;
use crate::state::AppState;

/// Routes mounted at `/news`.
///
/// ```text
/// GET    /                  -> list_news (public)
/// POST   /                  -> create_news
/// GET    /pinned            -> list_pinned (public)
/// PUT    /pinned            -> reorder_pins
/// GET    /by-slug/{slug}    -> get_news_by_slug (public)
/// GET    /{id}              -> get_news (public)
/// PUT    /{id}              -> update_news
/// DELETE /{id}              -> delete_news
/// POST   /{id}/publish      -> publish_news
/// POST   /{id}/pin          -> pin_news
/// DELETE /{id}/pin          -> unpin_news
/// POST   /{id}/pin/move     -> move_pin
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(news::list_news).post(news::create_news))
        .route("/pinned", get(news::list_pinned).put(news::reorder_pins))
        .route("/by-slug/{slug}", get(news::get_news_by_slug))
        .route(
            "/{id}",
            get(news::get_news)
                .put(news::update_news)
                .delete(news::delete_news),
        )
        .route("/{id}/publish", post(news::publish_news))
        .route("/{id}/pin", post(news::pin_news).delete(news::unpin_news))
        .route("/{id}/pin/move", post(news::move_pin))
}
