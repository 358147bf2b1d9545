//! Route definitions for the `/events` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// GET    /                -> list_events (public; ?from, ?to, ?category, ?verein_id)
/// POST   /                -> create_event
/// GET    /{id}            -> get_event (public)
/// PUT    /{id}            -> update_event
/// DELETE /{id}            -> delete_event
/// POST   /{id}/publish    -> publish_event
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route(
            "/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/{id}/publish", post(events::publish_event))
}
