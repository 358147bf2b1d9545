pub mod admin;
pub mod auth;
pub mod contacts;
pub mod events;
pub mod gallery;
pub mod health;
pub mod media;
pub mod news;
pub mod portraits;
pub mod vereine;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                  login (public)
/// /auth/logout                                 logout
/// /auth/me                                     current user + permissions
///
/// /admin/users                                 list, create
/// /admin/users/{id}                            get, update, deactivate
/// /admin/users/{id}/reset-password             reset password
/// /admin/roles                                 list, create
/// /admin/roles/{id}                            get, update, delete
/// /admin/permissions                           catalogue grouped by category
///
/// /news                                        list (public), create
/// /news/pinned                                 pinned list (public), reorder
/// /news/by-slug/{slug}                         get by slug (public)
/// /news/{id}                                   get (public), update, delete
/// /news/{id}/publish                           publish / unpublish
/// /news/{id}/pin                               pin, unpin
/// /news/{id}/pin/move                          move up / down
///
/// /events                                      list (public), create
/// /events/{id}                                 get (public), update, delete
/// /events/{id}/publish                         publish / unpublish
///
/// /gallery/albums                              list (public), create
/// /gallery/albums/{id}                         get (public), update, delete
/// /gallery/albums/{id}/images                  upload image
/// /gallery/images/{id}                         update caption/order, delete
///
/// /portraits                                   approved list (public), submit (public)
/// /portraits/submissions                       review queue
/// /portraits/{id}                              get, delete
/// /portraits/{id}/review                       approve / reject
///
/// /contacts                                    list (public), create
/// /contacts/{id}                               get (public), update, delete
///
/// /vereine                                     list (public), create
/// /vereine/{id}                                get (public), update, delete
///
/// /media                                       upload content image
/// /media/{*key}                                serve stored image
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/news", news::router())
        .nest("/events", events::router())
        .nest("/gallery", gallery::router())
        .nest("/portraits", portraits::router())
        .nest("/contacts", contacts::router())
        .nest("/vereine", vereine::router())
        .nest("/media", media::router())
}
