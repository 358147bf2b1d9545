//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the signed-in user, loaded from the session cookie.
//! - [`auth::MaybeAuthUser`] -- the same, but optional (public routes).
//! - [`rbac::RequireAuth`] -- any signed-in user; permission checks follow in the handler.

pub mod auth;
pub mod rbac;
