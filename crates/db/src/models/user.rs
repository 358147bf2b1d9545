//! User entity model and DTOs.

use gemeinde_core::permissions::Principal;
use gemeinde_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: Option<DbId>,
    pub custom_permissions: Vec<String>,
    pub verein_id: Option<DbId>,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role_id: Option<DbId>,
    /// Resolved role name (e.g. `"admin"`, `"editor"`).
    pub role: Option<String>,
    pub custom_permissions: Vec<String>,
    pub verein_id: Option<DbId>,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Everything a permission check needs about a user, loaded in one query.
#[derive(Debug, Clone, FromRow)]
pub struct UserAccess {
    pub id: DbId,
    pub username: String,
    pub is_active: bool,
    pub role_name: Option<String>,
    pub role_permissions: Option<Vec<String>>,
    pub custom_permissions: Vec<String>,
    pub verein_id: Option<DbId>,
}

impl UserAccess {
    pub fn principal(&self) -> Principal {
        Principal {
            role: self.role_name.clone(),
            role_permissions: self.role_permissions.clone().unwrap_or_default(),
            custom_permissions: self.custom_permissions.clone(),
            verein_id: self.verein_id,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: Option<DbId>,
    pub custom_permissions: Vec<String>,
    pub verein_id: Option<DbId>,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role_id: Option<DbId>,
    pub custom_permissions: Option<Vec<String>>,
    pub verein_id: Option<DbId>,
    /// Detach the user from their Verein (takes precedence over `verein_id`).
    #[serde(default)]
    pub clear_verein: bool,
    pub is_active: Option<bool>,
}
