//! First-run creation of a super-admin account.

use gemeinde_core::error::CoreError;
use gemeinde_core::roles::ROLE_SUPER_ADMIN;
use gemeinde_core::validation::validate_email;
use gemeinde_db::models::user::CreateUser;
use gemeinde_db::repositories::{RoleRepo, UserRepo};
use gemeinde_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};

/// Credentials for the initial super-admin.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl BootstrapAdmin {
    /// Read `BOOTSTRAP_ADMIN_USERNAME`, `BOOTSTRAP_ADMIN_EMAIL` and
    /// `BOOTSTRAP_ADMIN_PASSWORD`. Returns `None` unless all three are set.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            username: std::env::var("BOOTSTRAP_ADMIN_USERNAME").ok()?,
            email: std::env::var("BOOTSTRAP_ADMIN_EMAIL").ok()?,
            password: std::env::var("BOOTSTRAP_ADMIN_PASSWORD").ok()?,
        })
    }
}

/// Create `admin` as a super-admin if no user exists yet.
///
/// Returns `true` when an account was created.
pub async fn ensure_bootstrap_admin(pool: &DbPool, admin: &BootstrapAdmin) -> AppResult<bool> {
    if UserRepo::count(pool).await? > 0 {
        return Ok(false);
    }

    validate_password_strength(&admin.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    validate_email(&admin.email)?;

    let role = RoleRepo::find_by_name(pool, ROLE_SUPER_ADMIN)
        .await?
        .ok_or_else(|| AppError::InternalError("super_admin role is not seeded".into()))?;

    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password_hash,
            role_id: Some(role.id),
            custom_permissions: vec![],
            verein_id: None,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Bootstrap super-admin created");
    Ok(true)
}
