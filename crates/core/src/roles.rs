//! Well-known role name constants.
//!
//! These must match the seed data in `20260301000002_create_roles.sql`.

/// Bypasses every permission check.
pub const ROLE_SUPER_ADMIN: &str = "super_admin";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";
/// Club representatives; usually paired with a `verein_id` on the user.
pub const ROLE_VEREIN: &str = "verein";

/// Roles that may not be deleted through the admin API.
pub const PROTECTED_ROLES: &[&str] = &[ROLE_SUPER_ADMIN];

/// Whether `role` names the super-admin role.
pub fn is_super_admin(role: Option<&str>) -> bool {
    role == Some(ROLE_SUPER_ADMIN)
}
