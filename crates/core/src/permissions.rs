//! Permission evaluation and the permission catalogue.
//!
//! Permissions are `category.action` strings (e.g. `news.pin`). A role carries
//! a set of them, and individual users may be granted extra custom
//! permissions on top of their role. Two wildcard forms exist:
//!
//! - `*` grants everything.
//! - `category.*` grants every action within one category (role sets only).
//!
//! The super-admin role bypasses evaluation entirely.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;
use crate::roles::is_super_admin;
use crate::types::DbId;

/// Grants every permission.
pub const WILDCARD: &str = "*";

/// Accepts `*`, `category.*` and `category.action`.
static PERMISSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\*|[a-z][a-z_]*\.(\*|[a-z][a-z_]*))$").expect("valid regex")
});

// ---------------------------------------------------------------------------
// Permission name constants
// ---------------------------------------------------------------------------

pub mod names {
    pub const EVENTS_VIEW: &str = "events.view";
    pub const EVENTS_CREATE: &str = "events.create";
    pub const EVENTS_UPDATE: &str = "events.update";
    pub const EVENTS_DELETE: &str = "events.delete";
    pub const EVENTS_PUBLISH: &str = "events.publish";

    pub const NEWS_CREATE: &str = "news.create";
    pub const NEWS_UPDATE: &str = "news.update";
    pub const NEWS_DELETE: &str = "news.delete";
    pub const NEWS_PUBLISH: &str = "news.publish";
    pub const NEWS_PIN: &str = "news.pin";

    pub const GALLERY_CREATE: &str = "gallery.create";
    pub const GALLERY_UPDATE: &str = "gallery.update";
    pub const GALLERY_DELETE: &str = "gallery.delete";
    pub const GALLERY_UPLOAD: &str = "gallery.upload";

    pub const PORTRAITS_VIEW: &str = "portraits.view";
    pub const PORTRAITS_REVIEW: &str = "portraits.review";
    pub const PORTRAITS_DELETE: &str = "portraits.delete";

    pub const CONTACTS_CREATE: &str = "contacts.create";
    pub const CONTACTS_UPDATE: &str = "contacts.update";
    pub const CONTACTS_DELETE: &str = "contacts.delete";

    pub const USERS_VIEW: &str = "users.view";
    pub const USERS_CREATE: &str = "users.create";
    pub const USERS_UPDATE: &str = "users.update";
    pub const USERS_DELETE: &str = "users.delete";

    pub const ROLES_VIEW: &str = "roles.view";
    pub const ROLES_MANAGE: &str = "roles.manage";

    pub const VEREINE_VIEW: &str = "vereine.view";
    pub const VEREINE_MANAGE: &str = "vereine.manage";
}

// ---------------------------------------------------------------------------
// Principal
// ---------------------------------------------------------------------------

/// The identity a permission check is evaluated against.
///
/// `role_permissions` is the permission set of `role`, resolved by the caller
/// (normally loaded alongside the user row).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Principal {
    pub role: Option<String>,
    pub role_permissions: Vec<String>,
    pub custom_permissions: Vec<String>,
    /// The Verein this user acts for. `None` means unscoped.
    pub verein_id: Option<DbId>,
}

impl Principal {
    /// Shorthand for [`has_permission`] on a known principal.
    pub fn can(&self, permission: &str) -> bool {
        has_permission(Some(self), permission)
    }

    pub fn is_super_admin(&self) -> bool {
        is_super_admin(self.role.as_deref())
    }
}

/// Decide whether `principal` holds `permission`.
///
/// True when the role is super-admin, when the custom permissions contain the
/// exact string or `*`, or when the role permissions contain the exact string,
/// `*`, or `category.*`. An absent principal never has any permission.
pub fn has_permission(principal: Option<&Principal>, permission: &str) -> bool {
    let Some(principal) = principal else {
        return false;
    };

    if principal.is_super_admin() {
        return true;
    }

    if principal
        .custom_permissions
        .iter()
        .any(|p| p == permission || p == WILDCARD)
    {
        return true;
    }

    // Role permissions only count when the user actually has a role.
    if principal.role.is_none() {
        return false;
    }

    let category_wildcard = category_of(permission).map(|c| format!("{c}.*"));

    principal.role_permissions.iter().any(|p| {
        p == permission || p == WILDCARD || category_wildcard.as_deref() == Some(p.as_str())
    })
}

/// Whether `principal` may touch a record owned by `target_verein`.
///
/// Super-admins and holders of `vereine.manage` see every Verein. Users
/// without a Verein are unscoped. A scoped user only reaches records of their
/// own Verein; records with no Verein belong to the municipality and are off
/// limits to them.
pub fn can_access_verein(principal: &Principal, target_verein: Option<DbId>) -> bool {
    if principal.can(names::VEREINE_MANAGE) {
        return true;
    }
    match principal.verein_id {
        None => true,
        Some(own) => target_verein == Some(own),
    }
}

/// Whether `grantor` may hand `permission` to someone else.
///
/// Super-admins may grant anything. Everyone else may grant only what they
/// hold themselves: an exact permission they have, or `category.*` when they
/// hold every catalogue permission of that category. `*` is super-admin only.
pub fn can_grant(grantor: &Principal, permission: &str) -> bool {
    if grantor.is_super_admin() {
        return true;
    }
    if permission == WILDCARD {
        return false;
    }
    match permission.strip_suffix(".*") {
        Some(category) => CATALOG
            .iter()
            .filter(|def| def.category == category)
            .all(|def| grantor.can(def.name)),
        None => grantor.can(permission),
    }
}

/// The first permission in `permissions` that `grantor` may not grant.
pub fn first_ungrantable<'a>(grantor: &Principal, permissions: &'a [String]) -> Option<&'a str> {
    permissions
        .iter()
        .map(String::as_str)
        .find(|p| !can_grant(grantor, p))
}

/// The part of a permission string before the first `.`.
pub fn category_of(permission: &str) -> Option<&str> {
    permission
        .split_once('.')
        .map(|(category, _)| category)
        .filter(|c| !c.is_empty())
}

/// Validate the shape of a permission string before it is stored.
pub fn validate_permission_name(permission: &str) -> Result<(), CoreError> {
    if PERMISSION_RE.is_match(permission) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid permission '{permission}'. Expected 'category.action', 'category.*' or '*'"
        )))
    }
}

/// Validate a list of permission strings, rejecting duplicates.
pub fn validate_permission_list(permissions: &[String]) -> Result<(), CoreError> {
    for (i, p) in permissions.iter().enumerate() {
        validate_permission_name(p)?;
        if permissions[..i].contains(p) {
            return Err(CoreError::Validation(format!(
                "Duplicate permission '{p}'"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// A permission known to the admin UI.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PermissionDef {
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
}

const fn def(name: &'static str, category: &'static str, description: &'static str) -> PermissionDef {
    PermissionDef {
        name,
        category,
        description,
    }
}

/// Every permission the application checks, in display order.
///
/// Mirrors the seed rows of the `permissions` table.
pub const CATALOG: &[PermissionDef] = &[
    def(names::EVENTS_VIEW, "events", "See unpublished events"),
    def(names::EVENTS_CREATE, "events", "Create events"),
    def(names::EVENTS_UPDATE, "events", "Edit events"),
    def(names::EVENTS_DELETE, "events", "Delete events"),
    def(names::EVENTS_PUBLISH, "events", "Publish and unpublish events"),
    def(names::NEWS_CREATE, "news", "Write news"),
    def(names::NEWS_UPDATE, "news", "Edit news"),
    def(names::NEWS_DELETE, "news", "Delete news"),
    def(names::NEWS_PUBLISH, "news", "Publish and unpublish news"),
    def(names::NEWS_PIN, "news", "Pin news to the homepage"),
    def(names::GALLERY_CREATE, "gallery", "Create albums"),
    def(names::GALLERY_UPDATE, "gallery", "Edit albums and captions"),
    def(names::GALLERY_DELETE, "gallery", "Delete albums and images"),
    def(names::GALLERY_UPLOAD, "gallery", "Upload images"),
    def(names::PORTRAITS_VIEW, "portraits", "See submitted portraits"),
    def(names::PORTRAITS_REVIEW, "portraits", "Approve or reject portraits"),
    def(names::PORTRAITS_DELETE, "portraits", "Delete portraits"),
    def(names::CONTACTS_CREATE, "contacts", "Create contacts"),
    def(names::CONTACTS_UPDATE, "contacts", "Edit contacts"),
    def(names::CONTACTS_DELETE, "contacts", "Delete contacts"),
    def(names::USERS_VIEW, "users", "List admin users"),
    def(names::USERS_CREATE, "users", "Create admin users"),
    def(names::USERS_UPDATE, "users", "Edit admin users"),
    def(names::USERS_DELETE, "users", "Deactivate admin users"),
    def(names::ROLES_VIEW, "roles", "List roles"),
    def(names::ROLES_MANAGE, "roles", "Create, edit and delete roles"),
    def(names::VEREINE_VIEW, "vereine", "List Vereine"),
    def(names::VEREINE_MANAGE, "vereine", "Manage Vereine and all their content"),
];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{ROLE_EDITOR, ROLE_SUPER_ADMIN};

    fn principal(role: Option<&str>, role_perms: &[&str], custom: &[&str]) -> Principal {
        Principal {
            role: role.map(str::to_string),
            role_permissions: role_perms.iter().map(|s| s.to_string()).collect(),
            custom_permissions: custom.iter().map(|s| s.to_string()).collect(),
            verein_id: None,
        }
    }

    #[test]
    fn absent_principal_has_nothing() {
        assert!(!has_permission(None, names::NEWS_PIN));
    }

    #[test]
    fn super_admin_has_everything() {
        let p = principal(Some(ROLE_SUPER_ADMIN), &[], &[]);
        for def in CATALOG {
            assert!(p.can(def.name), "super admin should hold {}", def.name);
        }
        assert!(p.can("anything.else"));
    }

    #[test]
    fn custom_wildcard_grants_every_permission() {
        let p = principal(None, &[], &["*"]);
        for name in ["news.pin", "users.delete", "x.y", "", "no-dot"] {
            assert!(p.can(name), "custom '*' should grant '{name}'");
        }
    }

    #[test]
    fn custom_exact_match() {
        let p = principal(None, &[], &["news.pin"]);
        assert!(p.can("news.pin"));
        assert!(!p.can("news.create"));
    }

    #[test]
    fn custom_category_wildcard_is_not_expanded() {
        let p = principal(None, &[], &["news.*"]);
        assert!(!p.can("news.pin"));
    }

    #[test]
    fn role_category_wildcard_covers_category() {
        let p = principal(Some(ROLE_EDITOR), &["news.*"], &[]);
        for def in CATALOG.iter().filter(|d| d.category == "news") {
            assert!(p.can(def.name));
        }
        assert!(p.can("news.something_new"));
        assert!(!p.can("events.create"));
        assert!(!p.can("newsletter.send"));
    }

    #[test]
    fn role_wildcard_and_exact() {
        assert!(principal(Some(ROLE_EDITOR), &["*"], &[]).can("users.delete"));
        let p = principal(Some(ROLE_EDITOR), &["events.create"], &[]);
        assert!(p.can("events.create"));
        assert!(!p.can("events.delete"));
    }

    #[test]
    fn role_permissions_ignored_without_role() {
        let p = principal(None, &["*"], &[]);
        assert!(!p.can("events.create"));
    }

    #[test]
    fn verein_scoping() {
        let mut p = principal(Some("verein"), &["events.*"], &[]);
        assert!(can_access_verein(&p, None), "unscoped user reaches everything");

        p.verein_id = Some(7);
        assert!(can_access_verein(&p, Some(7)));
        assert!(!can_access_verein(&p, Some(8)));
        assert!(!can_access_verein(&p, None));

        p.custom_permissions.push(names::VEREINE_MANAGE.to_string());
        assert!(can_access_verein(&p, Some(8)));
    }

    #[test]
    fn super_admin_ignores_verein_scope() {
        let mut p = principal(Some(ROLE_SUPER_ADMIN), &[], &[]);
        p.verein_id = Some(1);
        assert!(can_access_verein(&p, Some(2)));
    }

    #[test]
    fn category_extraction() {
        assert_eq!(category_of("news.pin"), Some("news"));
        assert_eq!(category_of("a.b.c"), Some("a"));
        assert_eq!(category_of("*"), None);
        assert_eq!(category_of(".pin"), None);
    }

    #[test]
    fn permission_name_validation() {
        for ok in ["*", "news.*", "news.pin", "gallery.upload", "users.view_all"] {
            assert!(validate_permission_name(ok).is_ok(), "{ok} should be valid");
        }
        for bad in ["", "news", "News.pin", "news.", ".pin", "news.pin.extra", "*.pin", "news pin"] {
            assert!(validate_permission_name(bad).is_err(), "{bad} should be invalid");
        }
    }

    #[test]
    fn permission_list_rejects_duplicates() {
        let list = vec!["news.pin".to_string(), "news.pin".to_string()];
        assert!(validate_permission_list(&list).is_err());
        let list = vec!["news.pin".to_string(), "news.*".to_string()];
        assert!(validate_permission_list(&list).is_ok());
    }

    #[test]
    fn catalog_names_are_valid() {
        for def in CATALOG {
            validate_permission_name(def.name).unwrap();
            assert_eq!(category_of(def.name), Some(def.category));
        }
    }

    #[test]
    fn grants_are_limited_to_held_permissions() {
        let admin = principal(Some("admin"), &["news.*", "users.create"], &["events.create"]);
        assert!(can_grant(&admin, "news.pin"));
        assert!(can_grant(&admin, "news.*"));
        assert!(can_grant(&admin, "events.create"));
        assert!(!can_grant(&admin, "events.*"));
        assert!(!can_grant(&admin, "users.delete"));
        assert!(!can_grant(&admin, "*"));

        let list = vec!["news.create".to_string(), "roles.manage".to_string()];
        assert_eq!(first_ungrantable(&admin, &list), Some("roles.manage"));
    }

    #[test]
    fn super_admin_grants_anything() {
        let root = principal(Some(ROLE_SUPER_ADMIN), &[], &[]);
        assert!(can_grant(&root, "*"));
        assert!(can_grant(&root, "users.*"));
        assert_eq!(first_ungrantable(&root, &["*".to_string()]), None);
    }
}
