//! Field-level validation shared by the content handlers.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidateEmail;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Maximum length for titles and names.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for generated or supplied slugs.
pub const MAX_SLUG_LENGTH: usize = 80;

/// Maximum length for long-form bodies (news, portraits).
pub const MAX_BODY_LENGTH: usize = 50_000;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid regex"));

/// Trim `value` and require it to be non-empty and at most `max_len` characters.
pub fn require_text(field: &str, value: &str, max_len: usize) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > max_len {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Like [`require_text`] for optional fields; blank input becomes `None`.
pub fn optional_text(
    field: &str,
    value: Option<&str>,
    max_len: usize,
) -> Result<Option<String>, CoreError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => require_text(field, v, max_len).map(Some),
    }
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )))
    }
}

pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.len() <= MAX_SLUG_LENGTH && SLUG_RE.is_match(slug) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid slug '{slug}'. Use lowercase letters, digits and single dashes"
        )))
    }
}

/// Derive a URL slug from a German title.
///
/// Umlauts are transliterated (`ä` → `ae`, `ß` → `ss`), every other
/// non-alphanumeric run becomes a single dash.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for ch in title.chars().flat_map(char::to_lowercase) {
        let mapped: Option<&str> = match ch {
            'ä' => Some("ae"),
            'ö' => Some("oe"),
            'ü' => Some("ue"),
            'ß' => Some("ss"),
            _ => None,
        };

        if mapped.is_some() || ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            match mapped {
                Some(s) => slug.push_str(s),
                None => slug.push(ch),
            }
        } else {
            pending_dash = true;
        }
    }

    if slug.len() > MAX_SLUG_LENGTH {
        slug.truncate(MAX_SLUG_LENGTH);
        while slug.ends_with('-') {
            slug.pop();
        }
    }
    slug
}

/// An event may not end before it starts.
pub fn validate_date_range(starts_at: Timestamp, ends_at: Option<Timestamp>) -> Result<(), CoreError> {
    match ends_at {
        Some(end) if end < starts_at => Err(CoreError::Validation(
            "ends_at must not be before starts_at".into(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn require_text_trims_and_bounds() {
        assert_eq!(require_text("title", "  Dorffest  ", 20).unwrap(), "Dorffest");
        assert!(require_text("title", "   ", 20).is_err());
        assert!(require_text("title", "abcdef", 5).is_err());
        // Length counts characters, not bytes.
        assert!(require_text("title", "äöü", 3).is_ok());
    }

    #[test]
    fn optional_text_blank_is_none() {
        assert_eq!(optional_text("x", None, 10).unwrap(), None);
        assert_eq!(optional_text("x", Some("  "), 10).unwrap(), None);
        assert_eq!(optional_text("x", Some(" a "), 10).unwrap(), Some("a".into()));
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("info@gemeinde.de").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn slugify_german_titles() {
        assert_eq!(slugify("Straßenfest am Rathausplatz"), "strassenfest-am-rathausplatz");
        assert_eq!(slugify("  Übung der Feuerwehr!! 2026 "), "uebung-der-feuerwehr-2026");
        assert_eq!(slugify("Größe & Öffnungszeiten"), "groesse-oeffnungszeiten");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn slugify_output_is_valid_slug() {
        let slug = slugify(&"Sehr langer Titel ".repeat(20));
        assert!(slug.len() <= MAX_SLUG_LENGTH);
        validate_slug(&slug).unwrap();
    }

    #[test]
    fn slug_validation() {
        assert!(validate_slug("sommerfest-2026").is_ok());
        assert!(validate_slug("Sommerfest").is_err());
        assert!(validate_slug("a--b").is_err());
        assert!(validate_slug("-a").is_err());
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn date_range() {
        let start = Utc::now();
        assert!(validate_date_range(start, None).is_ok());
        assert!(validate_date_range(start, Some(start)).is_ok());
        assert!(validate_date_range(start, Some(start + Duration::hours(2))).is_ok());
        assert!(validate_date_range(start, Some(start - Duration::minutes(1))).is_err());
    }
}
