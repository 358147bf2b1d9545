//! Uploaded image inspection and blob key naming.
//!
//! The content type of an upload is sniffed from its bytes instead of
//! trusting the client header, and only the formats below are accepted.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};
use serde::Serialize;

use crate::error::CoreError;

/// Default upload size limit (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Key prefix for gallery images.
pub const GALLERY_PREFIX: &str = "gallery";
/// Key prefix for portrait photos.
pub const PORTRAIT_PREFIX: &str = "portraits";
/// Key prefix for news and event header images.
pub const CONTENT_PREFIX: &str = "content";

/// Facts about an accepted image upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub content_type: &'static str,
    pub extension: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Sniff, whitelist and measure an uploaded image.
pub fn inspect_image(bytes: &[u8], max_bytes: usize) -> Result<ImageInfo, CoreError> {
    if bytes.is_empty() {
        return Err(CoreError::Validation("Uploaded file is empty".into()));
    }
    if bytes.len() > max_bytes {
        return Err(CoreError::Validation(format!(
            "Uploaded file is {} bytes; the limit is {max_bytes} bytes",
            bytes.len()
        )));
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CoreError::Validation(format!("Unreadable image: {e}")))?;

    let (content_type, extension) = match reader.format() {
        Some(ImageFormat::Jpeg) => ("image/jpeg", "jpg"),
        Some(ImageFormat::Png) => ("image/png", "png"),
        Some(ImageFormat::WebP) => ("image/webp", "webp"),
        Some(ImageFormat::Gif) => ("image/gif", "gif"),
        _ => {
            return Err(CoreError::Validation(
                "Unsupported image format. Allowed: JPEG, PNG, WebP, GIF".into(),
            ))
        }
    };

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| CoreError::Validation(format!("Corrupt image header: {e}")))?;

    Ok(ImageInfo {
        content_type,
        extension,
        width,
        height,
    })
}

/// Build a fresh object key such as `gallery/12/0190d3c4-....png`.
pub fn object_key(prefix: &str, scope: Option<&str>, extension: &str) -> String {
    let id = uuid::Uuid::now_v7();
    match scope {
        Some(scope) => format!("{prefix}/{scope}/{id}.{extension}"),
        None => format!("{prefix}/{id}.{extension}"),
    }
}

/// Reject keys that could escape the bucket namespace when served back.
pub fn validate_object_key(key: &str) -> Result<(), CoreError> {
    let ok = !key.is_empty()
        && !key.starts_with('/')
        && key
            .split('/')
            .all(|seg| !seg.is_empty() && seg != "." && seg != "..")
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.'));
    if ok {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("Invalid media key '{key}'")))
    }
}

/// Validate a key that a news item or event may use as its `image_key`.
///
/// Only images uploaded through the content endpoint qualify; gallery and
/// portrait blobs belong to their own rows.
pub fn validate_content_key(key: &str) -> Result<(), CoreError> {
    validate_object_key(key)?;
    if is_content_key(key) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "'{key}' is not a content image; upload it via /media first"
        )))
    }
}

/// Whether `key` lives under [`CONTENT_PREFIX`].
pub fn is_content_key(key: &str) -> bool {
    key.strip_prefix(CONTENT_PREFIX)
        .is_some_and(|rest| rest.starts_with('/'))
}
