//! Multipart form reading for image uploads.

use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;
use gemeinde_core::media::{inspect_image, object_key, ImageInfo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A parsed multipart form: the optional `file` part plus text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<Bytes>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    /// Drain `multipart`. Only the `file` part is read as bytes; every other
    /// named part is read as text.
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "" => {}
                "file" => {
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    // Browsers send an empty part when no file was chosen.
                    if !data.is_empty() {
                        form.file = Some(data);
                    }
                }
                _ => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn require_file(&self) -> AppResult<&Bytes> {
        self.file
            .as_ref()
            .ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))
    }
}

/// An image written to the blob store.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub key: String,
    pub info: ImageInfo,
    pub size_bytes: usize,
}

/// Validate `bytes` as an image and store it under `prefix[/scope]`.
pub async fn store_image(
    state: &AppState,
    bytes: Bytes,
    prefix: &str,
    scope: Option<&str>,
) -> AppResult<StoredImage> {
    let info = inspect_image(&bytes, state.config.max_upload_bytes)?;
    let key = object_key(prefix, scope, info.extension);
    let size_bytes = bytes.len();

    state.blobs.put(&key, bytes, info.content_type).await?;
    tracing::info!(key = %key, size_bytes, content_type = info.content_type, "Image stored");

    Ok(StoredImage {
        key,
        info,
        size_bytes,
    })
}
