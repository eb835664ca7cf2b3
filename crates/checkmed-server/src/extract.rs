//! Multipart form extraction shared by the upload endpoints.

use crate::response::ApiError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use checkmed_core::ImageBlob;
use std::collections::HashMap;

const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// All parts of one multipart submission, split into text fields and file
/// uploads. Parts with a filename are files; everything else is text.
#[derive(Debug, Default)]
pub struct FormData {
    texts: HashMap<String, String>,
    files: HashMap<String, ImageBlob>,
}

impl FormData {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut data = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            if field.file_name().is_some() {
                let mime_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_IMAGE_MIME)
                    .to_string();
                let bytes = field.bytes().await.map_err(bad_multipart)?.to_vec();
                // Browsers submit empty file parts for untouched inputs.
                if !bytes.is_empty() {
                    data.files.insert(name, ImageBlob::new(bytes, mime_type));
                }
            } else {
                let text = field.text().await.map_err(bad_multipart)?;
                data.texts.insert(name, text);
            }
        }
        Ok(data)
    }

    /// Text field value, empty string when absent. Validation of required
    /// fields belongs to the normalizer, not the transport.
    pub fn text(&self, name: &str) -> String {
        self.texts.get(name).cloned().unwrap_or_default()
    }

    pub fn take_file(&mut self, name: &str) -> Option<ImageBlob> {
        self.files.remove(name)
    }
}

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::new(
        StatusCode::BAD_REQUEST,
        format!("malformed multipart body: {err}"),
    )
}
