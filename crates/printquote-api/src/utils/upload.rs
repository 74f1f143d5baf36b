//! Multipart parsing and on-disk staging for mesh uploads

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::Bytes;
use printquote_core::AppError;
use std::path::Path;
use tempfile::TempPath;

use crate::constants::{DEFAULT_COLOR, DEFAULT_MATERIAL};

/// Longest material/color value accepted from the form.
const MAX_OPTION_LEN: usize = 64;

#[derive(Debug)]
pub struct QuoteUpload {
    pub data: Bytes,
    pub filename: String,
    pub material: String,
    pub color: String,
}

fn multipart_error(e: MultipartError, what: &str) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Request body too large: {}", e.body_text()))
    } else {
        AppError::InvalidInput(format!("Failed to read {}: {}", what, e.body_text()))
    }
}

/// Extract the `file`, `material` and `color` fields.
/// Only one field named "file" is accepted; unknown fields are ignored.
pub async fn extract_quote_upload(mut multipart: Multipart) -> Result<QuoteUpload, AppError> {
    let mut file: Option<(Bytes, String)> = None;
    let mut material: Option<String> = None;
    let mut color: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "multipart"))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "file" => {
                if file.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    ));
                }
                let filename = field.file_name().unwrap_or("model.stl").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, "file data"))?;
                file = Some((data, filename));
            }
            "material" | "color" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, "form field"))?;
                let value = value.trim().to_string();
                if value.chars().count() > MAX_OPTION_LEN {
                    return Err(AppError::InvalidInput(format!(
                        "'{}' must be at most {} characters",
                        field_name, MAX_OPTION_LEN
                    )));
                }
                if !value.is_empty() {
                    if field_name == "material" {
                        material = Some(value);
                    } else {
                        color = Some(value);
                    }
                }
            }
            _ => {
                tracing::debug!(field = %field_name, "Ignoring unknown multipart field");
            }
        }
    }

    let (data, filename) =
        file.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;

    Ok(QuoteUpload {
        data,
        filename,
        material: material.unwrap_or_else(|| DEFAULT_MATERIAL.to_string()),
        color: color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
    })
}

/// Write the upload into `upload_dir` under a random name keeping its extension.
///
/// The returned path deletes the file when dropped.
pub async fn stage_upload(
    upload_dir: &Path,
    extension: &str,
    data: &[u8],
) -> Result<TempPath, AppError> {
    tokio::fs::create_dir_all(upload_dir).await.map_err(|e| {
        AppError::Internal(format!(
            "Failed to create upload directory {}: {}",
            upload_dir.display(),
            e
        ))
    })?;

    let file = tempfile::Builder::new()
        .prefix("mesh-")
        .suffix(&format!(".{}", extension))
        .tempfile_in(upload_dir)
        .map_err(|e| AppError::Internal(format!("Failed to create upload file: {}", e)))?;
    let path = file.into_temp_path();

    tokio::fs::write(&path, data)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to write upload: {}", e)))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stage_upload_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = dir.path().join("uploads");

        let path = stage_upload(&uploads, "stl", b"solid cube").await.unwrap();
        let on_disk = path.to_path_buf();

        assert!(on_disk.exists());
        assert_eq!(on_disk.extension().unwrap(), "stl");
        assert_eq!(std::fs::read(&on_disk).unwrap(), b"solid cube");

        drop(path);
        assert!(!on_disk.exists());
    }
}
