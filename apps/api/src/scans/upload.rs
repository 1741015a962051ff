//! Upload intake — reads the multipart `file` field and rejects anything the
//! extraction service cannot parse before it leaves the process.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;

use crate::errors::AppError;
use crate::extraction::UploadedFile;

pub const FILE_FIELD: &str = "file";

pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

pub fn validate_content_type(content_type: &str) -> Result<(), AppError> {
    // Ignore parameters such as "; charset=binary"
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    if ALLOWED_CONTENT_TYPES.contains(&essence.as_str()) {
        Ok(())
    } else {
        Err(AppError::UnsupportedFileType(content_type.to_string()))
    }
}

pub fn validate_size(len: usize, max_bytes: usize) -> Result<(), AppError> {
    if len == 0 {
        return Err(AppError::Validation("uploaded file is empty".to_string()));
    }
    if len > max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "uploaded file is {len} bytes; the limit is {max_bytes}"
        )));
    }
    Ok(())
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("invalid multipart body: {}", e.body_text()))
    }
}

/// Pulls the first `file` field out of the request. Other fields are skipped.
pub async fn read_upload(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("resume").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        validate_content_type(&content_type)?;

        let bytes = field.bytes().await.map_err(multipart_error)?;
        validate_size(bytes.len(), max_bytes)?;

        return Ok(UploadedFile {
            filename,
            content_type,
            bytes,
        });
    }

    Err(AppError::Validation(format!(
        "multipart field '{FILE_FIELD}' is required"
    )))
}
