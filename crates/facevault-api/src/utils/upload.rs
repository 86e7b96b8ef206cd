//! Common utilities for the multipart upload handlers

use axum::extract::Multipart;
use axum::http::StatusCode;
use facevault_core::{AppError, DeclaredMediaType};

/// The single `file` field of a multipart request.
#[derive(Debug)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

fn multipart_error(context: &str, status: StatusCode, message: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Request body exceeds the upload size limit".to_string())
    } else {
        AppError::InvalidInput(format!("{}: {}", context, message))
    }
}

/// Extract the field named "file" from a multipart form.
/// Other fields are ignored; a second "file" field is rejected.
pub async fn extract_multipart_file(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read multipart", e.status(), e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        if file.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let file_name = field.file_name().unwrap_or("unknown").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read file data", e.status(), e.body_text()))?;

        file = Some(UploadedFile {
            data: data.to_vec(),
            file_name,
            content_type,
        });
    }

    file.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size == 0 {
        return Err(AppError::InvalidInput("Uploaded file is empty".to_string()));
    }
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Classify the declared type of an upload: png, jpeg or zip.
pub fn upload_media_type(content_type: &str) -> Result<DeclaredMediaType, AppError> {
    DeclaredMediaType::from_mime(content_type).ok_or_else(|| {
        AppError::InvalidInput(
            "Only image files (png, jpg, jpeg) or zip files are allowed".to_string(),
        )
    })
}

/// Classify the declared type of a face search image: images only.
pub fn search_media_type(content_type: &str) -> Result<DeclaredMediaType, AppError> {
    DeclaredMediaType::from_mime(content_type)
        .filter(DeclaredMediaType::is_image)
        .ok_or_else(|| {
            AppError::InvalidInput("Only image files (png, jpg, jpeg) are allowed".to_string())
        })
}
