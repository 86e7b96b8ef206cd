use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{extract_multipart_file, upload_media_type, validate_file_size};
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use facevault_core::models::UploadResponse;
use facevault_services::UploadRequest;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/upload",
    tag = "files",
    request_body(content = Vec<u8>, description = "Image (png, jpg, jpeg) or zip archive of images", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Files uploaded successfully", body = UploadResponse),
        (status = 400, description = "Invalid file type, empty file or no valid images", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 502, description = "Writing to storage failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_files"))]
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let file = extract_multipart_file(multipart).await?;

    let declared_media_type = upload_media_type(&file.content_type)?;
    validate_file_size(file.data.len(), state.config.max_file_size_bytes())?;

    tracing::debug!(
        file_name = %file.file_name,
        content_type = %file.content_type,
        size_bytes = file.data.len(),
        "Upload received"
    );

    let request = UploadRequest {
        raw_bytes: file.data,
        declared_media_type,
        original_name: file.file_name,
    };
    let uploaded_files = state.ingest.ingest(request).await?;

    Ok(Json(UploadResponse::new(uploaded_files)))
}
