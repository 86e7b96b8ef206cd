use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{extract_multipart_file, search_media_type, validate_file_size};
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use facevault_core::models::SearchFacesResponse;
use facevault_core::AppError;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/searchfaces",
    tag = "faces",
    request_body(content = Vec<u8>, description = "Image to search for (png, jpg, jpeg)", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Matching faces found", body = SearchFacesResponse),
        (status = 400, description = "Invalid or unreadable image", body = ErrorResponse),
        (status = 404, description = "No matching faces found", body = ErrorResponse),
        (status = 502, description = "Recognition or metadata service failed", body = ErrorResponse),
        (status = 503, description = "Face search is not configured", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "search_faces"))]
pub async fn search_faces(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let face_search = state.face_search.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("Face search is not configured".to_string())
    })?;

    let file = extract_multipart_file(multipart).await?;
    search_media_type(&file.content_type)?;
    validate_file_size(file.data.len(), state.config.max_file_size_bytes())?;

    let faces = face_search.search(file.data).await?;

    Ok(Json(SearchFacesResponse::new(faces)))
}
