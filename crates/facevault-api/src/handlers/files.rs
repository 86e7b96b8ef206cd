use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use facevault_core::models::ListFilesResponse;
use facevault_core::AppError;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    responses(
        (status = 200, description = "Stored files", body = ListFilesResponse),
        (status = 404, description = "No files found in bucket", body = ErrorResponse),
        (status = 500, description = "Listing failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_files"))]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let files = state.storage.list().await?;

    if files.is_empty() {
        return Err(AppError::NotFound("No files found in bucket".to_string()).into());
    }

    tracing::debug!(count = files.len(), "Listed stored files");

    Ok(Json(ListFilesResponse { files }))
}
