use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use facevault_core::models::MessageResponse;
use std::sync::Arc;

/// Deleting a file that does not exist still succeeds.
#[utoipa::path(
    delete,
    path = "/delete/{file_name}",
    tag = "files",
    params(
        ("file_name" = String, Path, description = "Stored file name")
    ),
    responses(
        (status = 200, description = "File deleted successfully", body = MessageResponse),
        (status = 400, description = "Invalid file name", body = ErrorResponse),
        (status = 500, description = "Deletion failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "delete_file"))]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(file_name): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.storage.delete(&file_name).await?;

    tracing::info!(key = %file_name, "File deleted");

    Ok(Json(MessageResponse::new("File deleted successfully")))
}
