use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use facevault_core::AppError;
use futures::StreamExt;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/view/{file_name}",
    tag = "files",
    params(
        ("file_name" = String, Path, description = "Stored file name")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 400, description = "Invalid file name", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "view_file"))]
pub async fn view_file(
    State(state): State<Arc<AppState>>,
    Path(file_name): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let object = state.storage.open(&file_name).await?;

    let content_type = object
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let disposition = format!("inline; filename=\"{}\"", file_name.replace('"', ""));

    let stream = object.body.map(|result| {
        result.map_err(|e| {
            tracing::error!(error = %e, "Error streaming stored file");
            std::io::Error::other(e.to_string())
        })
    });

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, disposition);
    if let Some(length) = object.content_length {
        builder = builder.header(header::CONTENT_LENGTH, length);
    }

    builder
        .body(Body::from_stream(stream))
        .map_err(|e| HttpAppError::from(AppError::Internal(format!("Failed to build response: {}", e))))
}
