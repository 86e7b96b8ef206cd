//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Domain errors (`StorageError`,
//! `IngestError`, `FaceSearchError`) convert into `AppError` here so every failure
//! renders with the same status mapping, body shape and log level.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use facevault_core::{AppError, ErrorMetadata, LogLevel};
use facevault_services::{FaceSearchError, IngestError, StorageError};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: both the trait and AppError are foreign to this crate)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app_error = match err {
            StorageError::NotFound(_) => AppError::NotFound("File not found".to_string()),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            other => AppError::Storage(other.to_string()),
        };
        HttpAppError(app_error)
    }
}

impl From<IngestError> for HttpAppError {
    fn from(err: IngestError) -> Self {
        let app_error = match err {
            IngestError::UnsupportedFileType { .. } => {
                AppError::InvalidInput("Only image files (png, jpg, jpeg) are allowed".to_string())
            }
            IngestError::NoValidImagesFound => {
                AppError::InvalidInput("No valid image files found in the zip".to_string())
            }
            IngestError::MalformedArchive(msg) => {
                AppError::InvalidInput(format!("Invalid zip archive: {}", msg))
            }
            err @ IngestError::EntryTooLarge { .. } => AppError::InvalidInput(err.to_string()),
            err @ IngestError::StoreWriteFailed { .. } => {
                AppError::UpstreamService(error_chain(&err))
            }
        };
        HttpAppError(app_error)
    }
}

impl From<FaceSearchError> for HttpAppError {
    fn from(err: FaceSearchError) -> Self {
        let app_error = match err {
            FaceSearchError::NoMatchingFaces => {
                AppError::NotFound("No matching faces found".to_string())
            }
            FaceSearchError::InvalidImage(msg) => AppError::InvalidInput(msg),
            other @ (FaceSearchError::Recognition(_) | FaceSearchError::MetadataQuery(_)) => {
                AppError::UpstreamService(other.to_string())
            }
        };
        HttpAppError(app_error)
    }
}

/// `err` followed by its sources, joined with ": ".
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details never leave the process in production or for sensitive errors
        let show_details = !is_production_env() && !app_error.is_sensitive();

        let body = ErrorResponse {
            error: app_error.client_message(),
            details: show_details.then(|| app_error.detailed_message()),
            error_type: show_details.then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        };

        (status, Json(body)).into_response()
    }
}
