//! Error types module
//!
//! All request-level failures are unified under `AppError`. Domain crates keep their
//! own `thiserror` enums (storage, ingestion, face search) and the HTTP layer folds
//! them into `AppError` before rendering.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like upstream hiccups
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Upstream service error: {0}")]
    UpstreamService(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

/// How one `AppError` variant is presented to clients and logs.
struct Presentation {
    status: u16,
    code: &'static str,
    recoverable: bool,
    action: Option<&'static str>,
    sensitive: bool,
    level: LogLevel,
}

const RETRY_LATER: Option<&str> = Some("Retry after a short delay");

impl AppError {
    fn presentation(&self) -> Presentation {
        let client_error = |status, code, action| Presentation {
            status,
            code,
            recoverable: false,
            action: Some(action),
            sensitive: false,
            level: LogLevel::Debug,
        };

        match self {
            AppError::InvalidInput(_) => client_error(
                400,
                "INVALID_INPUT",
                "Check request parameters and try again",
            ),
            AppError::BadRequest(_) => {
                client_error(400, "BAD_REQUEST", "Check request format and parameters")
            }
            AppError::NotFound(_) => {
                client_error(404, "NOT_FOUND", "Verify the requested resource exists")
            }
            AppError::PayloadTooLarge(_) => {
                client_error(413, "PAYLOAD_TOO_LARGE", "Reduce file size and try again")
            }
            AppError::Storage(_) => Presentation {
                status: 500,
                code: "STORAGE_ERROR",
                recoverable: true,
                action: RETRY_LATER,
                sensitive: true,
                level: LogLevel::Error,
            },
            AppError::UpstreamService(_) => Presentation {
                status: 502,
                code: "UPSTREAM_SERVICE_ERROR",
                recoverable: true,
                action: RETRY_LATER,
                sensitive: true,
                level: LogLevel::Warn,
            },
            AppError::ServiceUnavailable(_) => Presentation {
                status: 503,
                code: "SERVICE_UNAVAILABLE",
                recoverable: false,
                action: Some("Contact the operator to enable this feature"),
                sensitive: false,
                level: LogLevel::Warn,
            },
            AppError::Internal(_) | AppError::InternalWithSource { .. } => Presentation {
                status: 500,
                code: "INTERNAL_ERROR",
                recoverable: true,
                action: RETRY_LATER,
                sensitive: true,
                level: LogLevel::Error,
            },
        }
    }

    /// Variant name, shown as `error_type` outside production.
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::BadRequest(_) => "BadRequest",
            AppError::NotFound(_) => "NotFound",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Storage(_) => "Storage",
            AppError::UpstreamService(_) => "UpstreamService",
            AppError::ServiceUnavailable(_) => "ServiceUnavailable",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Message followed by up to five causes, one per line.
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        const MAX_CAUSES: usize = 5;

        let mut details = self.to_string();
        let mut causes = std::iter::successors(self.source(), |&err| err.source());
        for cause in causes.by_ref().take(MAX_CAUSES) {
            details.push_str(&format!("\n  Caused by: {}", cause));
        }
        if causes.next().is_some() {
            details.push_str("\n  ... (truncated)");
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        self.presentation().status
    }

    fn error_code(&self) -> &'static str {
        self.presentation().code
    }

    fn is_recoverable(&self) -> bool {
        self.presentation().recoverable
    }

    fn suggested_action(&self) -> Option<&'static str> {
        self.presentation().action
    }

    fn is_sensitive(&self) -> bool {
        self.presentation().sensitive
    }

    fn log_level(&self) -> LogLevel {
        self.presentation().level
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::ServiceUnavailable(msg) => msg.clone(),
            AppError::Storage(_) => "Failed to access storage".to_string(),
            AppError::UpstreamService(_) => "Upstream service request failed".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}
