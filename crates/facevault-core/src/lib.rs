//! FaceVault Core Library
//!
//! Configuration, error types, domain models and media type rules shared by the
//! storage, services and API crates.

pub mod config;
pub mod error;
pub mod media_type;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{AppConfig, AwsCredentials, Config, FaceSearchConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use media_type::DeclaredMediaType;
pub use storage_types::StorageBackend;
