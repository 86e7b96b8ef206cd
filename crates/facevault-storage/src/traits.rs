//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use facevault_core::models::ObjectSummary;
use futures::Stream;
use std::fmt;
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("List failed: {0}")]
    ListFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Chunked object body.
pub type ObjectStream = Pin<Box<dyn Stream<Item = StorageResult<Bytes>> + Send>>;

/// An object opened for reading.
pub struct StoredObject {
    /// Content type recorded at upload time, if the backend kept one.
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub body: ObjectStream,
}

impl fmt::Debug for StoredObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredObject")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) implement this trait so the
/// ingestion pipeline and the HTTP handlers never depend on a concrete backend.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `key` with the given content type and return its public URL.
    ///
    /// An existing object with the same key is overwritten.
    async fn put(&self, key: &str, content_type: &str, data: Vec<u8>) -> StorageResult<String>;

    /// Open an object for streaming. Missing keys yield `StorageError::NotFound`.
    async fn open(&self, key: &str) -> StorageResult<StoredObject>;

    /// Delete an object. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// List every object in the store, ordered by key.
    async fn list(&self) -> StorageResult<Vec<ObjectSummary>>;

    /// Public URL of `key`. Does not check that the object exists.
    fn object_url(&self, key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
