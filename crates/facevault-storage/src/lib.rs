//! FaceVault Storage Library
//!
//! Object storage abstraction with an S3 backend and a local filesystem backend.
//!
//! # Storage key format
//!
//! Objects live at the bucket root under their stored name (for example
//! `upload_1700000000000_cat.png`). Keys must be non-empty, must not contain a
//! `..` segment and must not start with `/`. Validation lives in the `keys`
//! module so both backends reject the same keys.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
#[cfg(feature = "storage-s3")]
pub mod sdk;
pub mod traits;

// Re-export commonly used types
pub use facevault_core::StorageBackend;
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectStream, Storage, StorageError, StorageResult, StoredObject};
