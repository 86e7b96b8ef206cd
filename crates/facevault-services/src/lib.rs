//! FaceVault Services Layer
//!
//! Business services behind the HTTP surface: the upload ingestion pipeline
//! (single images and zip archives) and face search. Keep coordination here;
//! keep thin HTTP handling in facevault-api.

pub mod faces;
pub mod ingest;

#[cfg(test)]
pub(crate) mod test_support;

pub use faces::{
    DynamoFaceMetadataStore, FaceIndex, FaceMetadataStore, FaceSearchError, FaceSearchService,
    RekognitionFaceIndex,
};
pub use ingest::{Clock, IngestError, IngestPipeline, SystemClock, UploadRequest};
pub use facevault_storage::{create_storage, Storage, StorageBackend, StorageError, StorageResult};
