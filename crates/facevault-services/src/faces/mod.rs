//! Face search: match a search image against the recognition index and join
//! every match with the metadata stored for that face.

mod index;
mod metadata;
mod service;

pub use index::{FaceIndex, RekognitionFaceIndex};
pub use metadata::{DynamoFaceMetadataStore, FaceMetadataStore};
pub use service::{FaceSearchError, FaceSearchService};
