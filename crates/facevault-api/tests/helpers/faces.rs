//! In-memory face index and metadata store.

use async_trait::async_trait;
use facevault_core::models::{FaceMatch, FaceRecord};
use facevault_services::{FaceIndex, FaceMetadataStore, FaceSearchError};
use std::collections::HashMap;

pub struct FakeIndex {
    pub matches: Vec<FaceMatch>,
}

#[async_trait]
impl FaceIndex for FakeIndex {
    async fn search_faces_by_image(&self, image: Vec<u8>) -> Result<Vec<FaceMatch>, FaceSearchError> {
        if image.is_empty() {
            return Err(FaceSearchError::InvalidImage("empty image".to_string()));
        }
        Ok(self.matches.clone())
    }
}

pub struct FakeMetadata {
    pub records: HashMap<String, Vec<FaceRecord>>,
}

#[async_trait]
impl FaceMetadataStore for FakeMetadata {
    async fn records_for_face(&self, face_id: &str) -> Result<Vec<FaceRecord>, FaceSearchError> {
        Ok(self.records.get(face_id).cloned().unwrap_or_default())
    }
}

pub struct FakeFaces {
    pub index: FakeIndex,
    pub metadata: FakeMetadata,
}

impl FakeFaces {
    /// Nothing in the index matches.
    pub fn empty() -> Self {
        Self {
            index: FakeIndex { matches: vec![] },
            metadata: FakeMetadata {
                records: HashMap::new(),
            },
        }
    }

    /// One matched face stored in `image_id`.
    pub fn single(face_id: &str, image_id: &str, other_data: &str) -> Self {
        let record = FaceRecord {
            face_id: Some(face_id.to_string()),
            image_id: Some(image_id.to_string()),
            other_data: Some(other_data.to_string()),
        };
        Self {
            index: FakeIndex {
                matches: vec![FaceMatch {
                    face_id: face_id.to_string(),
                    similarity: Some(99.1),
                }],
            },
            metadata: FakeMetadata {
                records: HashMap::from([(face_id.to_string(), vec![record])]),
            },
        }
    }
}
