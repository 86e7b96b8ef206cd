use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use facevault_core::models::{FaceMatch, FaceMetadata, FaceRecord};
use facevault_core::Config;
use facevault_storage::sdk::load_sdk_config;
use facevault_storage::Storage;
use futures::future::try_join_all;

use super::index::{FaceIndex, RekognitionFaceIndex};
use super::metadata::{DynamoFaceMetadataStore, FaceMetadataStore};

#[derive(Debug, thiserror::Error)]
pub enum FaceSearchError {
    #[error("No matching faces found")]
    NoMatchingFaces,

    /// The search image was rejected (no detectable face, bad format, too large).
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Face recognition failed: {0}")]
    Recognition(String),

    #[error("Face metadata query failed: {0}")]
    MetadataQuery(String),
}

/// Finds stored images containing the faces of a search image.
#[derive(Clone)]
pub struct FaceSearchService {
    index: Arc<dyn FaceIndex>,
    metadata: Arc<dyn FaceMetadataStore>,
    storage: Arc<dyn Storage>,
}

impl FaceSearchService {
    pub fn new(
        index: Arc<dyn FaceIndex>,
        metadata: Arc<dyn FaceMetadataStore>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self {
            index,
            metadata,
            storage,
        }
    }

    /// Build the Rekognition + DynamoDB backed service.
    ///
    /// Returns `None` when face search is not configured.
    pub async fn from_config(
        config: &Config,
        storage: Arc<dyn Storage>,
    ) -> anyhow::Result<Option<Self>> {
        let Some(faces) = config.face_search() else {
            return Ok(None);
        };
        let region = config
            .aws_region()
            .context("AWS_REGION must be set for face search")?;

        let sdk_config = load_sdk_config(region, config.aws_credentials()).await;

        tracing::info!(
            collection_id = %faces.collection_id,
            table = %faces.table_name,
            region = %region,
            "Face search enabled"
        );

        Ok(Some(Self::new(
            Arc::new(RekognitionFaceIndex::new(&sdk_config, faces)),
            Arc::new(DynamoFaceMetadataStore::new(&sdk_config, faces.table_name.clone())),
            storage,
        )))
    }

    /// Match `image` against the index and return the metadata of every match,
    /// in match order.
    ///
    /// Fails with `NoMatchingFaces` when nothing matches. Any metadata query
    /// failure fails the whole search.
    pub async fn search(&self, image: Vec<u8>) -> Result<Vec<FaceMetadata>, FaceSearchError> {
        let start = Instant::now();

        let matches = self.index.search_faces_by_image(image).await?;
        if matches.is_empty() {
            return Err(FaceSearchError::NoMatchingFaces);
        }

        let lookups = matches.iter().map(|m| self.metadata_for_match(m));
        let faces: Vec<FaceMetadata> = try_join_all(lookups).await?.into_iter().flatten().collect();

        tracing::info!(
            match_count = matches.len(),
            result_count = faces.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Face search completed"
        );

        Ok(faces)
    }

    async fn metadata_for_match(
        &self,
        face_match: &FaceMatch,
    ) -> Result<Vec<FaceMetadata>, FaceSearchError> {
        let records = self.metadata.records_for_face(&face_match.face_id).await?;

        if records.is_empty() {
            tracing::warn!(face_id = %face_match.face_id, "No metadata found for matched face");
        }

        Ok(records
            .into_iter()
            .map(|record| self.to_metadata(record))
            .collect())
    }

    fn to_metadata(&self, record: FaceRecord) -> FaceMetadata {
        if record.face_id.is_none() || record.image_id.is_none() {
            tracing::warn!(
                face_id = ?record.face_id,
                image_id = ?record.image_id,
                "Face metadata item is missing required attributes"
            );
        }

        FaceMetadata {
            image_url: record.image_id.as_deref().map(|id| self.storage.object_url(id)),
            face_id: record.face_id,
            other_data: record.other_data,
        }
    }
}
