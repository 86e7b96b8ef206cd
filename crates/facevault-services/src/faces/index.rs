use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_rekognition::error::{DisplayErrorContext, SdkError};
use aws_sdk_rekognition::operation::search_faces_by_image::SearchFacesByImageError;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::Image;
use aws_sdk_rekognition::Client;
use facevault_core::models::FaceMatch;
use facevault_core::FaceSearchConfig;

use super::service::FaceSearchError;

/// Recognition index holding the known faces.
#[async_trait]
pub trait FaceIndex: Send + Sync {
    /// Faces in the index that match the largest face in `image`, best match first.
    async fn search_faces_by_image(&self, image: Vec<u8>) -> Result<Vec<FaceMatch>, FaceSearchError>;
}

/// `FaceIndex` backed by an AWS Rekognition collection.
#[derive(Clone)]
pub struct RekognitionFaceIndex {
    client: Client,
    collection_id: String,
    max_faces: i32,
    face_match_threshold: f32,
}

impl RekognitionFaceIndex {
    pub fn new(sdk_config: &SdkConfig, config: &FaceSearchConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
            collection_id: config.collection_id.clone(),
            max_faces: config.max_faces,
            face_match_threshold: config.face_match_threshold,
        }
    }
}

#[async_trait]
impl FaceIndex for RekognitionFaceIndex {
    async fn search_faces_by_image(&self, image: Vec<u8>) -> Result<Vec<FaceMatch>, FaceSearchError> {
        let start = std::time::Instant::now();
        let size = image.len();

        let output = self
            .client
            .search_faces_by_image()
            .collection_id(&self.collection_id)
            .image(Image::builder().bytes(Blob::new(image)).build())
            .max_faces(self.max_faces)
            .face_match_threshold(self.face_match_threshold)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(
                    error = %DisplayErrorContext(&e),
                    collection_id = %self.collection_id,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Rekognition face search failed"
                );
                match &e {
                    SdkError::ServiceError(service_err)
                        if matches!(
                            service_err.err(),
                            SearchFacesByImageError::InvalidParameterException(_)
                                | SearchFacesByImageError::InvalidImageFormatException(_)
                                | SearchFacesByImageError::ImageTooLargeException(_)
                        ) =>
                    {
                        FaceSearchError::InvalidImage(service_err.err().to_string())
                    }
                    _ => FaceSearchError::Recognition(DisplayErrorContext(&e).to_string()),
                }
            })?;

        let matches: Vec<FaceMatch> = output
            .face_matches()
            .iter()
            .filter_map(|m| {
                let face_id = m.face().and_then(|face| face.face_id())?;
                Some(FaceMatch {
                    face_id: face_id.to_string(),
                    similarity: m.similarity(),
                })
            })
            .collect();

        tracing::info!(
            collection_id = %self.collection_id,
            match_count = matches.len(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Rekognition face search completed"
        );

        Ok(matches)
    }
}
