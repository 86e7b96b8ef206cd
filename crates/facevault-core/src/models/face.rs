use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A face returned by the recognition index for a search image.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceMatch {
    pub face_id: String,
    pub similarity: Option<f32>,
}

/// Raw metadata item stored for an indexed face.
///
/// Every attribute is optional because the item store does not enforce a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaceRecord {
    pub face_id: Option<String>,
    pub image_id: Option<String>,
    pub other_data: Option<String>,
}

/// Face match joined with its stored metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FaceMetadata {
    pub face_id: Option<String>,
    pub image_url: Option<String>,
    pub other_data: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchFacesResponse {
    pub message: String,
    pub faces: Vec<FaceMetadata>,
}

impl SearchFacesResponse {
    pub fn new(faces: Vec<FaceMetadata>) -> Self {
        Self {
            message: "Matching faces found".to_string(),
            faces,
        }
    }
}
