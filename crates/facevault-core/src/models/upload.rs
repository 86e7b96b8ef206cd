use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One stored image produced by an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadResult {
    /// Key under which the image was written
    #[serde(rename = "fileName")]
    pub stored_name: String,
    #[serde(rename = "fileType")]
    pub content_type: String,
    #[serde(rename = "fileUrl")]
    pub location_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub uploaded_files: Vec<UploadResult>,
}

impl UploadResponse {
    pub fn new(uploaded_files: Vec<UploadResult>) -> Self {
        Self {
            message: "Files uploaded successfully".to_string(),
            uploaded_files,
        }
    }
}
