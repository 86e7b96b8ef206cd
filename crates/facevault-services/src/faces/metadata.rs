use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use facevault_core::models::FaceRecord;

use super::service::FaceSearchError;

const FACE_ID_ATTRIBUTE: &str = "FaceId";
const IMAGE_ID_ATTRIBUTE: &str = "ImageId";
const OTHER_DATA_ATTRIBUTE: &str = "OtherData";

/// Item store holding metadata for indexed faces.
#[async_trait]
pub trait FaceMetadataStore: Send + Sync {
    /// Every item stored for `face_id`. Empty when the face has no metadata.
    async fn records_for_face(&self, face_id: &str) -> Result<Vec<FaceRecord>, FaceSearchError>;
}

/// `FaceMetadataStore` backed by a DynamoDB table keyed on `FaceId`.
#[derive(Clone)]
pub struct DynamoFaceMetadataStore {
    client: Client,
    table_name: String,
}

impl DynamoFaceMetadataStore {
    pub fn new(sdk_config: &SdkConfig, table_name: impl Into<String>) -> Self {
        Self {
            client: Client::new(sdk_config),
            table_name: table_name.into(),
        }
    }
}

fn string_attribute(item: &HashMap<String, AttributeValue>, name: &str) -> Option<String> {
    item.get(name).and_then(|v| v.as_s().ok()).cloned()
}

fn to_record(item: &HashMap<String, AttributeValue>) -> FaceRecord {
    FaceRecord {
        face_id: string_attribute(item, FACE_ID_ATTRIBUTE),
        image_id: string_attribute(item, IMAGE_ID_ATTRIBUTE),
        other_data: string_attribute(item, OTHER_DATA_ATTRIBUTE),
    }
}

#[async_trait]
impl FaceMetadataStore for DynamoFaceMetadataStore {
    async fn records_for_face(&self, face_id: &str) -> Result<Vec<FaceRecord>, FaceSearchError> {
        let start = std::time::Instant::now();
        let mut records = Vec::new();
        let mut exclusive_start_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let output = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("FaceId = :faceId")
                .expression_attribute_values(":faceId", AttributeValue::S(face_id.to_string()))
                .set_exclusive_start_key(exclusive_start_key.take())
                .send()
                .await
                .map_err(|e| {
                    tracing::warn!(
                        error = %DisplayErrorContext(&e),
                        table = %self.table_name,
                        face_id = %face_id,
                        "DynamoDB face metadata query failed"
                    );
                    FaceSearchError::MetadataQuery(DisplayErrorContext(&e).to_string())
                })?;

            records.extend(output.items().iter().map(to_record));

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key.clone()),
                _ => break,
            }
        }

        tracing::debug!(
            table = %self.table_name,
            face_id = %face_id,
            item_count = records.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "DynamoDB face metadata query completed"
        );

        Ok(records)
    }
}
