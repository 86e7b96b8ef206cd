//! Service initialization and application state setup

use crate::state::AppState;
use anyhow::Context;
use facevault_core::Config;
use facevault_services::{create_storage, FaceSearchService, IngestPipeline};
use std::sync::Arc;

/// Build storage, the ingest pipeline and (when configured) face search.
pub async fn initialize_services(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage")?;
    tracing::info!(backend = %storage.backend_type(), "Storage initialized");

    let ingest = IngestPipeline::from_config(storage.clone(), config);

    let face_search = FaceSearchService::from_config(config, storage.clone())
        .await
        .context("Failed to initialize face search")?;
    if face_search.is_none() {
        tracing::warn!("COLLECTION_ID or DYNAMODB_TABLE not set, face search disabled");
    }

    Ok(Arc::new(AppState {
        config: config.clone(),
        storage,
        ingest,
        face_search,
    }))
}
