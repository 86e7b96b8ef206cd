//! Shared application state.

use facevault_core::Config;
use facevault_services::{FaceSearchService, IngestPipeline, Storage};
use std::sync::Arc;

/// State shared by every handler. Built once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub ingest: IngestPipeline,
    /// `None` when face search is not configured.
    pub face_search: Option<FaceSearchService>,
}
