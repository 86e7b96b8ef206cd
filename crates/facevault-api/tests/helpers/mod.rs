//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p facevault-api`.

pub mod faces;
pub mod fixtures;

use axum_test::TestServer;
use facevault_api::setup::routes;
use facevault_api::state::AppState;
use facevault_core::Config;
use facevault_services::{create_storage, FaceSearchService, IngestPipeline};
use std::sync::Arc;
use tempfile::TempDir;

pub const BASE_URL: &str = "http://localhost:3000/view";

/// Test application: server and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Files present in the storage directory, sidecars included.
    pub fn stored_paths(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self._temp_dir.path())
            .expect("read storage dir")
            .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

fn test_config(storage_path: &str) -> Config {
    let storage_path = storage_path.to_string();
    Config::from_vars(move |name| match name {
        "STORAGE_BACKEND" => Some("local".to_string()),
        "LOCAL_STORAGE_PATH" => Some(storage_path.clone()),
        "LOCAL_STORAGE_BASE_URL" => Some(BASE_URL.to_string()),
        "MAX_FILE_SIZE_MB" => Some("1".to_string()),
        "MAX_ARCHIVE_ENTRY_SIZE_MB" => Some("1".to_string()),
        _ => None,
    })
    .expect("test config")
}

/// Setup test app with local storage and face search disabled.
pub async fn setup_test_app() -> TestApp {
    build_app(None).await
}

/// Setup test app whose face search answers from the given fakes.
pub async fn setup_test_app_with_faces(faces: faces::FakeFaces) -> TestApp {
    build_app(Some(faces)).await
}

async fn build_app(faces: Option<faces::FakeFaces>) -> TestApp {
    let temp_dir = TempDir::new().expect("temp dir");
    let config = test_config(&temp_dir.path().to_string_lossy());
    config.validate().expect("valid test config");

    let storage = create_storage(&config).await.expect("local storage");
    let ingest = IngestPipeline::from_config(storage.clone(), &config);
    let face_search = faces.map(|faces| {
        FaceSearchService::new(
            Arc::new(faces.index),
            Arc::new(faces.metadata),
            storage.clone(),
        )
    });

    let state = Arc::new(AppState {
        config: config.clone(),
        storage,
        ingest,
        face_search,
    });

    let router = routes::setup_routes(&config, state).expect("router");
    let server = TestServer::new(router).expect("test server");

    TestApp {
        server,
        _temp_dir: temp_dir,
    }
}
