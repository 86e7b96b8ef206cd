//! Liveness handlers.

use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use facevault_core::models::MessageResponse;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub storage: String,
    pub face_search: String,
}

#[utoipa::path(
    get,
    path = "/test",
    tag = "health",
    responses(
        (status = 200, description = "Service is reachable", body = MessageResponse)
    )
)]
pub async fn test_route() -> impl IntoResponse {
    Json(MessageResponse::new("Test route is working"))
}

/// Liveness check. Reports configuration only; no backend is contacted.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Process is alive", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let face_search = if state.face_search.is_some() {
        "enabled"
    } else {
        "disabled"
    };

    Json(HealthResponse {
        status: "alive".to_string(),
        storage: state.storage.backend_type().to_string(),
        face_search: face_search.to_string(),
    })
}
