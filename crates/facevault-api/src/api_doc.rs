//! OpenAPI documentation, served at `/api/openapi.json` and rendered at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use facevault_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FaceVault API",
        version = "0.1.0",
        description = "Image upload (single images or zip archives), stored file access and face search."
    ),
    paths(
        handlers::upload::upload_files,
        handlers::search_faces::search_faces,
        handlers::files::list_files,
        handlers::view::view_file,
        handlers::delete::delete_file,
        handlers::health::test_route,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::UploadResult,
            models::UploadResponse,
            models::FaceMetadata,
            models::SearchFacesResponse,
            models::ObjectSummary,
            models::ListFilesResponse,
            models::MessageResponse,
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "files", description = "Upload, list, view and delete stored images"),
        (name = "faces", description = "Face search over stored images"),
        (name = "health", description = "Liveness")
    )
)]
struct ApiDoc;
