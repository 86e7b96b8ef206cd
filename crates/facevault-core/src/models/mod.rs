//! Domain models shared between the services and the HTTP layer.

mod face;
mod object;
mod upload;

pub use face::{FaceMatch, FaceMetadata, FaceRecord, SearchFacesResponse};
pub use object::{ListFilesResponse, MessageResponse, ObjectSummary};
pub use upload::{UploadResponse, UploadResult};
