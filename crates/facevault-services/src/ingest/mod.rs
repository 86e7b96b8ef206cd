//! Upload ingestion.
//!
//! An upload is either a single image or a zip archive of images. Every accepted
//! image is written to storage under a generated name as soon as it is found.

mod archive;
mod naming;
mod pipeline;

pub use archive::{ArchiveDecoder, ArchiveEntry, ArchiveError, EntryKind};
pub use naming::{Clock, StoredNamer, SystemClock};
pub use pipeline::{IngestError, IngestPipeline, UploadRequest};
