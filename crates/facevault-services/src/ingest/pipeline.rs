use std::sync::Arc;
use std::time::Instant;

use facevault_core::media_type::{content_type_for_name, is_allowed_image_name};
use facevault_core::models::UploadResult;
use facevault_core::{Config, DeclaredMediaType};
use facevault_storage::{Storage, StorageError};

use super::archive::{ArchiveDecoder, ArchiveError, EntryKind};
use super::naming::{Clock, StoredNamer, SystemClock};

/// Content type for archive members whose extension maps to nothing.
const ARCHIVE_ENTRY_FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// An uploaded file as received by the HTTP layer.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub raw_bytes: Vec<u8>,
    pub declared_media_type: DeclaredMediaType,
    pub original_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Only image files (png, jpg, jpeg) are allowed: {name}")]
    UnsupportedFileType { name: String },

    #[error("No valid image files found in the zip")]
    NoValidImagesFound,

    #[error("Failed to store {name}")]
    StoreWriteFailed {
        name: String,
        #[source]
        source: StorageError,
    },

    #[error("Malformed archive: {0}")]
    MalformedArchive(String),

    #[error("Archive entry {name} is larger than {limit} bytes")]
    EntryTooLarge { name: String, limit: u64 },
}

impl From<ArchiveError> for IngestError {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::Malformed(msg) => IngestError::MalformedArchive(msg),
            ArchiveError::EntryTooLarge { name, limit } => IngestError::EntryTooLarge { name, limit },
        }
    }
}

/// Stores uploaded images, unpacking zip archives one entry at a time.
///
/// Shared across requests; per-request state (the namer, the decoder) lives on
/// the stack of `ingest`.
#[derive(Clone)]
pub struct IngestPipeline {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    prefix: String,
    max_entry_bytes: u64,
}

impl IngestPipeline {
    pub fn new(
        storage: Arc<dyn Storage>,
        clock: Arc<dyn Clock>,
        prefix: impl Into<String>,
        max_entry_bytes: u64,
    ) -> Self {
        Self {
            storage,
            clock,
            prefix: prefix.into(),
            max_entry_bytes,
        }
    }

    pub fn from_config(storage: Arc<dyn Storage>, config: &Config) -> Self {
        Self::new(
            storage,
            Arc::new(SystemClock),
            config.stored_name_prefix(),
            config.max_archive_entry_size_bytes() as u64,
        )
    }

    /// Store every valid image in `request` and return one result per stored image,
    /// in the order they were found.
    ///
    /// A failed write stops the upload; images stored before it are kept.
    /// A single image is handed to storage without copying its bytes.
    pub async fn ingest(&self, request: UploadRequest) -> Result<Vec<UploadResult>, IngestError> {
        let start = Instant::now();
        let mut namer = StoredNamer::new(self.clock.clone(), self.prefix.clone());
        let original_name = request.original_name.clone();
        let media_type = request.declared_media_type;

        let results = if media_type.is_archive() {
            self.ingest_archive(&request, &mut namer).await?
        } else {
            vec![self.ingest_single(request, &mut namer).await?]
        };

        tracing::info!(
            original_name = %original_name,
            media_type = %media_type,
            stored_count = results.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload ingested"
        );

        Ok(results)
    }

    async fn ingest_single(
        &self,
        request: UploadRequest,
        namer: &mut StoredNamer,
    ) -> Result<UploadResult, IngestError> {
        if !is_allowed_image_name(&request.original_name) {
            return Err(IngestError::UnsupportedFileType {
                name: request.original_name.clone(),
            });
        }

        let content_type = content_type_for_name(&request.original_name)
            .unwrap_or(request.declared_media_type.as_mime());
        let stored_name = namer.next_name(&request.original_name);

        self.store(stored_name, content_type, request.raw_bytes).await
    }

    async fn ingest_archive(
        &self,
        request: &UploadRequest,
        namer: &mut StoredNamer,
    ) -> Result<Vec<UploadResult>, IngestError> {
        tracing::debug!(original_name = %request.original_name, "Unpacking archive");

        let mut decoder = ArchiveDecoder::new(&request.raw_bytes)?;
        let mut results = Vec::new();

        while let Some((path, data)) = next_image(&mut decoder, self.max_entry_bytes)? {
            let content_type =
                content_type_for_name(&path).unwrap_or(ARCHIVE_ENTRY_FALLBACK_CONTENT_TYPE);
            let stored_name = namer.next_name(&path);

            tracing::debug!(entry = %path, stored_name = %stored_name, "Storing archive entry");
            results.push(self.store(stored_name, content_type, data).await?);
        }

        if results.is_empty() {
            return Err(IngestError::NoValidImagesFound);
        }

        Ok(results)
    }

    async fn store(
        &self,
        stored_name: String,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<UploadResult, IngestError> {
        match self.storage.put(&stored_name, content_type, data).await {
            Ok(location_url) => Ok(UploadResult {
                stored_name,
                content_type: content_type.to_string(),
                location_url,
            }),
            Err(source) => {
                tracing::warn!(
                    error = %source,
                    stored_name = %stored_name,
                    "Store write failed, aborting upload"
                );
                Err(IngestError::StoreWriteFailed {
                    name: stored_name,
                    source,
                })
            }
        }
    }
}

/// Advance to the next image entry and read it, draining everything skipped on the way.
///
/// Entries never outlive this call, so no decoder state is held across an await.
/// Inflation runs on the calling task and blocks its worker for up to
/// `max_entry_bytes` of output per entry; that cap is also the bound on how long
/// one entry can hold the worker.
fn next_image(
    decoder: &mut ArchiveDecoder<'_>,
    max_entry_bytes: u64,
) -> Result<Option<(String, Vec<u8>)>, ArchiveError> {
    while let Some(entry) = decoder.next_entry()? {
        let path = entry.path().to_string();

        if entry.kind() == EntryKind::Directory {
            tracing::debug!(entry = %path, "Skipping directory");
            entry.drain();
            continue;
        }

        if !is_allowed_image_name(&path) {
            tracing::debug!(entry = %path, "Skipping non-image file");
            entry.drain();
            continue;
        }

        let data = entry.read_all(max_entry_bytes)?;
        return Ok(Some((path, data)));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        with_data_descriptors, zip_bytes, ManualClock, MemoryStorage, ZipMember,
    };

    fn pipeline(storage: Arc<MemoryStorage>, clock: ManualClock) -> IngestPipeline {
        IngestPipeline::new(storage, Arc::new(clock), "upload", 1024 * 1024)
    }

    fn image(name: &str, media_type: DeclaredMediaType, bytes: &[u8]) -> UploadRequest {
        UploadRequest {
            raw_bytes: bytes.to_vec(),
            declared_media_type: media_type,
            original_name: name.to_string(),
        }
    }

    fn archive(members: &[ZipMember]) -> UploadRequest {
        UploadRequest {
            raw_bytes: zip_bytes(members),
            declared_media_type: DeclaredMediaType::Zip,
            original_name: "batch.zip".to_string(),
        }
    }

    #[tokio::test]
    async fn test_single_image() {
        let storage = Arc::new(MemoryStorage::new());
        let pipeline = pipeline(storage.clone(), ManualClock::frozen(1_700_000_000_000));

        let results = pipeline
            .ingest(image("Cat.PNG", DeclaredMediaType::Png, b"png"))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].stored_name, "upload_1700000000000_Cat.PNG");
        assert_eq!(results[0].content_type, "image/png");
        assert_eq!(
            results[0].location_url,
            "memory://upload_1700000000000_Cat.PNG"
        );

        let puts = storage.puts();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].content_type, "image/png");
        assert_eq!(puts[0].data, b"png");
    }

    #[tokio::test]
    async fn test_single_image_uses_basename() {
        let storage = Arc::new(MemoryStorage::new());
        let pipeline = pipeline(storage.clone(), ManualClock::frozen(42));

        let results = pipeline
            .ingest(image("phone/DCIM/shot.jpeg", DeclaredMediaType::Jpeg, b"jpg"))
            .await
            .unwrap();

        assert_eq!(results[0].stored_name, "upload_42_shot.jpeg");
        assert_eq!(results[0].content_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_single_image_content_type_follows_extension() {
        let storage = Arc::new(MemoryStorage::new());
        let pipeline = pipeline(storage.clone(), ManualClock::frozen(1));

        // Declared as non-standard image/jpg, extension says image/jpeg
        let results = pipeline
            .ingest(image("a.jpg", DeclaredMediaType::Jpg, b"x"))
            .await
            .unwrap();
        assert_eq!(results[0].content_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_single_bad_extension_rejected_before_store() {
        let storage = Arc::new(MemoryStorage::new());
        let pipeline = pipeline(storage.clone(), ManualClock::frozen(1));

        let err = pipeline
            .ingest(image("cat.gif", DeclaredMediaType::Png, b"gif"))
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::UnsupportedFileType { ref name } if name == "cat.gif"));
        assert_eq!(storage.put_attempts(), 0);
    }

    #[tokio::test]
    async fn test_archive_images_in_order_and_others_skipped() {
        let storage = Arc::new(MemoryStorage::new());
        let pipeline = pipeline(storage.clone(), ManualClock::frozen(7_000));

        let results = pipeline
            .ingest(archive(&[
                ZipMember::dir("album/"),
                ZipMember::file("album/one.png", b"1"),
                ZipMember::file("readme.txt", b"not an image"),
                ZipMember::file("album/two.JPG", b"22"),
                ZipMember::dir("album/empty/"),
                ZipMember::file("three.jpeg", b"333"),
                ZipMember::file("archive.zip", b"nested"),
            ]))
            .await
            .unwrap();

        let names: Vec<&str> = results.iter().map(|r| r.stored_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "upload_7000_one.png",
                "upload_7001_two.JPG",
                "upload_7002_three.jpeg",
            ]
        );
        let types: Vec<&str> = results.iter().map(|r| r.content_type.as_str()).collect();
        assert_eq!(types, vec!["image/png", "image/jpeg", "image/jpeg"]);

        let puts = storage.puts();
        assert_eq!(puts.len(), 3);
        assert_eq!(puts[0].data, b"1");
        assert_eq!(puts[1].data, b"22");
        assert_eq!(puts[2].data, b"333");
    }

    #[tokio::test]
    async fn test_archive_with_data_descriptors() {
        let storage = Arc::new(MemoryStorage::new());
        let pipeline = pipeline(storage.clone(), ManualClock::frozen(9_000));

        let request = UploadRequest {
            raw_bytes: with_data_descriptors(&zip_bytes(&[
                ZipMember::file("a.png", b"png bytes"),
                ZipMember::file("notes.txt", b"text"),
                ZipMember::file("b.jpg", b"jpg bytes"),
            ])),
            declared_media_type: DeclaredMediaType::Zip,
            original_name: "streamed.zip".to_string(),
        };
        let results = pipeline.ingest(request).await.unwrap();

        let names: Vec<&str> = results.iter().map(|r| r.stored_name.as_str()).collect();
        assert_eq!(names, vec!["upload_9000_a.png", "upload_9001_b.jpg"]);
        let puts = storage.puts();
        assert_eq!(puts.len(), 2);
        assert_eq!(puts[0].data, b"png bytes");
        assert_eq!(puts[1].data, b"jpg bytes");
    }

    #[tokio::test]
    async fn test_archive_without_images() {
        let storage = Arc::new(MemoryStorage::new());
        let pipeline = pipeline(storage.clone(), ManualClock::frozen(1));

        let err = pipeline
            .ingest(archive(&[
                ZipMember::dir("docs/"),
                ZipMember::file("docs/a.txt", b"a"),
                ZipMember::file("b.gif", b"b"),
            ]))
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::NoValidImagesFound));
        assert_eq!(storage.put_attempts(), 0);
    }

    #[tokio::test]
    async fn test_empty_archive() {
        let storage = Arc::new(MemoryStorage::new());
        let pipeline = pipeline(storage.clone(), ManualClock::frozen(1));

        let err = pipeline.ingest(archive(&[])).await.unwrap_err();
        assert!(matches!(err, IngestError::NoValidImagesFound));
    }

    #[tokio::test]
    async fn test_store_failure_aborts_without_retry() {
        let storage = Arc::new(MemoryStorage::failing_on(3));
        let pipeline = pipeline(storage.clone(), ManualClock::frozen(100));

        let err = pipeline
            .ingest(archive(&[
                ZipMember::file("1.png", b"1"),
                ZipMember::file("2.png", b"2"),
                ZipMember::file("3.png", b"3"),
                ZipMember::file("4.png", b"4"),
                ZipMember::file("5.png", b"5"),
            ]))
            .await
            .unwrap_err();

        match err {
            IngestError::StoreWriteFailed { name, source } => {
                assert_eq!(name, "upload_102_3.png");
                assert!(matches!(source, StorageError::UploadFailed(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // Two writes landed, the third failed, nothing after it was attempted
        assert_eq!(storage.put_attempts(), 3);
        assert_eq!(storage.puts().len(), 2);
    }

    #[tokio::test]
    async fn test_single_store_failure() {
        let storage = Arc::new(MemoryStorage::failing_on(1));
        let pipeline = pipeline(storage.clone(), ManualClock::frozen(1));

        let err = pipeline
            .ingest(image("a.png", DeclaredMediaType::Png, b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::StoreWriteFailed { .. }));
        assert_eq!(storage.put_attempts(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_names_in_archive_get_distinct_stored_names() {
        let storage = Arc::new(MemoryStorage::new());
        let pipeline = pipeline(storage.clone(), ManualClock::frozen(9));

        let results = pipeline
            .ingest(archive(&[
                ZipMember::file("a/cat.png", b"a"),
                ZipMember::file("b/cat.png", b"b"),
            ]))
            .await
            .unwrap();

        assert_ne!(results[0].stored_name, results[1].stored_name);
        assert_eq!(storage.puts().len(), 2);
    }

    #[tokio::test]
    async fn test_injected_clock_one_millisecond_apart() {
        let storage = Arc::new(MemoryStorage::new());
        let pipeline = pipeline(storage.clone(), ManualClock::sequence(vec![500, 501]));

        let first = pipeline
            .ingest(image("cat.png", DeclaredMediaType::Png, b"1"))
            .await
            .unwrap();
        let second = pipeline
            .ingest(image("cat.png", DeclaredMediaType::Png, b"2"))
            .await
            .unwrap();

        assert_eq!(first[0].stored_name, "upload_500_cat.png");
        assert_eq!(second[0].stored_name, "upload_501_cat.png");
    }

    #[tokio::test]
    async fn test_malformed_archive() {
        let storage = Arc::new(MemoryStorage::new());
        let pipeline = pipeline(storage.clone(), ManualClock::frozen(1));

        let request = UploadRequest {
            raw_bytes: b"this is not a zip".to_vec(),
            declared_media_type: DeclaredMediaType::Zip,
            original_name: "broken.zip".to_string(),
        };
        let err = pipeline.ingest(request).await.unwrap_err();

        assert!(matches!(err, IngestError::MalformedArchive(_)));
        assert_eq!(storage.put_attempts(), 0);
    }

    #[tokio::test]
    async fn test_oversized_entry() {
        let storage = Arc::new(MemoryStorage::new());
        let pipeline = IngestPipeline::new(storage.clone(), Arc::new(ManualClock::frozen(1)), "upload", 4);

        let err = pipeline
            .ingest(archive(&[
                ZipMember::file("small.png", b"ok"),
                ZipMember::file("big.png", b"too large"),
            ]))
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::EntryTooLarge { ref name, limit: 4 } if name == "big.png"));
        assert_eq!(storage.puts().len(), 1);
    }

    #[tokio::test]
    async fn test_from_config() {
        let config = Config::from_vars(|name| match name {
            "STORED_NAME_PREFIX" => Some("Raviwiz".to_string()),
            _ => None,
        })
        .unwrap();
        let storage = Arc::new(MemoryStorage::new());
        let pipeline = IngestPipeline::from_config(storage.clone(), &config);

        let results = pipeline
            .ingest(image("a.png", DeclaredMediaType::Png, b"x"))
            .await
            .unwrap();
        assert!(results[0].stored_name.starts_with("Raviwiz_"));
        assert!(results[0].stored_name.ends_with("_a.png"));
    }
}
