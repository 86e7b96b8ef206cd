//! Test doubles shared by the unit tests in this crate.

use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use facevault_core::models::ObjectSummary;
use facevault_storage::{Storage, StorageBackend, StorageError, StorageResult, StoredObject};
use zip::write::{FileOptions, ZipWriter};

use crate::ingest::Clock;

pub enum ZipMember<'a> {
    File(&'a str, &'a [u8]),
    Dir(&'a str),
}

impl<'a> ZipMember<'a> {
    pub fn file(path: &'a str, data: &'a [u8]) -> Self {
        ZipMember::File(path, data)
    }

    pub fn dir(path: &'a str) -> Self {
        ZipMember::Dir(path)
    }
}

/// Build an in-memory zip archive with members in the given order.
pub fn zip_bytes(members: &[ZipMember<'_>]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();

    for member in members {
        match member {
            ZipMember::File(path, data) => {
                writer.start_file(*path, options).unwrap();
                writer.write_all(data).unwrap();
            }
            ZipMember::Dir(path) => {
                writer.add_directory(*path, options).unwrap();
            }
        }
    }

    writer.finish().unwrap().into_inner()
}

fn u16_at(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn u32_at(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
}

/// Rewrite an archive so every member is sized by a trailing data descriptor
/// (general purpose flag bit 3), the layout streaming zip writers produce.
///
/// Local headers lose their CRC and sizes; the central directory keeps them.
pub fn with_data_descriptors(archive: &[u8]) -> Vec<u8> {
    const LOCAL_HEADER: u32 = 0x0403_4b50;
    const CENTRAL_HEADER: u32 = 0x0201_4b50;
    const DATA_DESCRIPTOR: u32 = 0x0807_4b50;
    const END_OF_CENTRAL_DIRECTORY: u32 = 0x0605_4b50;

    let mut out = Vec::with_capacity(archive.len() + 64);
    let mut new_offsets = Vec::new();
    let mut pos = 0;

    while u32_at(archive, pos) == LOCAL_HEADER {
        let crc = u32_at(archive, pos + 14);
        let compressed = u32_at(archive, pos + 18);
        let uncompressed = u32_at(archive, pos + 22);
        let header_len = 30 + u16_at(archive, pos + 26) as usize + u16_at(archive, pos + 28) as usize;

        new_offsets.push(out.len() as u32);
        let mut header = archive[pos..pos + header_len].to_vec();
        let flags = u16_at(&header, 6) | 0x0008;
        header[6..8].copy_from_slice(&flags.to_le_bytes());
        header[14..26].fill(0);
        out.extend_from_slice(&header);

        let data_start = pos + header_len;
        out.extend_from_slice(&archive[data_start..data_start + compressed as usize]);
        for field in [DATA_DESCRIPTOR, crc, compressed, uncompressed] {
            out.extend_from_slice(&field.to_le_bytes());
        }
        pos = data_start + compressed as usize;
    }

    let central_start = out.len() as u32;
    for new_offset in &new_offsets {
        assert_eq!(u32_at(archive, pos), CENTRAL_HEADER);
        let entry_len = 46
            + u16_at(archive, pos + 28) as usize
            + u16_at(archive, pos + 30) as usize
            + u16_at(archive, pos + 32) as usize;
        let mut entry = archive[pos..pos + entry_len].to_vec();
        let flags = u16_at(&entry, 8) | 0x0008;
        entry[8..10].copy_from_slice(&flags.to_le_bytes());
        entry[42..46].copy_from_slice(&new_offset.to_le_bytes());
        out.extend_from_slice(&entry);
        pos += entry_len;
    }

    assert_eq!(u32_at(archive, pos), END_OF_CENTRAL_DIRECTORY);
    let mut end = archive[pos..].to_vec();
    end[16..20].copy_from_slice(&central_start.to_le_bytes());
    out.extend_from_slice(&end);

    out
}

/// Clock that replays a fixed list of readings and then repeats the last one.
pub struct ManualClock {
    readings: Mutex<Vec<i64>>,
}

impl ManualClock {
    pub fn frozen(millis: i64) -> Self {
        Self::sequence(vec![millis])
    }

    pub fn sequence(readings: Vec<i64>) -> Self {
        assert!(!readings.is_empty());
        Self {
            readings: Mutex::new(readings),
        }
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        let mut readings = self.readings.lock().unwrap();
        if readings.len() > 1 {
            readings.remove(0)
        } else {
            readings[0]
        }
    }
}

#[derive(Debug, Clone)]
pub struct PutRecord {
    pub key: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Default)]
struct MemoryState {
    objects: BTreeMap<String, PutRecord>,
    puts: Vec<PutRecord>,
    attempts: usize,
}

/// In-memory store that records every write and can fail the Nth one.
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<MemoryState>,
    fail_on_attempt: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `attempt`-th put (1-based); every other put succeeds.
    pub fn failing_on(attempt: usize) -> Self {
        Self {
            fail_on_attempt: Some(attempt),
            ..Self::default()
        }
    }

    /// Successful puts, in call order.
    pub fn puts(&self) -> Vec<PutRecord> {
        self.state.lock().unwrap().puts.clone()
    }

    /// Every put call, failed ones included.
    pub fn put_attempts(&self) -> usize {
        self.state.lock().unwrap().attempts
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put(&self, key: &str, content_type: &str, data: Vec<u8>) -> StorageResult<String> {
        let mut state = self.state.lock().unwrap();
        state.attempts += 1;
        if Some(state.attempts) == self.fail_on_attempt {
            return Err(StorageError::UploadFailed("injected failure".to_string()));
        }

        let record = PutRecord {
            key: key.to_string(),
            content_type: content_type.to_string(),
            data,
        };
        state.objects.insert(key.to_string(), record.clone());
        state.puts.push(record);
        Ok(self.object_url(key))
    }

    async fn open(&self, key: &str) -> StorageResult<StoredObject> {
        let state = self.state.lock().unwrap();
        let record = state
            .objects
            .get(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        let chunk: StorageResult<Bytes> = Ok(Bytes::from(record.data.clone()));
        Ok(StoredObject {
            content_type: Some(record.content_type.clone()),
            content_length: Some(record.data.len() as u64),
            body: Box::pin(futures::stream::iter(vec![chunk])),
        })
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.state.lock().unwrap().objects.remove(key);
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<ObjectSummary>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .objects
            .values()
            .map(|record| ObjectSummary {
                key: record.key.clone(),
                size: Some(record.data.len() as u64),
                last_modified: None,
                url: self.object_url(&record.key),
            })
            .collect())
    }

    fn object_url(&self, key: &str) -> String {
        format!("memory://{}", key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
