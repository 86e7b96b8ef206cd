//! Zip decoding over an in-memory upload.
//!
//! Entries are visited once, in archive order. Sizes come from the central
//! directory, so members written with trailing data descriptors (streaming
//! writers, macOS Archive Utility, Java `ZipOutputStream`) decode like any other.
//! An entry borrows the decoder, so it has to be read or drained before the
//! decoder can move on.

use std::io::{Cursor, Read};

use zip::read::ZipFile;
use zip::result::ZipError;
use zip::ZipArchive;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Malformed archive: {0}")]
    Malformed(String),

    #[error("Archive entry {name} exceeds {limit} bytes")]
    EntryTooLarge { name: String, limit: u64 },
}

impl From<ZipError> for ArchiveError {
    fn from(err: ZipError) -> Self {
        ArchiveError::Malformed(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// Single-pass decoder over an in-memory zip archive.
pub struct ArchiveDecoder<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
    next_index: usize,
    finished: bool,
}

impl<'a> ArchiveDecoder<'a> {
    /// Open `data` as a zip archive. Fails when no central directory can be found.
    pub fn new(data: &'a [u8]) -> Result<Self, ArchiveError> {
        Ok(Self {
            archive: ZipArchive::new(Cursor::new(data))?,
            next_index: 0,
            finished: false,
        })
    }

    /// Next entry in archive order, or `None` after the last one.
    ///
    /// After `None` or an error the decoder stays exhausted.
    pub fn next_entry(&mut self) -> Result<Option<ArchiveEntry<'_>>, ArchiveError> {
        if self.finished || self.next_index >= self.archive.len() {
            self.finished = true;
            return Ok(None);
        }

        let index = self.next_index;
        self.next_index += 1;

        match self.archive.by_index(index) {
            Ok(file) => Ok(Some(ArchiveEntry::new(file))),
            Err(err) => {
                self.finished = true;
                Err(err.into())
            }
        }
    }
}

/// One member of the archive. Exists only while the decoder is parked on it.
pub struct ArchiveEntry<'a> {
    file: ZipFile<'a>,
    path: String,
    kind: EntryKind,
}

impl<'a> ArchiveEntry<'a> {
    fn new(file: ZipFile<'a>) -> Self {
        let path = file.name().to_string();
        let kind = if file.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        Self { file, path, kind }
    }

    /// Path of the entry inside the archive.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Decompress the whole entry, failing if it is larger than `limit` bytes.
    pub fn read_all(mut self, limit: u64) -> Result<Vec<u8>, ArchiveError> {
        let too_large = || ArchiveError::EntryTooLarge {
            name: self.path.clone(),
            limit,
        };

        if self.file.size() > limit {
            return Err(too_large());
        }

        let mut data = Vec::with_capacity(self.file.size() as usize);
        (&mut self.file)
            .take(limit.saturating_add(1))
            .read_to_end(&mut data)
            .map_err(|e| ArchiveError::Malformed(format!("{}: {}", self.path, e)))?;

        if data.len() as u64 > limit {
            return Err(too_large());
        }

        Ok(data)
    }

    /// Skip the entry without decompressing it.
    pub fn drain(self) {
        drop(self.file);
    }
}
