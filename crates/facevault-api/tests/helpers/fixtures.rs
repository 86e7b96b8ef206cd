//! Test fixtures: image blobs, zip archives and multipart forms.

use axum_test::multipart::{MultipartForm, Part};
use std::io::{Cursor, Write};
use zip::write::{FileOptions, ZipWriter};

/// Minimal valid 1x1 PNG bytes.
pub fn create_minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
        0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0xD7, 0x63, 0xF8,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0x89, 0x00, 0x00, 0x00,
        0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}

/// JPEG SOI/EOI markers around a few bytes; enough for storage, not for decoding.
pub fn create_fake_jpeg() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0xFF, 0xD9]
}

/// Zip archive with the given `(path, contents)` members. Paths ending in `/` are directories.
pub fn create_zip(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();

    for (path, data) in members {
        if path.ends_with('/') {
            writer.add_directory(*path, options).expect("add directory");
        } else {
            writer.start_file(*path, options).expect("start file");
            writer.write_all(data).expect("write member");
        }
    }

    writer.finish().expect("finish zip").into_inner()
}

/// Multipart form with a single `file` field.
pub fn file_form(file_name: &str, mime_type: &str, data: Vec<u8>) -> MultipartForm {
    let part = Part::bytes(data).file_name(file_name).mime_type(mime_type);
    MultipartForm::new().add_part("file", part)
}
