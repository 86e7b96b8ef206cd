//! Media type rules for uploads.
//!
//! Uploads are classified twice: once by the declared MIME type of the multipart
//! field (which decides between the single-image and the archive path) and once by
//! file extension (which decides whether a given file is stored at all).

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;

/// Extensions accepted as images, lowercase and without the leading dot.
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Declared media types accepted by the upload endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredMediaType {
    Png,
    Jpeg,
    /// Non-standard `image/jpg`, still sent by some clients.
    Jpg,
    Zip,
}

impl DeclaredMediaType {
    /// Classify a declared MIME type. Parameters (`; charset=...`) and case are ignored.
    pub fn from_mime(content_type: &str) -> Option<Self> {
        match normalize_mime_type(content_type).to_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" => Some(Self::Jpeg),
            "image/jpg" => Some(Self::Jpg),
            "application/zip" => Some(Self::Zip),
            _ => None,
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Jpg => "image/jpg",
            Self::Zip => "application/zip",
        }
    }

    pub fn is_archive(&self) -> bool {
        matches!(self, Self::Zip)
    }

    pub fn is_image(&self) -> bool {
        !self.is_archive()
    }
}

impl Display for DeclaredMediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_mime())
    }
}

/// Strip MIME parameters (e.g. "image/jpeg; charset=utf-8" -> "image/jpeg").
pub fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

/// Lowercase extension of the last path component, without the dot.
///
/// Dotfiles such as `.png` have no extension.
pub fn file_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Last path component of `name`, if it has one.
pub fn basename(name: &str) -> Option<&str> {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
}

pub fn is_allowed_image_name(name: &str) -> bool {
    file_extension(name)
        .map(|ext| ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Content type implied by the file extension, if known.
pub fn content_type_for_name(name: &str) -> Option<&'static str> {
    match file_extension(name)?.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "zip" => Some("application/zip"),
        _ => None,
    }
}
