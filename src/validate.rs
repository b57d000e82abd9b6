//! Upload policy checks.
//!
//! Pure functions over a file *descriptor* (name, MIME type, byte size) — no
//! file contents are read here, and no side effects happen. A candidate that
//! fails validation never reaches the optimizer or the store.
//!
//! Checks run in order:
//! 1. size ceiling (applies regardless of MIME type),
//! 2. `image/` MIME prefix,
//! 3. membership in the allowed format set (JPEG, PNG, WebP, GIF).

use std::path::Path;
use thiserror::Error;

/// Default upload ceiling: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Extensions with a known image MIME type, used to classify CLI arguments.
/// Browsers hand over a MIME type with each file; on the command line we
/// derive it from the extension.
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
];

/// MIME types accepted by the stock upload policy.
pub const ALLOWED_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Why a candidate was rejected before processing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("file is too large ({size} bytes, limit {limit})")]
    TooLarge { size: u64, limit: u64 },
    #[error("not an image ({0})")]
    NotAnImage(String),
    #[error("unsupported image format ({0})")]
    UnsupportedFormat(String),
}

/// A file under consideration for upload: descriptor only, no contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub filename: String,
    pub content_type: String,
    pub size: u64,
}

/// Upload acceptance policy, normally taken from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_file_bytes: u64,
    pub allowed_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_types: ALLOWED_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Check a candidate against the policy. Pure — no I/O, no side effects.
pub fn validate(candidate: &FileCandidate, policy: &UploadPolicy) -> Result<(), Rejection> {
    if candidate.size > policy.max_file_bytes {
        return Err(Rejection::TooLarge {
            size: candidate.size,
            limit: policy.max_file_bytes,
        });
    }
    if !candidate.content_type.starts_with("image/") {
        return Err(Rejection::NotAnImage(candidate.content_type.clone()));
    }
    if !policy
        .allowed_types
        .iter()
        .any(|t| t == &candidate.content_type)
    {
        return Err(Rejection::UnsupportedFormat(candidate.content_type.clone()));
    }
    Ok(())
}

/// MIME type for a path based on its extension, if it looks like an image.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}
