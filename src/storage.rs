//! Object store seam.
//!
//! The pipeline only ever talks to [`ObjectStore`]: put bytes under a key and
//! get back a publicly resolvable URL, or delete an object by that URL. The
//! hosted service behind the seam is not this crate's concern; the shipped
//! implementation is [`FsStore`], a directory on disk with a configurable
//! base URL, which is enough to run the full pipeline locally and in tests.
//!
//! ## Object keys
//!
//! Keys are **content-addressed**: `prefix/<first 16 hex of SHA-256>.<ext>`.
//! Re-uploading identical bytes lands on the same key, so a retried batch
//! never litters the store with duplicates.

use sha2::{Digest, Sha256};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("URL is not served by this store: {0}")]
    ForeignUrl(String),
    #[error("upload failed: {0}")]
    Upload(String),
}

/// Storage collaborator: upload bytes, get a URL; delete by URL.
pub trait ObjectStore: Sync {
    /// Store `bytes` under `key` and return the object's public URL.
    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<String, StoreError>;

    /// Delete the object a previously returned URL points at.
    fn delete(&self, url: &str) -> Result<(), StoreError>;
}

/// Content-addressed object key: `prefix/<sha256 prefix>.<ext>`.
pub fn object_key(prefix: &str, bytes: &[u8], extension: &str) -> String {
    let digest = Sha256::digest(bytes);
    let hex: String = digest.iter().take(8).map(|b| format!("{b:02x}")).collect();
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        format!("{hex}.{extension}")
    } else {
        format!("{prefix}/{hex}.{extension}")
    }
}

/// Filesystem-backed store rooted at a directory.
///
/// URLs are `<base_url>/<key>`; the file lives at `<root>/<key>`. Content
/// types are accepted for interface parity but a filesystem has nowhere to
/// record them.
pub struct FsStore {
    root: PathBuf,
    base_url: String,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Map a URL back to its store key, refusing anything outside this store.
    fn key_for_url<'a>(&self, url: &'a str) -> Result<&'a str, StoreError> {
        let key = url
            .strip_prefix(&self.base_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| StoreError::ForeignUrl(url.to_string()))?;
        // A hostile URL must not escape the root directory
        if key.is_empty() || key.split('/').any(|part| part == ".." || part.is_empty()) {
            return Err(StoreError::ForeignUrl(url.to_string()));
        }
        Ok(key)
    }
}

impl ObjectStore for FsStore {
    fn put(&self, key: &str, bytes: &[u8], _content_type: &str) -> Result<String, StoreError> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, bytes)?;
        Ok(format!("{}/{}", self.base_url, key))
    }

    fn delete(&self, url: &str) -> Result<(), StoreError> {
        let key = self.key_for_url(url)?;
        std::fs::remove_file(self.root.join(key))?;
        Ok(())
    }
}
