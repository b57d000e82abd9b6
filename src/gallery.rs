//! Gallery orchestration: batch ingest, removal, reorder.
//!
//! A gallery is an ordered list of object URLs persisted as a JSON manifest.
//! Ingest runs each candidate through validate → optimize → upload, collecting
//! per-file failures without ever aborting the batch; accepted URLs are
//! appended in *input* order regardless of upload completion order.
//!
//! ## Per-file lifecycle
//!
//! ```text
//! pending → validating → (rejected | optimizing) → (upload-failed | uploaded)
//! ```
//!
//! Terminal states: rejected, upload-failed, uploaded. There are no retries —
//! a failed file stays failed for this batch; the caller re-submits to retry.
//!
//! ## Failure policy
//!
//! - Validation rejections and undecodable files become failure entries.
//! - Encode-side optimization failures degrade gracefully: the original bytes
//!   are uploaded unmodified.
//! - Upload failures are recorded per file; siblings keep going.
//! - Store deletes are best-effort: a failed delete is reported but the local
//!   gallery entry is removed regardless.
//!
//! ## Progress
//!
//! Callers may pass an mpsc sender; the orchestrator emits one
//! [`IngestEvent`] per file-state transition, formatted for display by
//! [`output`](crate::output).

use crate::imaging::{BackendError, OptimizeParams, RasterBackend, optimize_image};
use crate::storage::{ObjectStore, object_key};
use crate::validate::{FileCandidate, UploadPolicy, mime_for_path, validate};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reorder list does not match gallery contents")]
    ReorderMismatch,
}

/// Ordered list of image URLs for one content record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gallery {
    pub images: Vec<String>,
}

impl Gallery {
    /// Load a gallery manifest; a missing file is an empty gallery.
    pub fn load(path: &Path) -> Result<Self, GalleryError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), GalleryError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// One file submitted for upload: descriptor plus contents.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Read a file from disk, deriving the MIME type from its extension.
    /// Unrecognized extensions get `application/octet-stream` and flow
    /// through the validator's not-an-image rejection.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let content_type = mime_for_path(path)
            .unwrap_or("application/octet-stream")
            .to_string();
        Ok(Self {
            filename,
            content_type,
            bytes,
        })
    }

    fn candidate(&self) -> FileCandidate {
        FileCandidate {
            filename: self.filename.clone(),
            content_type: self.content_type.clone(),
            size: self.bytes.len() as u64,
        }
    }

    /// Extension for storing the *original* bytes when optimization fell back.
    fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "bin",
        }
    }
}

/// Batch ingest settings.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Storage key prefix, e.g. `projects/42`.
    pub prefix: String,
    /// Gallery slot budget: total images allowed after the batch.
    pub max_images: usize,
    pub policy: UploadPolicy,
    pub optimize: OptimizeParams,
}

/// Per-file progress events, one per state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestEvent {
    Rejected { filename: String, reason: String },
    SkippedOverBudget { count: usize },
    DecodeFailed { filename: String, reason: String },
    Optimized {
        filename: String,
        ratio: f64,
        width: u32,
        height: u32,
    },
    OptimizeFallback { filename: String, reason: String },
    Uploaded { filename: String, url: String },
    UploadFailed { filename: String, reason: String },
}

/// A file that reached a failed terminal state, with the user-facing reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub filename: String,
    pub reason: String,
}

/// Aggregate result of one batch ingest.
#[derive(Debug, Clone, Default)]
pub struct IngestOutcome {
    /// URLs appended to the gallery, in input order.
    pub added: Vec<String>,
    pub failures: Vec<FileFailure>,
    /// Valid candidates dropped because the gallery was full.
    pub skipped_over_budget: usize,
}

fn emit(events: &Option<Sender<IngestEvent>>, event: IngestEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is watching
        tx.send(event).ok();
    }
}

/// Ingest a batch of files into the gallery.
///
/// All failures are per-file and collected into the outcome; this function
/// itself never fails. Accepted files beyond the remaining slot budget are
/// counted in `skipped_over_budget` and reported — not silently dropped.
pub fn ingest(
    backend: &(impl RasterBackend + Sync),
    store: &(impl ObjectStore + Sync),
    gallery: &mut Gallery,
    files: Vec<UploadFile>,
    config: &IngestConfig,
    events: Option<Sender<IngestEvent>>,
) -> IngestOutcome {
    let mut outcome = IngestOutcome::default();

    // Step 1 — validate everything, collecting rejections without stopping.
    let mut accepted = Vec::new();
    for file in files {
        match validate(&file.candidate(), &config.policy) {
            Ok(()) => accepted.push(file),
            Err(rejection) => {
                let reason = rejection.to_string();
                emit(
                    &events,
                    IngestEvent::Rejected {
                        filename: file.filename.clone(),
                        reason: reason.clone(),
                    },
                );
                outcome.failures.push(FileFailure {
                    filename: file.filename,
                    reason,
                });
            }
        }
    }

    // Step 2 — enforce the slot budget, reporting what gets cut.
    let remaining = config.max_images.saturating_sub(gallery.len());
    if accepted.len() > remaining {
        outcome.skipped_over_budget = accepted.len() - remaining;
        accepted.truncate(remaining);
        emit(
            &events,
            IngestEvent::SkippedOverBudget {
                count: outcome.skipped_over_budget,
            },
        );
    }

    // Step 3 — optimize + upload in parallel. Results carry their input index
    // so the final merge restores submission order.
    let mut results: Vec<(usize, Result<String, FileFailure>)> = accepted
        .par_iter()
        .enumerate()
        .map_with(events.clone(), |events, (index, file)| {
            (index, process_one(backend, store, file, config, events))
        })
        .collect();
    results.sort_by_key(|(index, _)| *index);

    // Step 4 — merge into the gallery in input order.
    for (_, result) in results {
        match result {
            Ok(url) => {
                gallery.images.push(url.clone());
                outcome.added.push(url);
            }
            Err(failure) => outcome.failures.push(failure),
        }
    }

    outcome
}

/// Optimize and upload a single accepted file.
fn process_one(
    backend: &impl RasterBackend,
    store: &impl ObjectStore,
    file: &UploadFile,
    config: &IngestConfig,
    events: &Option<Sender<IngestEvent>>,
) -> Result<String, FileFailure> {
    // Optimize, distinguishing "not decodable at all" (terminal) from
    // encode-side trouble (fall back to the original bytes).
    let (bytes, content_type, extension) = match optimize_image(backend, &file.bytes, &config.optimize) {
        Ok(optimized) => {
            emit(
                events,
                IngestEvent::Optimized {
                    filename: file.filename.clone(),
                    ratio: optimized.compression_ratio,
                    width: optimized.width,
                    height: optimized.height,
                },
            );
            (
                optimized.bytes,
                optimized.format.mime(),
                optimized.format.extension(),
            )
        }
        Err(err @ BackendError::Decode(_)) => {
            let reason = err.to_string();
            emit(
                events,
                IngestEvent::DecodeFailed {
                    filename: file.filename.clone(),
                    reason: reason.clone(),
                },
            );
            return Err(FileFailure {
                filename: file.filename.clone(),
                reason,
            });
        }
        Err(err) => {
            emit(
                events,
                IngestEvent::OptimizeFallback {
                    filename: file.filename.clone(),
                    reason: err.to_string(),
                },
            );
            (
                file.bytes.clone(),
                file.content_type.as_str(),
                file.extension(),
            )
        }
    };

    let key = object_key(&config.prefix, &bytes, extension);
    match store.put(&key, &bytes, content_type) {
        Ok(url) => {
            emit(
                events,
                IngestEvent::Uploaded {
                    filename: file.filename.clone(),
                    url: url.clone(),
                },
            );
            Ok(url)
        }
        Err(err) => {
            let reason = err.to_string();
            emit(
                events,
                IngestEvent::UploadFailed {
                    filename: file.filename.clone(),
                    reason: reason.clone(),
                },
            );
            Err(FileFailure {
                filename: file.filename.clone(),
                reason,
            })
        }
    }
}

/// Result of removing one image from a gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveOutcome {
    /// Whether the URL was present in (and removed from) the local list.
    pub removed_locally: bool,
    /// Store delete error, if the best-effort delete failed.
    pub delete_error: Option<String>,
}

/// Remove an image: best-effort store delete, unconditional local removal.
///
/// A failed delete leaves the stored object orphaned; the gallery stops
/// referencing it either way. Acceptable drift for this tool's stakes.
pub fn remove_image(store: &impl ObjectStore, gallery: &mut Gallery, url: &str) -> RemoveOutcome {
    let delete_error = store.delete(url).err().map(|e| e.to_string());

    let before = gallery.images.len();
    gallery.images.retain(|u| u != url);

    RemoveOutcome {
        removed_locally: gallery.images.len() < before,
        delete_error,
    }
}

/// Replace the gallery order wholesale.
///
/// The new order must be a permutation of the current contents; anything
/// else errors instead of silently losing or inventing URLs.
pub fn reorder(gallery: &mut Gallery, new_order: Vec<String>) -> Result<(), GalleryError> {
    let mut current = gallery.images.clone();
    let mut proposed = new_order.clone();
    current.sort();
    proposed.sort();
    if current != proposed {
        return Err(GalleryError::ReorderMismatch);
    }
    gallery.images = new_order;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{CORRUPT, MockBackend, UNENCODABLE};
    use crate::storage::tests::MockStore;
    use std::sync::mpsc;

    fn upload_file(name: &str, bytes: &[u8]) -> UploadFile {
        UploadFile {
            filename: name.to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: bytes.to_vec(),
        }
    }

    fn test_config(max_images: usize) -> IngestConfig {
        IngestConfig {
            prefix: "galleries/test".to_string(),
            max_images,
            policy: UploadPolicy::default(),
            optimize: OptimizeParams::default(),
        }
    }

    #[test]
    fn ingest_happy_path_preserves_input_order() {
        let backend = MockBackend::new();
        let store = MockStore::new();
        let mut gallery = Gallery::default();

        let files = vec![
            upload_file("a.jpg", &[1u8; 40]),
            upload_file("b.jpg", &[2u8; 60]),
            upload_file("c.jpg", &[3u8; 80]),
        ];
        let outcome = ingest(&backend, &store, &mut gallery, files, &test_config(10), None);

        assert_eq!(outcome.added.len(), 3);
        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.skipped_over_budget, 0);
        assert_eq!(gallery.images, outcome.added);
        // Keys are distinct (different content hashes) and under the prefix
        let keys = store.put_keys();
        assert_eq!(keys.len(), 3);
        assert!(keys.iter().all(|k| k.starts_with("galleries/test/")));
    }

    #[test]
    fn ingest_rejects_invalid_without_stopping() {
        let backend = MockBackend::new();
        let store = MockStore::new();
        let mut gallery = Gallery::default();

        let mut pdf = upload_file("doc.pdf", &[9u8; 20]);
        pdf.content_type = "application/pdf".to_string();
        let files = vec![upload_file("a.jpg", &[1u8; 40]), pdf];

        let outcome = ingest(&backend, &store, &mut gallery, files, &test_config(10), None);

        assert_eq!(outcome.added.len(), 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].filename, "doc.pdf");
        // The rejected file never reached the backend or the store
        assert_eq!(store.put_keys().len(), 1);
    }

    #[test]
    fn ingest_corrupt_file_fails_alone() {
        let backend = MockBackend::new();
        let store = MockStore::new();
        let mut gallery = Gallery::default();

        let files = vec![
            upload_file("ok1.jpg", &[1u8; 40]),
            upload_file("bad.jpg", CORRUPT),
            upload_file("ok2.jpg", &[2u8; 40]),
        ];
        let outcome = ingest(&backend, &store, &mut gallery, files, &test_config(10), None);

        assert_eq!(outcome.added.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].filename, "bad.jpg");
        assert!(outcome.failures[0].reason.contains("could not decode"));
        assert_eq!(gallery.len(), 2);
    }

    #[test]
    fn ingest_encode_failure_falls_back_to_original() {
        let backend = MockBackend::new();
        let store = MockStore::new();
        let mut gallery = Gallery::default();

        let files = vec![upload_file("stubborn.jpg", UNENCODABLE)];
        let outcome = ingest(&backend, &store, &mut gallery, files, &test_config(10), None);

        assert_eq!(outcome.added.len(), 1);
        assert!(outcome.failures.is_empty());
        // The original bytes were uploaded unmodified
        let puts = store.puts.lock().unwrap();
        assert_eq!(puts[0].1, UNENCODABLE.len());
        assert_eq!(puts[0].2, "image/jpeg");
    }

    #[test]
    fn ingest_enforces_slot_budget_and_reports_it() {
        let backend = MockBackend::new();
        let store = MockStore::new();
        let mut gallery = Gallery {
            images: vec!["u1".into(), "u2".into(), "u3".into()],
        };

        let files = (0..4)
            .map(|i| upload_file(&format!("f{i}.jpg"), &[i as u8 + 1; 30]))
            .collect();
        let (tx, rx) = mpsc::channel();
        let outcome = ingest(&backend, &store, &mut gallery, files, &test_config(5), Some(tx));

        // max 5, 3 existing → 2 slots; 2 of 4 accepted, 2 reported skipped
        assert_eq!(outcome.added.len(), 2);
        assert_eq!(outcome.skipped_over_budget, 2);
        assert_eq!(gallery.len(), 5);

        let events: Vec<_> = rx.iter().collect();
        assert!(events.contains(&IngestEvent::SkippedOverBudget { count: 2 }));
    }

    #[test]
    fn ingest_upload_failure_excluded_from_gallery() {
        let backend = MockBackend::new();
        // Every put under this prefix fails
        let store = MockStore::failing_puts("galleries/test");
        let mut gallery = Gallery::default();

        let files = vec![upload_file("a.jpg", &[1u8; 40])];
        let outcome = ingest(&backend, &store, &mut gallery, files, &test_config(10), None);

        assert!(outcome.added.is_empty());
        assert_eq!(outcome.failures.len(), 1);
        assert!(gallery.is_empty());
    }

    #[test]
    fn ingest_emits_per_file_events() {
        let backend = MockBackend::new();
        let store = MockStore::new();
        let mut gallery = Gallery::default();

        let (tx, rx) = mpsc::channel();
        let files = vec![upload_file("a.jpg", &[1u8; 40])];
        ingest(&backend, &store, &mut gallery, files, &test_config(10), Some(tx));

        let events: Vec<_> = rx.iter().collect();
        assert!(matches!(events[0], IngestEvent::Optimized { .. }));
        assert!(matches!(events[1], IngestEvent::Uploaded { .. }));
    }

    #[test]
    fn remove_deletes_and_updates_list() {
        let store = MockStore::new();
        let mut gallery = Gallery {
            images: vec!["mock://store/a.jpg".into(), "mock://store/b.jpg".into()],
        };

        let outcome = remove_image(&store, &mut gallery, "mock://store/a.jpg");
        assert!(outcome.removed_locally);
        assert!(outcome.delete_error.is_none());
        assert_eq!(gallery.images, vec!["mock://store/b.jpg".to_string()]);
        assert_eq!(*store.deletes.lock().unwrap(), vec!["mock://store/a.jpg"]);
    }

    #[test]
    fn remove_best_effort_on_delete_failure() {
        let store = MockStore::failing_deletes("a.jpg");
        let mut gallery = Gallery {
            images: vec!["mock://store/a.jpg".into()],
        };

        let outcome = remove_image(&store, &mut gallery, "mock://store/a.jpg");
        // Delete failed, but the local list no longer references the object
        assert!(outcome.delete_error.is_some());
        assert!(outcome.removed_locally);
        assert!(gallery.is_empty());
    }

    #[test]
    fn remove_unknown_url_reports_not_removed() {
        let store = MockStore::new();
        let mut gallery = Gallery {
            images: vec!["mock://store/a.jpg".into()],
        };

        let outcome = remove_image(&store, &mut gallery, "mock://store/other.jpg");
        assert!(!outcome.removed_locally);
        assert_eq!(gallery.len(), 1);
    }

    #[test]
    fn reorder_accepts_permutation() {
        let mut gallery = Gallery {
            images: vec!["a".into(), "b".into(), "c".into()],
        };
        reorder(&mut gallery, vec!["c".into(), "a".into(), "b".into()]).unwrap();
        assert_eq!(gallery.images, vec!["c", "a", "b"]);
    }

    #[test]
    fn reorder_rejects_non_permutation() {
        let mut gallery = Gallery {
            images: vec!["a".into(), "b".into()],
        };
        let result = reorder(&mut gallery, vec!["a".into(), "x".into()]);
        assert!(matches!(result, Err(GalleryError::ReorderMismatch)));
        // Gallery untouched on error
        assert_eq!(gallery.images, vec!["a", "b"]);

        let result = reorder(&mut gallery, vec!["a".into()]);
        assert!(matches!(result, Err(GalleryError::ReorderMismatch)));
    }

    #[test]
    fn manifest_roundtrip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("gallery.json");

        let gallery = Gallery {
            images: vec!["u1".into(), "u2".into()],
        };
        gallery.save(&path).unwrap();
        assert_eq!(Gallery::load(&path).unwrap(), gallery);
    }

    #[test]
    fn manifest_missing_file_is_empty_gallery() {
        let tmp = tempfile::TempDir::new().unwrap();
        let gallery = Gallery::load(&tmp.path().join("absent.json")).unwrap();
        assert!(gallery.is_empty());
    }
}
