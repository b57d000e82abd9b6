//! # picshelf
//!
//! An image upload pipeline and gallery manager. Candidate files are
//! validated against an upload policy, optimized (bounded resize +
//! re-encode), uploaded to an object store, and tracked in ordered gallery
//! manifests — the workflow behind an admin tool's image galleries, as a
//! library and CLI.
//!
//! # Architecture: Validate → Optimize → Upload
//!
//! Each batch flows through three steps, with per-file failures collected
//! along the way and never aborting siblings:
//!
//! ```text
//! 1. Validate   policy checks on the descriptor (MIME, size)  — pure
//! 2. Optimize   decode → fit within bounds → re-encode        — rayon fan-out
//! 3. Upload     content-addressed key → object store → URL
//! ```
//!
//! The gallery manifest (ordered JSON list of URLs) is updated only after
//! each file's upload completes, in submission order.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`validate`] | Upload policy: MIME prefix, size ceiling, allowed format set |
//! | [`imaging`] | Raster work behind the [`RasterBackend`](imaging::RasterBackend) trait: probe, optimize, thumbnail |
//! | [`gallery`] | Batch orchestration, manifest persistence, remove/reorder |
//! | [`storage`] | [`ObjectStore`](storage::ObjectStore) seam + filesystem-backed implementation |
//! | [`config`] | `picshelf.toml` loading with stock defaults |
//! | [`output`] | CLI output formatting — pure `format_*` functions |
//!
//! # Design Decisions
//!
//! ## Backend Trait Over Direct Codec Calls
//!
//! All pixel work goes through [`imaging::RasterBackend`]. The production
//! backend is the pure-Rust `image` crate (statically linked, no system
//! dependencies); tests swap in a recording mock, so orchestration logic is
//! exercised without encoding a single pixel.
//!
//! ## Graceful Degradation Over Strictness
//!
//! Optimization exists to save bytes, not to gatekeep. If an accepted file
//! decodes but cannot be re-encoded, the original bytes are uploaded
//! unmodified. Only files that fail to decode at all are dropped from the
//! batch — garbage should not land in the store.
//!
//! ## Content-Addressed Object Keys
//!
//! Objects are stored under `prefix/<sha256 prefix>.<ext>`, so re-submitting
//! identical bytes is idempotent and the store never accumulates duplicate
//! blobs for the same image.
//!
//! ## Best-Effort Removal
//!
//! Removing a gallery image deletes the stored object best-effort: a failed
//! delete is reported but the gallery entry is removed regardless. The
//! orphaned blob costs pennies; a gallery that won't let go of a dead URL
//! costs an annoyed admin.

pub mod config;
pub mod gallery;
pub mod imaging;
pub mod output;
pub mod storage;
pub mod validate;
