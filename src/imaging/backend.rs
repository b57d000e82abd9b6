//! Raster backend trait and shared types.
//!
//! The [`RasterBackend`] trait defines the three operations every backend must
//! support: probe, optimize, and thumbnail. All operations work on encoded
//! bytes in memory — uploads never touch the filesystem between decode and
//! store.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust, statically
//! linked codecs from the `image` crate.

use super::params::{OptimizeParams, ThumbnailParams};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("could not decode image: {0}")]
    Decode(String),
    #[error("could not encode image: {0}")]
    Encode(String),
}

/// Result of a probe operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// An encoded output image with its pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Trait for raster processing backends.
///
/// Every backend must implement all three operations — probe, optimize, and
/// thumbnail — so the rest of the codebase is backend-agnostic.
pub trait RasterBackend: Sync {
    /// Decode enough of the input to learn its natural dimensions.
    fn probe(&self, bytes: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode, resize within bounds (never upscaling), and re-encode.
    fn optimize(&self, bytes: &[u8], params: &OptimizeParams)
    -> Result<EncodedImage, BackendError>;

    /// Decode, center-crop to a square, scale, and encode as JPEG.
    fn thumbnail(
        &self,
        bytes: &[u8],
        params: &ThumbnailParams,
    ) -> Result<EncodedImage, BackendError>;
}
