//! High-level image operations.
//!
//! These functions combine calculations with backend execution. They take
//! configuration, call the backend, and attach the bookkeeping the rest of
//! the pipeline cares about (byte sizes, compression ratio, data URIs).

use super::backend::{BackendError, RasterBackend};
use super::calculations::compression_ratio;
use super::params::{OptimizeParams, OutputFormat, ThumbnailParams};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Output of one optimize operation, consumed immediately by the uploader.
///
/// Transient — scoped to a single upload interaction, never persisted.
#[derive(Debug, Clone)]
pub struct OptimizedImage {
    pub bytes: Vec<u8>,
    pub original_size: u64,
    pub optimized_size: u64,
    /// Percentage of bytes saved. Negative when the re-encode grew the file.
    pub compression_ratio: f64,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
}

/// Get natural pixel dimensions of encoded image data.
pub fn probe_dimensions(backend: &impl RasterBackend, bytes: &[u8]) -> Result<(u32, u32)> {
    let dims = backend.probe(bytes)?;
    Ok((dims.width, dims.height))
}

/// Resize within bounds and re-encode, reporting sizes and savings.
///
/// The output never exceeds `params.max_width`/`max_height` and is never
/// upscaled. A negative compression ratio is reported as-is; callers decide
/// whether to keep the result or fall back to the original bytes.
pub fn optimize_image(
    backend: &impl RasterBackend,
    bytes: &[u8],
    params: &OptimizeParams,
) -> Result<OptimizedImage> {
    let encoded = backend.optimize(bytes, params)?;
    let original_size = bytes.len() as u64;
    let optimized_size = encoded.bytes.len() as u64;

    Ok(OptimizedImage {
        compression_ratio: compression_ratio(original_size, optimized_size),
        bytes: encoded.bytes,
        original_size,
        optimized_size,
        width: encoded.width,
        height: encoded.height,
        format: params.format,
    })
}

/// Create a centered square thumbnail as a self-contained `data:` URI.
///
/// Thumbnails are used inline for previews and never uploaded, so the
/// data-URI form saves a round trip to the store.
pub fn create_thumbnail(
    backend: &impl RasterBackend,
    bytes: &[u8],
    params: &ThumbnailParams,
) -> Result<String> {
    let thumb = backend.thumbnail(bytes, params)?;
    Ok(format!(
        "data:image/jpeg;base64,{}",
        STANDARD.encode(&thumb.bytes)
    ))
}
