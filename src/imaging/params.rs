//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides what to produce) and the [`backend`](super::backend)
//! (which does the actual pixel work). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing operation logic.
//!
//! ## Types
//!
//! - [`Quality`] — Lossy encoding quality (1–100, default 85). Clamped on construction.
//! - [`OutputFormat`] — Target encoding for optimized output (JPEG, PNG, WebP).
//! - [`OptimizeParams`] — Full specification for an optimize: bounds, quality, format.
//! - [`ThumbnailParams`] — Full specification for a thumbnail: square size, quality.

use serde::{Deserialize, Serialize};

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Target encoding for optimized output.
///
/// WebP output is lossless (the `image` crate dropped lossy WebP encoding),
/// so [`Quality`] only affects JPEG. GIF is accepted as *input* but never
/// produced — animated uploads are flattened into the configured format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    /// MIME type sent as the object's content type on upload.
    pub fn mime(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
        }
    }

    /// File extension used in object keys and output paths.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Jpeg
    }
}

/// Parameters for an optimize operation (bounded resize + re-encode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizeParams {
    /// Maximum output width in pixels.
    pub max_width: u32,
    /// Maximum output height in pixels.
    pub max_height: u32,
    pub quality: Quality,
    pub format: OutputFormat,
}

impl Default for OptimizeParams {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1080,
            quality: Quality::default(),
            format: OutputFormat::default(),
        }
    }
}

/// Parameters for a thumbnail operation (center square crop + scale).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailParams {
    /// Side length of the square thumbnail in pixels.
    pub size: u32,
    pub quality: Quality,
}

impl Default for ThumbnailParams {
    fn default() -> Self {
        Self {
            size: 150,
            quality: Quality::new(80),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_85() {
        assert_eq!(Quality::default().value(), 85);
    }

    #[test]
    fn format_mime_and_extension_agree() {
        assert_eq!(OutputFormat::Jpeg.mime(), "image/jpeg");
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::WebP.mime(), "image/webp");
        assert_eq!(OutputFormat::WebP.extension(), "webp");
    }

    #[test]
    fn thumbnail_defaults() {
        let params = ThumbnailParams::default();
        assert_eq!(params.size, 150);
        assert_eq!(params.quality.value(), 80);
    }
}
