//! Pure Rust raster backend — statically linked codecs.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Probe (JPEG, PNG, WebP, GIF) | `image::ImageReader::into_dimensions` |
//! | Decode | `image::load_from_memory` |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Thumbnail crop | `image::DynamicImage::crop_imm` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (quality applied) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//! | Encode → WebP | `image::codecs::webp::WebPEncoder` (lossless only) |

use super::backend::{BackendError, Dimensions, EncodedImage, RasterBackend};
use super::calculations::{center_square_crop, fit_within};
use super::params::{OptimizeParams, OutputFormat, Quality, ThumbnailParams};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an in-memory image, sniffing the format from the bytes.
fn load_image(bytes: &[u8]) -> Result<DynamicImage, BackendError> {
    image::load_from_memory(bytes).map_err(|e| BackendError::Decode(e.to_string()))
}

/// Encode a decoded image into the target format at the given quality.
///
/// Quality only affects JPEG; PNG is lossless by nature and the `image`
/// crate's WebP encoder is lossless-only.
fn encode_image(
    img: &DynamicImage,
    format: OutputFormat,
    quality: Quality,
) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    match format {
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = img.to_rgb8();
            let mut encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.value() as u8);
            encoder
                .encode(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    image::ExtendedColorType::Rgb8,
                )
                .map_err(|e| BackendError::Encode(e.to_string()))?;
        }
        OutputFormat::Png => {
            let encoder = image::codecs::png::PngEncoder::new(&mut buf);
            img.write_with_encoder(encoder)
                .map_err(|e| BackendError::Encode(e.to_string()))?;
        }
        OutputFormat::WebP => {
            // The WebP encoder only accepts RGB8/RGBA8
            let rgba = img.to_rgba8();
            let encoder = image::codecs::webp::WebPEncoder::new_lossless(&mut buf);
            DynamicImage::ImageRgba8(rgba)
                .write_with_encoder(encoder)
                .map_err(|e| BackendError::Encode(e.to_string()))?;
        }
    }
    Ok(buf)
}

impl RasterBackend for RustBackend {
    fn probe(&self, bytes: &[u8]) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| BackendError::Decode(e.to_string()))?
            .into_dimensions()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(Dimensions { width, height })
    }

    fn optimize(
        &self,
        bytes: &[u8],
        params: &OptimizeParams,
    ) -> Result<EncodedImage, BackendError> {
        let img = load_image(bytes)?;
        let source = (img.width(), img.height());
        let (width, height) = fit_within(source, (params.max_width, params.max_height));

        let resized = if (width, height) == source {
            img
        } else {
            img.resize_exact(width, height, FilterType::Lanczos3)
        };

        let out = encode_image(&resized, params.format, params.quality)?;
        Ok(EncodedImage {
            bytes: out,
            width,
            height,
        })
    }

    fn thumbnail(
        &self,
        bytes: &[u8],
        params: &ThumbnailParams,
    ) -> Result<EncodedImage, BackendError> {
        let img = load_image(bytes)?;
        let (x, y, side) = center_square_crop((img.width(), img.height()));
        let cropped = img.crop_imm(x, y, side, side);
        let scaled = cropped.resize_exact(params.size, params.size, FilterType::Lanczos3);

        // Thumbnails are always JPEG: small, universally displayable inline
        let out = encode_image(&scaled, OutputFormat::Jpeg, params.quality)?;
        Ok(EncodedImage {
            bytes: out,
            width: params.size,
            height: params.size,
        })
    }
}
