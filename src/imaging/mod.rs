//! Image processing — pure Rust, in-memory, no temp files.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Probe** | `image::ImageReader::into_dimensions` |
//! | **Optimize** | Lanczos3 resize + JPEG/PNG/WebP encoders |
//! | **Thumbnail** | center square crop + JPEG data URI |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`RasterBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, EncodedImage, RasterBackend};
pub use calculations::{center_square_crop, compression_ratio, fit_within};
pub use operations::{OptimizedImage, create_thumbnail, optimize_image, probe_dimensions};
pub use params::{OptimizeParams, OutputFormat, Quality, ThumbnailParams};
pub use rust_backend::RustBackend;
