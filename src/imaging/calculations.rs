//! Pure calculation functions for image dimensions and sizes.
//!
//! All functions here are pure and testable without any I/O or images.

/// Fit source dimensions within bounds, preserving aspect ratio.
///
/// Applies a single uniform scale factor `min(max_w/w, max_h/h)` only when
/// the source exceeds the bounds on either axis. Images already within
/// bounds are returned unchanged — never upscaled.
///
/// # Examples
/// ```
/// # use picshelf::imaging::fit_within;
/// // 4000x3000 into 1920x1080: scale = min(0.48, 0.36) = 0.36
/// assert_eq!(fit_within((4000, 3000), (1920, 1080)), (1440, 1080));
///
/// // Already within bounds: unchanged
/// assert_eq!(fit_within((100, 100), (1920, 1080)), (100, 100));
/// ```
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (w, h) = source;
    let (max_w, max_h) = bounds;

    if w <= max_w && h <= max_h {
        return source;
    }

    let scale = (max_w as f64 / w as f64).min(max_h as f64 / h as f64);
    let out_w = ((w as f64 * scale).round() as u32).max(1);
    let out_h = ((h as f64 * scale).round() as u32).max(1);
    (out_w, out_h)
}

/// Centered square crop region for the given dimensions.
///
/// The crop extent is the smaller of width/height; the offset centers it
/// along the longer axis.
///
/// # Returns
/// * `(x, y, side)` — top-left offset and side length of the square
pub fn center_square_crop(source: (u32, u32)) -> (u32, u32, u32) {
    let (w, h) = source;
    let side = w.min(h);
    ((w - side) / 2, (h - side) / 2, side)
}

/// Compression ratio as a percentage of bytes saved.
///
/// `(original - optimized) / original * 100`. Negative when the optimized
/// output is larger than the input — reported, not treated as an error.
pub fn compression_ratio(original_size: u64, optimized_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    (original_size as f64 - optimized_size as f64) / original_size as f64 * 100.0
}
