//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use thiserror::Error;

/// Slack added before flooring so that products which are mathematically
/// integral (e.g. `3 × 4/3`) do not land one pixel short.
const FLOOR_EPSILON: f64 = 1e-9;

/// Largest output, in pixels, a single bucket may request (16384 x 16384).
/// Anything larger is refused before the resampler allocates.
pub const MAX_OUTPUT_PIXELS: u64 = 16_384 * 16_384;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScaleError {
    #[error("scale factor {0} is not a positive finite number")]
    InvalidScale(f64),
    #[error("source image has zero area ({width}x{height})")]
    EmptySource { width: u32, height: u32 },
    #[error("scaling {width}x{height} by {scale} leaves no pixels")]
    ZeroArea { width: u32, height: u32, scale: f64 },
    #[error("scaling {width}x{height} by {scale} exceeds the maximum image size")]
    TooLarge { width: u32, height: u32, scale: f64 },
}

/// Scale from a source density factor to a target density factor.
///
/// # Examples
/// ```
/// # use drawable_resizer::imaging::effective_scale;
/// // mdpi artwork exported for hdpi
/// assert_eq!(effective_scale(1.5, 1.0), 1.5);
///
/// // xhdpi artwork exported for ldpi
/// assert_eq!(effective_scale(0.75, 2.0), 0.375);
/// ```
pub fn effective_scale(target_factor: f64, source_factor: f64) -> f64 {
    target_factor / source_factor
}

/// Apply the rendering surface's device scale to an effective scale.
///
/// Rasterizers that measure in points rather than pixels need the requested
/// scale divided by the backing scale (2.0 on a Retina display). A device
/// scale of 1.0, or any non-positive or non-finite value, leaves the scale
/// unchanged, which is the pixel-space convention this crate uses by default.
pub fn display_adjusted_scale(effective: f64, device_scale: f64) -> f64 {
    if device_scale.is_finite() && device_scale > 0.0 && device_scale != 1.0 {
        effective / device_scale
    } else {
        effective
    }
}

/// Calculate output dimensions for a uniform scale.
///
/// Both axes are multiplied by the same factor and floored, so aspect ratio is
/// preserved up to one pixel of rounding per axis.
///
/// # Errors
/// - [`ScaleError::InvalidScale`] for zero, negative, NaN, or infinite scales
/// - [`ScaleError::EmptySource`] if the source has no pixels
/// - [`ScaleError::ZeroArea`] if either axis floors to zero
/// - [`ScaleError::TooLarge`] if either axis overflows `u32` or the result
///   exceeds [`MAX_OUTPUT_PIXELS`]
pub fn scaled_dimensions(original: (u32, u32), scale: f64) -> Result<(u32, u32), ScaleError> {
    let (width, height) = original;

    if !scale.is_finite() || scale <= 0.0 {
        return Err(ScaleError::InvalidScale(scale));
    }
    if width == 0 || height == 0 {
        return Err(ScaleError::EmptySource { width, height });
    }

    let scaled_w = (width as f64 * scale + FLOOR_EPSILON).floor();
    let scaled_h = (height as f64 * scale + FLOOR_EPSILON).floor();

    if scaled_w > u32::MAX as f64
        || scaled_h > u32::MAX as f64
        || scaled_w * scaled_h > MAX_OUTPUT_PIXELS as f64
    {
        return Err(ScaleError::TooLarge {
            width,
            height,
            scale,
        });
    }
    if scaled_w < 1.0 || scaled_h < 1.0 {
        return Err(ScaleError::ZeroArea {
            width,
            height,
            scale,
        });
    }

    Ok((scaled_w as u32, scaled_h as u32))
}
