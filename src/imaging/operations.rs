//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take a scale, compute parameters, and call the backend.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{ScaleError, display_adjusted_scale, scaled_dimensions};
use super::params::{ResampleFilter, ResizeParams};
use image::DynamicImage;
use thiserror::Error;

/// Failure to produce a scaled bitmap.
#[derive(Error, Debug)]
pub enum ResizeError {
    #[error(transparent)]
    Scale(#[from] ScaleError),
    #[error("resample failed: {0}")]
    Backend(#[from] BackendError),
}

/// Scaling options that stay fixed across one export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleConfig {
    pub filter: ResampleFilter,
    /// Backing scale of the rendering surface; 1.0 means pixel space.
    pub device_scale: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            filter: ResampleFilter::default(),
            device_scale: 1.0,
        }
    }
}

/// Plan a resize without executing it.
///
/// Applies the device scale convention and validates that the result has
/// pixels, so no backend work is attempted for an impossible size.
pub fn plan_resize(
    source: Dimensions,
    effective_scale: f64,
    config: &ScaleConfig,
) -> Result<ResizeParams, ScaleError> {
    let scale = display_adjusted_scale(effective_scale, config.device_scale);
    let (width, height) = scaled_dimensions((source.width, source.height), scale)?;
    Ok(ResizeParams {
        width,
        height,
        filter: config.filter,
    })
}

/// Resize `image` uniformly by `effective_scale`.
///
/// The source is borrowed and never modified; the result is a new buffer.
pub fn scale_image(
    backend: &impl ImageBackend,
    image: &DynamicImage,
    effective_scale: f64,
    config: &ScaleConfig,
) -> Result<DynamicImage, ResizeError> {
    let params = plan_resize(Dimensions::of(image), effective_scale, config)?;
    let resized = backend.resize(image, &params)?;
    Ok(resized)
}
