//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the exporter
//! needs: decode, resize, and write.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), which is pure Rust.
//! Everything is statically linked into the binary.

use super::params::{ResizeParams, WriteParams};
use image::DynamicImage;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(image: &DynamicImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

/// Trait for image processing backends.
///
/// Decoding happens once per source; the decoded image is then shared
/// read-only across concurrent `resize` and `write` calls, hence `Sync`.
pub trait ImageBackend: Sync {
    /// Decode an image from disk.
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Resample into a freshly allocated buffer of exactly the requested size.
    fn resize(
        &self,
        image: &DynamicImage,
        params: &ResizeParams,
    ) -> Result<DynamicImage, BackendError>;

    /// Encode and write an image. A reader must never observe a partial file
    /// at `params.output`.
    fn write(&self, image: &DynamicImage, params: &WriteParams) -> Result<(), BackendError>;
}
