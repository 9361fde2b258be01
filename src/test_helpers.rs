//! Shared test utilities for the drawable-resizer test suite.
//!
//! Writes small real images to disk and reads back what the encoder produced,
//! so tests can exercise the real backend without shipping binary fixtures.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let source = tmp.path().join("logo.png");
//! create_test_png(&source, 40, 40);
//!
//! // ... export ...
//!
//! assert_eq!(read_dimensions(&output), (30, 30));
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::{ImageReader, RgbImage};
use std::path::Path;

// =========================================================================
// Fixture images
// =========================================================================

/// A diagonal gradient, so resampling has something to chew on.
fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        image::Rgb([r, g, 128])
    })
}

/// Write a `width` x `height` PNG to `path`.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    gradient(width, height)
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

/// Write a `width` x `height` JPEG to `path`.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let file = std::fs::File::create(path).unwrap();
    let mut writer = std::io::BufWriter::new(file);
    gradient(width, height)
        .write_with_encoder(JpegEncoder::new_with_quality(&mut writer, 90))
        .unwrap();
}

// =========================================================================
// Inspection
// =========================================================================

/// Dimensions of the image at `path`, sniffed from its content.
pub fn read_dimensions(path: &Path) -> (u32, u32) {
    ImageReader::open(path)
        .unwrap()
        .with_guessed_format()
        .unwrap()
        .into_dimensions()
        .unwrap_or_else(|e| panic!("cannot read dimensions of {}: {e}", path.display()))
}
