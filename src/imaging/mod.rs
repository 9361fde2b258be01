//! Image processing, in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (content-sniffed) |
//! | **Scale** | `resize_exact`, Lanczos3 by default, never nearest-neighbour |
//! | **Write** | PNG or JPEG encoder into a temp file, atomically renamed |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for scale and dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{
    MAX_OUTPUT_PIXELS, ScaleError, display_adjusted_scale, effective_scale, scaled_dimensions,
};
pub use operations::{ResizeError, ScaleConfig, plan_resize, scale_image};
pub use params::{OutputFormat, Quality, ResampleFilter, ResizeParams, WriteParams};
pub use rust_backend::{RustBackend, is_decodable_image, supported_input_extensions};
