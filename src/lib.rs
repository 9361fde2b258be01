//! # drawable-resizer
//!
//! Export one source image at every Android drawable density.
//!
//! Android picks bitmaps at runtime from `res/drawable-<bucket>/` folders.
//! Artists usually draw once, at the highest density, and need a correctly
//! scaled copy in every bucket. Given a source image and the density it was
//! drawn at, drawable-resizer writes those copies into `drawable-*` folders
//! next to the source.
//!
//! # Architecture: Decode Once, Fan Out
//!
//! ```text
//! logo.png ──decode──▶ bitmap ──┬── scale 0.75/4 ──▶ logo/drawable-ldpi/logo.png
//!                               ├── scale 1.0/4  ──▶ logo/drawable-mdpi/logo.png
//!                               └── ...              (one rayon task per bucket)
//! ```
//!
//! The source is decoded once and shared read-only by every bucket task.
//! Buckets are independent: a failure in one is recorded in the
//! [`export::ExportReport`] and never stops the others.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`density`] | The fixed density table: bucket names, scale factors, folder names |
//! | [`imaging`] | Pure-Rust image operations: decode, scale math, resample, atomic write |
//! | [`export`] | The multi-density exporter: one request in, one report out |
//! | [`sources`] | Expands CLI paths into source images; validates drops |
//! | [`config`] | `drawable-resizer.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting for progress, summaries, and tables |
//!
//! # Design Decisions
//!
//! ## Relative Scale, Pixel Space
//!
//! The scale for a bucket is always `target_factor / source_factor`, never
//! the target factor alone. Artwork drawn at xhdpi exported to ldpi shrinks
//! by `0.75 / 2.0`. Scaling happens in pixel space: a 1024px mdpi source
//! becomes a 1536px hdpi bitmap. Tools that rasterize in points on a Retina
//! surface produce half that; set `images.device_scale = 2.0` to reproduce
//! their output.
//!
//! ## Floor Rounding
//!
//! Target sizes are `floor(side * scale)`, so `100x200` at xhdpi becomes
//! `37x75` at ldpi. A bucket whose size floors to zero is an error for that
//! bucket only.
//!
//! ## Format Follows the Source
//!
//! `.png` sources are written as PNG, everything else as JPEG at the
//! configured quality. The output keeps the source's filename, so Android
//! resource names stay stable across buckets.
//!
//! ## Atomic Writes
//!
//! Each output is encoded into a temporary file in its target folder and
//! renamed over the destination. Re-running an export overwrites in place and
//! never leaves a truncated drawable behind.

pub mod config;
pub mod density;
pub mod export;
pub mod imaging;
pub mod output;
pub mod sources;

#[cfg(test)]
pub(crate) mod test_helpers;
