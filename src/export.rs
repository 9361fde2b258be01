//! Multi-density export.
//!
//! Takes one source image drawn at a known density and writes a resized copy
//! for every selected density bucket.
//!
//! ## Output Structure
//!
//! ```text
//! art/
//! ├── logo.png                    # Source (declared xxxhdpi)
//! └── logo/                       # One folder per source image
//!     ├── drawable-ldpi/logo.png  # 0.75 / 4.0 of the source size
//!     ├── drawable-mdpi/logo.png  # 1.0 / 4.0
//!     ├── drawable-hdpi/logo.png
//!     ├── drawable-xhdpi/logo.png
//!     ├── drawable-xxhdpi/logo.png
//!     └── drawable-xxxhdpi/logo.png
//! ```
//!
//! Only the selected buckets are produced. Re-running overwrites previous
//! outputs in place.
//!
//! ## Failure Model
//!
//! These fail the whole export before any bucket runs:
//! - a source without a file extension (its folder would be the source itself)
//! - a source that cannot be decoded
//! - an image folder that cannot be created
//!
//! Everything after that is per bucket. A directory that cannot be created,
//! a scale that leaves no pixels, or a failed write is recorded against that
//! bucket while the rest carry on. The caller decides how to present partial
//! success.
//!
//! ## Parallel Processing
//!
//! The source is decoded once. Buckets are then exported in parallel using
//! [rayon](https://docs.rs/rayon), all borrowing the same decoded image.

use crate::density::DensityBucket;
use crate::imaging::{
    BackendError, Dimensions, ImageBackend, OutputFormat, Quality, ResizeError, RustBackend,
    ScaleConfig, WriteParams, scale_image,
};
use image::DynamicImage;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Errors that stop an export before any bucket is attempted.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Cannot export {}: a file extension is needed to name its output folder", .path.display())]
    NoExtension { path: PathBuf },
    #[error("Cannot decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("Cannot create output folder {}: {source}", .path.display())]
    OutputFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors confined to a single density bucket.
#[derive(Error, Debug)]
pub enum BucketError {
    #[error("cannot create {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot scale: {0}")]
    Scale(#[from] ResizeError),
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
}

/// One export action: a source, the density it is drawn at, and the buckets to produce.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub source: PathBuf,
    pub source_density: DensityBucket,
    pub targets: BTreeSet<DensityBucket>,
}

impl ExportRequest {
    pub fn new(
        source: impl Into<PathBuf>,
        source_density: DensityBucket,
        targets: impl IntoIterator<Item = DensityBucket>,
    ) -> Self {
        Self {
            source: source.into(),
            source_density,
            targets: targets.into_iter().collect(),
        }
    }
}

/// Encoding and scaling options shared by every bucket of an export.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExportOptions {
    pub quality: Quality,
    pub scale: ScaleConfig,
}

impl ExportOptions {
    pub fn from_config(config: &crate::config::ResizerConfig) -> Self {
        Self {
            quality: Quality::new(config.images.jpeg_quality),
            scale: ScaleConfig {
                filter: config.images.filter,
                device_scale: config.images.device_scale,
            },
        }
    }
}

/// Result of exporting one bucket.
#[derive(Debug)]
pub struct BucketOutcome {
    pub density: DensityBucket,
    pub output: PathBuf,
    /// Dimensions of the written image on success.
    pub result: Result<Dimensions, BucketError>,
}

impl BucketOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Everything one call to [`save_all`] produced.
#[derive(Debug)]
pub struct ExportReport {
    pub source: PathBuf,
    pub source_density: DensityBucket,
    pub source_dimensions: Dimensions,
    pub image_folder: PathBuf,
    /// Container every bucket is written in.
    pub format: OutputFormat,
    /// Sorted from lowest to highest density.
    pub outcomes: Vec<BucketOutcome>,
}

impl ExportReport {
    pub fn saved_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &BucketOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(BucketOutcome::is_success)
    }

    pub fn outcome(&self, density: DensityBucket) -> Option<&BucketOutcome> {
        self.outcomes.iter().find(|o| o.density == density)
    }
}

/// Progress event emitted while an export runs.
#[derive(Debug, Clone)]
pub enum ExportEvent {
    /// The source decoded; bucket work is about to start.
    SourceStarted {
        source: PathBuf,
        source_density: DensityBucket,
        dimensions: Dimensions,
        bucket_count: usize,
    },
    /// A bucket finished, successfully or not. Arrives in completion order.
    BucketFinished {
        density: DensityBucket,
        output: PathBuf,
        result: Result<Dimensions, String>,
    },
}

/// The folder that holds every bucket for `source`: the source path minus its extension.
///
/// Equal to `source` when it has no extension; [`save_all`] rejects such sources.
pub fn image_folder(source: &Path) -> PathBuf {
    source.with_extension("")
}

/// Output path of `source` within `density`'s folder.
pub fn output_path(source: &Path, density: DensityBucket) -> PathBuf {
    let folder = image_folder(source).join(density.folder_name());
    match source.file_name() {
        Some(name) => folder.join(name),
        None => folder,
    }
}

/// Export `request` with the pure Rust backend.
pub fn save_all(
    request: &ExportRequest,
    options: &ExportOptions,
    progress: Option<Sender<ExportEvent>>,
) -> Result<ExportReport, ExportError> {
    save_all_with_backend(&RustBackend::new(), request, options, progress)
}

/// Export `request` using a specific backend (allows testing with mock).
pub fn save_all_with_backend(
    backend: &impl ImageBackend,
    request: &ExportRequest,
    options: &ExportOptions,
    progress: Option<Sender<ExportEvent>>,
) -> Result<ExportReport, ExportError> {
    if request.source.extension().is_none() {
        return Err(ExportError::NoExtension {
            path: request.source.clone(),
        });
    }

    let source = backend
        .decode(&request.source)
        .map_err(|e| ExportError::Decode {
            path: request.source.clone(),
            source: e,
        })?;
    let source_dimensions = Dimensions::of(&source);

    // Must exist before any bucket starts.
    let folder = image_folder(&request.source);
    std::fs::create_dir_all(&folder).map_err(|e| ExportError::OutputFolder {
        path: folder.clone(),
        source: e,
    })?;

    if let Some(tx) = &progress {
        tx.send(ExportEvent::SourceStarted {
            source: request.source.clone(),
            source_density: request.source_density,
            dimensions: source_dimensions,
            bucket_count: request.targets.len(),
        })
        .ok();
    }

    let format = OutputFormat::for_source(&request.source);
    let mut outcomes: Vec<BucketOutcome> = request
        .targets
        .par_iter()
        .map(|&density| {
            let outcome = export_bucket(backend, &source, request, density, format, options);
            if let Some(tx) = &progress {
                tx.send(ExportEvent::BucketFinished {
                    density,
                    output: outcome.output.clone(),
                    result: outcome.result.as_ref().copied().map_err(|e| e.to_string()),
                })
                .ok();
            }
            outcome
        })
        .collect();
    outcomes.sort_by_key(|o| o.density);

    Ok(ExportReport {
        source: request.source.clone(),
        source_density: request.source_density,
        source_dimensions,
        image_folder: folder,
        format,
        outcomes,
    })
}

fn export_bucket(
    backend: &impl ImageBackend,
    source: &DynamicImage,
    request: &ExportRequest,
    density: DensityBucket,
    format: OutputFormat,
    options: &ExportOptions,
) -> BucketOutcome {
    let output = output_path(&request.source, density);
    let result = write_bucket(backend, source, request, density, &output, format, options);
    if let Err(e) = &result {
        log::warn!("{} {}: {}", request.source.display(), density, e);
    }
    BucketOutcome {
        density,
        output,
        result,
    }
}

fn write_bucket(
    backend: &impl ImageBackend,
    source: &DynamicImage,
    request: &ExportRequest,
    density: DensityBucket,
    output: &Path,
    format: OutputFormat,
    options: &ExportOptions,
) -> Result<Dimensions, BucketError> {
    let target_dir = image_folder(&request.source).join(density.folder_name());
    std::fs::create_dir_all(&target_dir).map_err(|e| BucketError::Directory {
        path: target_dir.clone(),
        source: e,
    })?;

    let scale = density.scale_from(request.source_density);
    log::debug!(
        "scale for {} from {} is {}",
        density,
        request.source_density,
        scale
    );

    let resized = scale_image(backend, source, scale, &options.scale)?;
    let dimensions = Dimensions::of(&resized);

    backend
        .write(
            &resized,
            &WriteParams {
                output: output.to_path_buf(),
                format,
                quality: options.quality,
            },
        )
        .map_err(|e| BucketError::Write {
            path: output.to_path_buf(),
            source: e,
        })?;

    log::debug!(
        "wrote {} ({}x{})",
        output.display(),
        dimensions.width,
        dimensions.height
    );
    Ok(dimensions)
}
