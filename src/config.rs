//! Exporter configuration.
//!
//! Handles loading, validating, and merging the optional
//! `drawable-resizer.toml`. Stock defaults are the base layer; a user file
//! overrides only the keys it sets, and command-line flags override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [export]
//! source_density = "xxxhdpi"  # Density the source artwork is drawn at
//! densities = ["ldpi", "mdpi", "hdpi", "xhdpi", "xxhdpi", "xxxhdpi"]
//!
//! [images]
//! jpeg_quality = 90           # JPEG quality (1-100); PNG is always lossless
//! filter = "lanczos3"         # triangle | catmull-rom | gaussian | lanczos3
//! device_scale = 1.0          # Divide scales by this (2.0 mimics a Retina rasterizer)
//!
//! [processing]
//! max_processes = 4           # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! The density table itself (scale factors and folder names) is compiled in
//! and cannot be configured. Unknown keys are rejected to catch typos early.

use crate::density::DensityBucket;
use crate::imaging::ResampleFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "drawable-resizer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Exporter configuration.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizerConfig {
    /// Which densities to produce and what the source is drawn at.
    pub export: ExportConfig,
    /// Encoding and resampling settings.
    pub images: ImagesConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl ResizerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.images.jpeg_quality) {
            return Err(ConfigError::Validation(
                "images.jpeg_quality must be 1-100".into(),
            ));
        }
        if !self.images.device_scale.is_finite() || self.images.device_scale <= 0.0 {
            return Err(ConfigError::Validation(
                "images.device_scale must be a positive number".into(),
            ));
        }
        if self.export.densities.is_empty() {
            return Err(ConfigError::Validation(
                "export.densities must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Density selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Density the source image is assumed to already be drawn at.
    pub source_density: DensityBucket,
    /// Buckets to export when none are given on the command line.
    pub densities: Vec<DensityBucket>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            source_density: DensityBucket::Xxxhdpi,
            densities: DensityBucket::ALL.to_vec(),
        }
    }
}

/// Encoding and resampling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Quality for JPEG outputs.
    pub jpeg_quality: u32,
    /// Resampling kernel.
    pub filter: ResampleFilter,
    /// Scales are divided by this before rasterizing. 1.0 = pixel space.
    pub device_scale: f64,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 90,
            filter: ResampleFilter::default(),
            device_scale: 1.0,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel export workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ResizerConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ResizerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ResizerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the exporter configuration.
///
/// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] in
/// `search_dir` is used if present; otherwise the stock defaults apply.
pub fn load_config(
    explicit: Option<&Path>,
    search_dir: &Path,
) -> Result<ResizerConfig, ConfigError> {
    let overlay = match explicit {
        Some(path) => Some(load_raw_config(path)?),
        None => {
            let candidate = search_dir.join(DEFAULT_CONFIG_FILE);
            if candidate.is_file() {
                log::debug!("using config {}", candidate.display());
                Some(load_raw_config(&candidate)?)
            } else {
                None
            }
        }
    };
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# drawable-resizer configuration
# ==============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Looked up as ./drawable-resizer.toml, or passed with --config <file>.
# Command-line flags override values set here. Unknown keys are an error.

# ---------------------------------------------------------------------------
# Density selection
# ---------------------------------------------------------------------------
[export]
# Density the source artwork is drawn at. Every output is scaled by
# target factor / source factor, e.g. xxxhdpi (4.0) -> mdpi (1.0) is 0.25.
# One of: ldpi, mdpi, hdpi, xhdpi, xxhdpi, xxxhdpi
source_density = "xxxhdpi"

# Buckets to export when --densities is not given.
densities = ["ldpi", "mdpi", "hdpi", "xhdpi", "xxhdpi", "xxxhdpi"]

# ---------------------------------------------------------------------------
# Encoding and resampling
# ---------------------------------------------------------------------------
[images]
# JPEG quality (1 = worst, 100 = best). PNG sources stay lossless PNG.
jpeg_quality = 90

# Resampling kernel: triangle (bilinear), catmull-rom, gaussian, lanczos3.
filter = "lanczos3"

# Scales are divided by this before rasterizing. Leave at 1.0 for exact
# pixel sizes; 2.0 reproduces tools that rasterize in Retina points.
device_scale = 1.0

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel export workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
