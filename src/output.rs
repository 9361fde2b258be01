//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output leads with the density bucket and the resulting size; filesystem
//! paths are secondary context, shown relative to the source image's folder
//! so a run over `art/` reads as an inventory of what was produced.
//!
//! # Output Format
//!
//! ## Export
//!
//! ```text
//! logo.png (512x512, drawn at xxxhdpi)
//!     ldpi: 96x96 → logo/drawable-ldpi/logo.png
//!     hdpi: failed (cannot write logo/drawable-hdpi/logo.png: No space left on device)
//!     mdpi: 128x128 → logo/drawable-mdpi/logo.png
//! Saved 2 of 3 sizes to logo/
//!     hdpi failed: cannot write logo/drawable-hdpi/logo.png: No space left on device
//! ```
//!
//! Bucket lines arrive in completion order; the summary lists failures
//! lowest density first.
//!
//! ## Densities
//!
//! ```text
//! Bucket    Factor  Folder            From xxxhdpi
//! ldpi      0.75    drawable-ldpi     0.1875
//! ...
//! xxxhdpi   4       drawable-xxxhdpi  1 (source)
//! ```
//!
//! # Architecture
//!
//! Every view has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::density::DensityBucket;
use crate::export::{ExportEvent, ExportReport};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

// ============================================================================
// Shared helpers
// ============================================================================

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `path` relative to the folder holding `source`, or as-is when unrelated.
fn display_relative(path: &Path, source: &Path) -> String {
    let base = source.parent().unwrap_or(Path::new(""));
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Export
// ============================================================================

/// Format one progress event from a running export.
///
/// Bucket output paths are shown relative to the folder of the source, which
/// the preceding `SourceStarted` line names.
pub fn format_export_event(event: &ExportEvent) -> Vec<String> {
    match event {
        ExportEvent::SourceStarted {
            source,
            source_density,
            dimensions,
            ..
        } => vec![format!(
            "{} ({}x{}, drawn at {})",
            file_name(source),
            dimensions.width,
            dimensions.height,
            source_density
        )],
        ExportEvent::BucketFinished {
            density,
            output,
            result,
        } => {
            // output is <dir>/<stem>/<bucket>/<file>; three levels up is the source's folder
            let shown = output
                .ancestors()
                .nth(3)
                .and_then(|base| output.strip_prefix(base).ok())
                .unwrap_or(output)
                .display()
                .to_string();
            let line = match result {
                Ok(dims) => format!(
                    "{}: {}x{} \u{2192} {}",
                    density, dims.width, dims.height, shown
                ),
                Err(reason) => format!("{}: failed ({})", density, reason),
            };
            vec![format!("{}{}", indent(1), line)]
        }
    }
}

/// Format the end-of-export summary for one source.
///
/// ```text
/// Saved 4 of 6 sizes to logo/
///     hdpi failed: cannot write ...
///     xhdpi failed: cannot create ...
/// ```
pub fn format_export_summary(report: &ExportReport) -> Vec<String> {
    let mut lines = Vec::new();
    let total = report.outcomes.len();
    let folder = display_relative(&report.image_folder, &report.source);

    if report.is_complete() {
        lines.push(format!(
            "Saved {} to {}/",
            plural(total, "size"),
            folder
        ));
    } else {
        lines.push(format!(
            "Saved {} of {} to {}/",
            report.saved_count(),
            plural(total, "size"),
            folder
        ));
        for failure in report.failures() {
            if let Err(e) = &failure.result {
                lines.push(format!("{}{} failed: {}", indent(1), failure.density, e));
            }
        }
    }
    lines
}

/// Print the export summary to stdout.
pub fn print_export_summary(report: &ExportReport) {
    for line in format_export_summary(report) {
        println!("{}", line);
    }
}

/// Machine-readable form of a report.
pub fn json_report(report: &ExportReport) -> Value {
    let outcomes: Vec<Value> = report
        .outcomes
        .iter()
        .map(|o| match &o.result {
            Ok(dims) => json!({
                "density": o.density,
                "output": o.output,
                "width": dims.width,
                "height": dims.height,
            }),
            Err(e) => json!({
                "density": o.density,
                "output": o.output,
                "error": e.to_string(),
            }),
        })
        .collect();

    json!({
        "source": report.source,
        "source_density": report.source_density,
        "source_dimensions": report.source_dimensions,
        "image_folder": report.image_folder,
        "format": report.format,
        "saved": report.saved_count(),
        "outcomes": outcomes,
    })
}

// ============================================================================
// Densities
// ============================================================================

/// Format the density table with the scale each bucket gets from `source`.
pub fn format_density_table(source: DensityBucket) -> Vec<String> {
    let mut lines = vec![format!(
        "{:<10}{:<8}{:<18}From {}",
        "Bucket", "Factor", "Folder", source
    )];
    for density in DensityBucket::ALL {
        let (factor, folder) = density.lookup();
        let marker = if density == source { " (source)" } else { "" };
        lines.push(format!(
            "{:<10}{:<8}{:<18}{}{}",
            density.name(),
            factor,
            folder,
            density.scale_from(source),
            marker
        ));
    }
    lines
}

/// Print the density table to stdout.
pub fn print_density_table(source: DensityBucket) {
    for line in format_density_table(source) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the drop check: one verdict per path, then the overall answer.
pub fn format_check_output(verdicts: &[(PathBuf, bool)]) -> Vec<String> {
    let mut lines: Vec<String> = verdicts
        .iter()
        .map(|(path, ok)| {
            let tag = if *ok { "image" } else { "skip " };
            format!("{} {}", tag, path.display())
        })
        .collect();

    let accepted = verdicts.iter().filter(|(_, ok)| *ok).count();
    if accepted > 0 {
        lines.push(format!(
            "Accepted: {} of {} decodable",
            accepted,
            plural(verdicts.len(), "path")
        ));
    } else {
        lines.push("Rejected: no decodable images".to_string());
    }
    lines
}

/// Print the drop check to stdout.
pub fn print_check_output(verdicts: &[(PathBuf, bool)]) {
    for line in format_check_output(verdicts) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
