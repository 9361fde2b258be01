//! Source image discovery.
//!
//! Turns the paths a user hands over (dropped files, CLI arguments) into the
//! list of images to export.
//!
//! - A file is taken as-is if its extension has a compiled-in decoder.
//! - A directory contributes its direct image children, sorted by name.
//!   Subdirectories are never entered, so the `<image>/drawable-*` folders
//!   produced by a previous export are not picked up again.

use crate::imaging::rust_backend::{has_supported_extension, is_decodable_image};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No such file or directory: {}", .0.display())]
    NotFound(PathBuf),
    #[error("No supported images found in: {}", format_paths(.0))]
    NoImages(Vec<PathBuf>),
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Expand `paths` into the source images to export.
///
/// Order follows the arguments, with each directory's images sorted.
/// Duplicates (the same file named twice) are dropped.
pub fn collect_sources(paths: &[PathBuf]) -> Result<Vec<PathBuf>, SourceError> {
    let mut sources: Vec<PathBuf> = Vec::new();

    for path in paths {
        if path.is_dir() {
            sources.extend(collect_dir(path)?);
        } else if path.is_file() {
            if has_supported_extension(path) {
                sources.push(path.clone());
            } else {
                log::info!("skipping {}: unsupported extension", path.display());
            }
        } else {
            return Err(SourceError::NotFound(path.clone()));
        }
    }

    let mut seen = std::collections::HashSet::new();
    sources.retain(|p| seen.insert(p.clone()));

    if sources.is_empty() {
        return Err(SourceError::NoImages(paths.to_vec()));
    }
    Ok(sources)
}

fn collect_dir(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let mut images: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && has_supported_extension(p))
        .collect();
    images.sort();
    Ok(images)
}

/// Whether a drop of `candidates` should be accepted.
///
/// True when at least one path is a regular file whose content is a
/// decodable image. Extensions are not trusted; the bytes are sniffed.
pub fn is_valid_image_drop(candidates: &[PathBuf]) -> bool {
    candidates.iter().any(|p| is_decodable_image(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{create_test_jpeg, create_test_png};
    use tempfile::TempDir;

    #[test]
    fn single_file_is_kept() {
        let tmp = TempDir::new().unwrap();
        let icon = tmp.path().join("icon.png");
        create_test_png(&icon, 4, 4);

        let sources = collect_sources(std::slice::from_ref(&icon)).unwrap();
        assert_eq!(sources, vec![icon]);
    }

    #[test]
    fn directory_expands_to_sorted_images() {
        let tmp = TempDir::new().unwrap();
        create_test_png(&tmp.path().join("b.png"), 4, 4);
        create_test_jpeg(&tmp.path().join("a.jpg"), 4, 4);
        fs::write(tmp.path().join("notes.txt"), "hello").unwrap();

        let sources = collect_sources(&[tmp.path().to_path_buf()]).unwrap();
        let names: Vec<String> = sources
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
    }

    #[test]
    fn directory_does_not_recurse_into_previous_output() {
        let tmp = TempDir::new().unwrap();
        create_test_png(&tmp.path().join("logo.png"), 4, 4);
        let previous = tmp.path().join("logo/drawable-mdpi");
        fs::create_dir_all(&previous).unwrap();
        create_test_png(&previous.join("logo.png"), 1, 1);

        let sources = collect_sources(&[tmp.path().to_path_buf()]).unwrap();
        assert_eq!(sources, vec![tmp.path().join("logo.png")]);
    }

    #[test]
    fn duplicates_are_dropped() {
        let tmp = TempDir::new().unwrap();
        let icon = tmp.path().join("icon.png");
        create_test_png(&icon, 4, 4);

        let sources = collect_sources(&[icon.clone(), tmp.path().to_path_buf()]).unwrap();
        assert_eq!(sources, vec![icon]);
    }

    #[test]
    fn missing_path_is_error() {
        let result = collect_sources(&[PathBuf::from("/nonexistent/icon.png")]);
        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }

    #[test]
    fn nothing_usable_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("notes.txt"), "hello").unwrap();

        let result = collect_sources(&[tmp.path().to_path_buf()]);
        assert!(matches!(result, Err(SourceError::NoImages(_))));
    }

    #[test]
    fn drop_with_one_image_is_valid() {
        let tmp = TempDir::new().unwrap();
        let text = tmp.path().join("notes.txt");
        fs::write(&text, "hello").unwrap();
        let icon = tmp.path().join("icon.png");
        create_test_png(&icon, 4, 4);

        assert!(is_valid_image_drop(&[text, icon]));
    }

    #[test]
    fn drop_without_images_is_invalid() {
        let tmp = TempDir::new().unwrap();
        let fake = tmp.path().join("fake.png");
        fs::write(&fake, "not an image").unwrap();

        assert!(!is_valid_image_drop(&[fake, tmp.path().to_path_buf()]));
        assert!(!is_valid_image_drop(&[]));
    }
}
