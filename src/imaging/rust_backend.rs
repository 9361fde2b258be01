//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | Resize | `DynamicImage::resize_exact` (fresh buffer, caller's filter) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (lossless) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` at the requested quality |
//! | Atomic write | `tempfile::NamedTempFile` in the target directory, then `persist` |

use super::backend::{BackendError, ImageBackend};
use super::params::{OutputFormat, ResizeParams, WriteParams};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, DynamicImage, ImageFormat, ImageReader};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::LazyLock;
use tempfile::NamedTempFile;

/// Extensions whose decoders are compiled in.
const INPUT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    INPUT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Whether `path` has an extension we can decode (case-insensitive).
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// Identify a file's image format from its content, falling back to its extension.
///
/// Returns `None` when the file cannot be opened or no compiled-in decoder
/// handles the detected format.
pub fn sniff_format(path: &Path) -> Option<ImageFormat> {
    ImageReader::open(path)
        .ok()?
        .with_guessed_format()
        .ok()?
        .format()
        .filter(|fmt| fmt.reading_enabled())
}

/// Whether `path` is a regular file holding a decodable image.
///
/// Parses the image header, so a text file named `.png` is rejected. Pixel
/// data is not read.
pub fn is_decodable_image(path: &Path) -> bool {
    path.is_file()
        && ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .is_ok_and(|r| r.into_dimensions().is_ok())
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Encode `img` into `writer` in the given container.
fn encode(
    img: &DynamicImage,
    writer: impl Write,
    format: OutputFormat,
    quality: u32,
) -> Result<(), BackendError> {
    match format {
        OutputFormat::Png => {
            // PNG has no float samples; keep full precision in 16 bits
            let converted;
            let img = match img.color() {
                ColorType::Rgb32F | ColorType::Rgba32F => {
                    converted = DynamicImage::ImageRgba16(img.to_rgba16());
                    &converted
                }
                _ => img,
            };
            img.write_with_encoder(PngEncoder::new(writer))
                .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {}", e)))
        }
        OutputFormat::Jpeg => {
            // JPEG carries neither alpha nor 16-bit samples
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(writer, quality.clamp(1, 100) as u8);
            rgb.write_with_encoder(encoder)
                .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
        }
    }
}

/// Create the temp file an output is encoded into.
///
/// The rename keeps the temp file's mode, so it must already carry the mode
/// the output should end up with: the existing output's, or what
/// `File::create` would give a new file (0666 less the umask).
fn temp_file_for(dir: &Path, output: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let tmp = builder.tempfile_in(dir)?;
    if let Ok(existing) = fs::metadata(output) {
        tmp.as_file().set_permissions(existing.permissions())?;
    }
    Ok(tmp)
}

/// Encode into a temp file beside `params.output`, then rename it into place.
///
/// The rename replaces any existing file in one step, so readers see either
/// the old file or the complete new one.
fn save_atomic(img: &DynamicImage, params: &WriteParams) -> Result<(), BackendError> {
    let dir = match params.output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = temp_file_for(dir, &params.output)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        encode(img, &mut writer, params.format, params.quality.value())?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(&params.output).map_err(|e| BackendError::Io(e.error))?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        load_image(path)
    }

    fn resize(
        &self,
        image: &DynamicImage,
        params: &ResizeParams,
    ) -> Result<DynamicImage, BackendError> {
        if params.width == 0 || params.height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "Cannot resize to {}x{}",
                params.width, params.height
            )));
        }
        Ok(image.resize_exact(params.width, params.height, params.filter.filter_type()))
    }

    fn write(&self, image: &DynamicImage, params: &WriteParams) -> Result<(), BackendError> {
        save_atomic(image, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::{Quality, ResampleFilter};
    use crate::test_helpers::{create_test_jpeg, create_test_png, read_dimensions};

    #[test]
    fn supported_extensions_match_decodable_formats() {
        let exts = super::supported_input_extensions();
        for expected in &["jpg", "jpeg", "png", "tif", "tiff", "webp"] {
            assert!(
                exts.contains(expected),
                "expected {expected} in supported extensions"
            );
        }
    }

    #[test]
    fn extension_check_ignores_case() {
        assert!(has_supported_extension(Path::new("icon.PNG")));
        assert!(has_supported_extension(Path::new("photo.Jpeg")));
        assert!(!has_supported_extension(Path::new("notes.txt")));
        assert!(!has_supported_extension(Path::new("README")));
    }

    #[test]
    fn sniffing_trusts_content_over_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        // PNG bytes behind a .jpg name
        let path = tmp.path().join("mislabelled.jpg");
        create_test_png(&path, 8, 8);

        assert_eq!(sniff_format(&path), Some(ImageFormat::Png));
    }

    #[test]
    fn text_file_is_not_decodable() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, "just words").unwrap();

        assert!(!is_decodable_image(&path));
    }

    #[test]
    fn text_behind_image_extension_is_not_decodable() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("fake.png");
        std::fs::write(&path, "just words").unwrap();

        assert!(!is_decodable_image(&path));
    }

    #[test]
    fn real_png_is_decodable() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("icon.png");
        create_test_png(&path, 8, 8);

        assert!(is_decodable_image(&path));
    }

    #[test]
    fn directory_is_not_decodable() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(!is_decodable_image(tmp.path()));
    }

    #[test]
    fn decode_synthetic_png() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("icon.png");
        create_test_png(&path, 64, 48);

        let img = RustBackend::new().decode(&path).unwrap();
        assert_eq!((img.width(), img.height()), (64, 48));
    }

    #[test]
    fn decode_nonexistent_file_errors() {
        let result = RustBackend::new().decode(Path::new("/nonexistent/image.png"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn decode_garbage_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.png");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\nnot really").unwrap();

        let result = RustBackend::new().decode(&path);
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }

    #[test]
    fn resize_produces_exact_dimensions() {
        let img = DynamicImage::new_rgba8(100, 200);
        let resized = RustBackend::new()
            .resize(
                &img,
                &ResizeParams {
                    width: 37,
                    height: 75,
                    filter: ResampleFilter::Lanczos3,
                },
            )
            .unwrap();
        assert_eq!((resized.width(), resized.height()), (37, 75));
    }

    #[test]
    fn resize_to_zero_errors() {
        let img = DynamicImage::new_rgba8(10, 10);
        let result = RustBackend::new().resize(
            &img,
            &ResizeParams {
                width: 0,
                height: 5,
                filter: ResampleFilter::Triangle,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn write_png_is_png() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("out.png");
        let img = DynamicImage::new_rgba8(12, 9);

        RustBackend::new()
            .write(
                &img,
                &WriteParams {
                    output: output.clone(),
                    format: OutputFormat::Png,
                    quality: Quality::default(),
                },
            )
            .unwrap();

        assert_eq!(sniff_format(&output), Some(ImageFormat::Png));
        assert_eq!(read_dimensions(&output), (12, 9));
    }

    #[test]
    fn write_jpeg_drops_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("out.jpg");
        let img = DynamicImage::new_rgba8(16, 16);

        RustBackend::new()
            .write(
                &img,
                &WriteParams {
                    output: output.clone(),
                    format: OutputFormat::Jpeg,
                    quality: Quality::new(80),
                },
            )
            .unwrap();

        assert_eq!(sniff_format(&output), Some(ImageFormat::Jpeg));
        assert_eq!(read_dimensions(&output), (16, 16));
    }

    #[test]
    fn write_replaces_existing_file_and_leaves_no_temp_files() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("out.png");
        std::fs::write(&output, "stale").unwrap();

        RustBackend::new()
            .write(
                &DynamicImage::new_rgb8(5, 5),
                &WriteParams {
                    output: output.clone(),
                    format: OutputFormat::Png,
                    quality: Quality::default(),
                },
            )
            .unwrap();

        assert_eq!(read_dimensions(&output), (5, 5));
        let entries: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1, "temp file left behind");
    }

    #[cfg(unix)]
    fn mode(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[cfg(unix)]
    fn write_png(output: &Path) {
        RustBackend::new()
            .write(
                &DynamicImage::new_rgb8(5, 5),
                &WriteParams {
                    output: output.to_path_buf(),
                    format: OutputFormat::Png,
                    quality: Quality::default(),
                },
            )
            .unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn new_output_gets_regular_file_mode() {
        let tmp = tempfile::TempDir::new().unwrap();
        let reference = tmp.path().join("reference");
        fs::File::create(&reference).unwrap();
        let output = tmp.path().join("out.png");

        write_png(&output);

        assert_eq!(mode(&output), mode(&reference));
    }

    #[cfg(unix)]
    #[test]
    fn overwrite_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("out.png");
        for existing in [0o644, 0o640] {
            fs::write(&output, "stale").unwrap();
            fs::set_permissions(&output, fs::Permissions::from_mode(existing)).unwrap();

            write_png(&output);

            assert_eq!(mode(&output), existing, "{existing:o}");
            assert_eq!(read_dimensions(&output), (5, 5));
        }
    }

    #[test]
    fn write_into_missing_directory_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("missing/out.png");

        let result = RustBackend::new().write(
            &DynamicImage::new_rgb8(5, 5),
            &WriteParams {
                output: output.clone(),
                format: OutputFormat::Png,
                quality: Quality::default(),
            },
        );

        assert!(matches!(result, Err(BackendError::Io(_))));
        assert!(!output.exists());
    }

    #[test]
    fn jpeg_roundtrip_through_backend() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("photo.jpg");
        create_test_jpeg(&source, 40, 30);

        let backend = RustBackend::new();
        let img = backend.decode(&source).unwrap();
        let half = backend
            .resize(
                &img,
                &ResizeParams {
                    width: 20,
                    height: 15,
                    filter: ResampleFilter::CatmullRom,
                },
            )
            .unwrap();
        let output = tmp.path().join("half.jpg");
        backend
            .write(
                &half,
                &WriteParams {
                    output: output.clone(),
                    format: OutputFormat::Jpeg,
                    quality: Quality::default(),
                },
            )
            .unwrap();

        assert_eq!(read_dimensions(&output), (20, 15));
    }
}
