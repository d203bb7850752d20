//! Artwork decoding and film encoding on the `image` crate.
//!
//! Files are sniffed by content, so a PNG saved as `.jpg` still decodes.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, JPEG, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | Encode → PNG | `image::ImageFormat::Png` into an in-memory buffer |
//! | Write | `tempfile::NamedTempFile` next to the film, persisted into place |

use super::backend::{BackendError, ImageBackend};
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Production backend: reads artwork from disk and writes finished films.
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

/// Encode a film as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buffer = Vec::new();
    image.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
    Ok(buffer)
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        // Sniff the content so a mislabeled .jpg that is really a PNG still loads.
        ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| BackendError::Decode {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }

    fn save_png(&self, image: &RgbaImage, path: &Path) -> Result<(), BackendError> {
        let bytes = encode_png(image).map_err(|e| BackendError::Encode {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        // Readers only ever see a complete film: a failed write drops the
        // temp file instead of leaving a truncated PNG at `path`.
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o644))?;
        }
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageEncoder, Rgba, RgbImage};

    /// Create a small valid JPEG file with the given dimensions.
    fn create_test_jpeg(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let file = std::fs::File::create(path).unwrap();
        let writer = std::io::BufWriter::new(file);
        image::codecs::jpeg::JpegEncoder::new(writer)
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .unwrap();
    }

    #[test]
    fn decode_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("3_iphone15pro.jpg");
        create_test_jpeg(&path, 200, 150);

        let img = RustBackend::new().decode(&path).unwrap();
        assert_eq!((img.width(), img.height()), (200, 150));
        assert!(!img.color().has_alpha());
    }

    #[test]
    fn decode_png_with_wrong_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("mislabeled.jpg");
        let png = encode_png(&RgbaImage::from_pixel(12, 34, Rgba([1, 2, 3, 255]))).unwrap();
        std::fs::write(&path, png).unwrap();

        let img = RustBackend::new().decode(&path).unwrap();
        assert_eq!((img.width(), img.height()), (12, 34));
    }

    #[test]
    fn decode_nonexistent_file_is_io_error() {
        let result = RustBackend::new().decode(Path::new("/nonexistent/image.jpg"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn decode_garbage_is_decode_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("garbage.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let err = RustBackend::new().decode(&path).unwrap_err();
        assert!(matches!(err, BackendError::Decode { .. }));
        assert!(err.to_string().contains("garbage.png"));
    }

    #[test]
    fn save_png_keeps_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("1_iPhone15.png");
        let mut film = RgbaImage::new(30, 50);
        film.put_pixel(3, 4, Rgba([128, 128, 128, 255]));

        let backend = RustBackend::new();
        backend.save_png(&film, &path).unwrap();

        let reloaded = backend.decode(&path).unwrap().to_rgba8();
        assert_eq!(reloaded.dimensions(), (30, 50));
        assert_eq!(reloaded.get_pixel(3, 4), &Rgba([128, 128, 128, 255]));
        assert_eq!(reloaded.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn save_png_into_missing_folder_writes_nothing() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("missing").join("out.png");

        let result = RustBackend::new().save_png(&RgbaImage::new(2, 2), &path);
        assert!(matches!(result, Err(BackendError::Io(_))));
        assert!(!path.exists());
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn save_png_leaves_only_the_film() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("3_iPhone15Pro.png");

        RustBackend::new()
            .save_png(&RgbaImage::new(4, 4), &path)
            .unwrap();
        assert_eq!(entries(tmp.path()), vec!["3_iPhone15Pro.png"]);
    }

    #[test]
    fn save_png_replaces_existing_film() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("3_iPhone15Pro.png");
        std::fs::write(&path, b"stale").unwrap();

        let backend = RustBackend::new();
        backend.save_png(&RgbaImage::new(7, 9), &path).unwrap();

        let reloaded = backend.decode(&path).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (7, 9));
        assert_eq!(entries(tmp.path()), vec!["3_iPhone15Pro.png"]);
    }

    #[test]
    fn failed_final_write_cleans_up() {
        let tmp = tempfile::TempDir::new().unwrap();
        // A directory in the way makes the last step fail after all bytes
        // were written.
        let path = tmp.path().join("3_iPhone15Pro.png");
        std::fs::create_dir(&path).unwrap();

        let result = RustBackend::new().save_png(&RgbaImage::new(4, 4), &path);
        assert!(matches!(result, Err(BackendError::Io(_))));
        assert!(path.is_dir());
        assert_eq!(entries(tmp.path()), vec!["3_iPhone15Pro.png"]);
    }

    #[cfg(unix)]
    #[test]
    fn saved_film_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("1_iPhoneX.png");

        RustBackend::new()
            .save_png(&RgbaImage::new(2, 2), &path)
            .unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
