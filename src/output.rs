//! PNG output and file path generation

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use image::RgbImage;

use crate::models::ColorKey;

/// Timestamp format embedded in generated file names (second resolution).
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Save an RGB image to a PNG file, creating missing parent directories.
pub fn save_png(image: &RgbImage, path: &Path) -> Result<(), image::ImageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save_with_format(path, image::ImageFormat::Png)
}

/// Generate `img_{key}_{timestamp}.png` inside `output_dir`.
///
/// # Examples
///
/// ```
/// use chrono::TimeZone;
/// use palette_mcp::models::ColorKey;
/// use palette_mcp::output::generate_output_path;
/// use std::path::Path;
///
/// let at = chrono::Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
/// let path = generate_output_path(Path::new("imgs/outputs"), ColorKey::ImageColors, at);
/// assert_eq!(path, Path::new("imgs/outputs/img_image_colors_20240309_140507.png"));
/// ```
pub fn generate_output_path(output_dir: &Path, key: ColorKey, at: DateTime<Local>) -> PathBuf {
    output_dir.join(format!("img_{}_{}.png", key, at.format(TIMESTAMP_FORMAT)))
}

/// The explicit path if given, otherwise a generated one stamped with the current time.
pub fn resolve_output_path(explicit: Option<&Path>, output_dir: &Path, key: ColorKey) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => generate_output_path(output_dir, key, Local::now()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_png_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.png");
        let image = RgbImage::from_pixel(3, 2, image::Rgb([1, 2, 3]));

        save_png(&image, &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded.dimensions(), (3, 2));
        assert_eq!(loaded.get_pixel(2, 1), &image::Rgb([1, 2, 3]));
    }

    #[test]
    fn test_save_png_ignores_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("palette.out");
        save_png(&RgbImage::new(1, 1), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[0..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn test_resolve_prefers_explicit_path() {
        let path =
            resolve_output_path(Some(Path::new("a/b.png")), Path::new("ignored"), ColorKey::ImageColors);
        assert_eq!(path, PathBuf::from("a/b.png"));
    }

    #[test]
    fn test_resolve_generates_name() {
        let path = resolve_output_path(None, Path::new("outs"), ColorKey::BackgroundColors);
        assert_eq!(path.parent(), Some(Path::new("outs")));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("img_background_colors_"));
        assert!(name.ends_with(".png"));
        // img_background_colors_YYYYmmdd_HHMMSS.png
        assert_eq!(name.len(), "img_background_colors_".len() + 15 + ".png".len());
    }
}
