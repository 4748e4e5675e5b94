//! Image file decode/encode and output path normalization.

use crate::core::error::{EditorError, EditorResult};
use image::{DynamicImage, ImageFormat};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extensions accepted as-is when saving (compared case-insensitively).
pub const RECOGNIZED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tiff", "gif"];

/// Extension appended to paths without a recognized one.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Return `path` unchanged if its extension is recognized, otherwise with
/// `.jpg` appended to the whole file name.
pub fn normalize_output_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let recognized = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_lowercase();
            RECOGNIZED_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false);

    if recognized {
        return path.to_path_buf();
    }

    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(DEFAULT_EXTENSION);
    PathBuf::from(name)
}

/// Decode an image file.
pub fn decode(path: impl AsRef<Path>) -> EditorResult<DynamicImage> {
    let path = path.as_ref();
    image::open(path).map_err(|source| EditorError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Encode an image to `path`, choosing the format from its extension.
///
/// GIF only takes RGB(A), so gray images are widened before writing one.
pub fn encode(image: &DynamicImage, path: impl AsRef<Path>) -> EditorResult<()> {
    let path = path.as_ref();
    let is_gif = matches!(ImageFormat::from_path(path), Ok(ImageFormat::Gif));

    let widened = match image {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => None,
        other if is_gif && other.color().has_alpha() => {
            Some(DynamicImage::ImageRgba8(other.to_rgba8()))
        }
        other if is_gif => Some(DynamicImage::ImageRgb8(other.to_rgb8())),
        _ => None,
    };

    widened
        .as_ref()
        .unwrap_or(image)
        .save(path)
        .map_err(|source| EditorError::Encode {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_extensions_kept() {
        for name in ["a.png", "a.jpg", "a.jpeg", "a.bmp", "a.tiff", "a.gif", "dir/b.PNG", "c.JpEg"] {
            assert_eq!(normalize_output_path(name), PathBuf::from(name));
        }
    }

    #[test]
    fn test_jpg_appended() {
        assert_eq!(normalize_output_path("out"), PathBuf::from("out.jpg"));
        assert_eq!(normalize_output_path("out.webp"), PathBuf::from("out.webp.jpg"));
        assert_eq!(normalize_output_path("out.tif"), PathBuf::from("out.tif.jpg"));
        assert_eq!(normalize_output_path("dir/shot."), PathBuf::from("dir/shot..jpg"));
    }

    #[test]
    fn test_decode_missing_file() {
        let err = decode("/no/such/image.png").unwrap_err();
        assert!(matches!(err, EditorError::Decode { .. }));
        assert_eq!(err.path(), Some(&PathBuf::from("/no/such/image.png")));
    }

    #[test]
    fn test_decode_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        assert!(matches!(decode(&path), Err(EditorError::Decode { .. })));
    }

    #[test]
    fn test_encode_gray_gif() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.gif");
        let image = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(4, 4, image::Luma([0])));

        encode(&image, &path).unwrap();

        let reread = decode(&path).unwrap().to_rgb8();
        assert_eq!(reread.dimensions(), (4, 4));
        assert!(reread.get_pixel(1, 1).0.iter().all(|&v| v < 5));
    }

    #[test]
    fn test_encode_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        let image = DynamicImage::new_rgb8(2, 2);

        assert!(matches!(encode(&image, &path), Err(EditorError::Encode { .. })));
    }
}
