//! Picture loading
//!
//! Decodes the drawn image and fits it to the drill frame. The session only
//! commits a new item after its picture decoded successfully.

use crate::config::Config;
use crate::error::ImageLoadError;
use image::imageops::FilterType;
use std::path::Path;
use tracing::debug;

/// Decoded picture ready for display (RGBA8, row-major)
#[derive(Clone, PartialEq, Eq)]
pub struct Picture {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for Picture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Picture")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// Opens the picture for a practice item
pub trait PictureLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Picture, ImageLoadError>;
}

/// Loader backed by the `image` crate, resizing to a fixed frame
#[derive(Debug, Clone)]
pub struct ImageLoader {
    width: u32,
    height: u32,
}

impl ImageLoader {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.picture_width, config.picture_height)
    }
}

impl PictureLoader for ImageLoader {
    fn load(&self, path: &Path) -> Result<Picture, ImageLoadError> {
        let img = image::open(path).map_err(|e| ImageLoadError {
            file: file_label(path),
            reason: e.to_string(),
        })?;
        debug!(
            "Decoded {} ({}x{})",
            path.display(),
            img.width(),
            img.height()
        );

        let rgba = img
            .resize_exact(self.width, self.height, FilterType::Lanczos3)
            .to_rgba8();
        Ok(Picture {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        })
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_load_resizes_to_frame() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("Earth.png");
        RgbImage::from_pixel(64, 48, Rgb([10, 90, 200]))
            .save(&path)
            .expect("save png");

        let picture = ImageLoader::new(240, 160).load(&path).expect("load");
        assert_eq!((picture.width, picture.height), (240, 160));
        assert_eq!(picture.rgba.len(), 240 * 160 * 4);
    }

    #[test]
    fn test_corrupt_file_is_image_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("Mars.jpg");
        std::fs::write(&path, b"definitely not a jpeg").expect("write");

        let err = ImageLoader::new(240, 160).load(&path).unwrap_err();
        assert_eq!(err.file, "Mars.jpg");
        assert!(!err.reason.is_empty());
    }

    #[test]
    fn test_missing_file_is_image_error() {
        let err = ImageLoader::new(10, 10)
            .load(Path::new("/nonexistent/Venus.png"))
            .unwrap_err();
        assert_eq!(err.file, "Venus.png");
    }
}
