use std::path::PathBuf;

use image::RgbaImage;

use crate::error::SliceError;

/// A loaded sprite sheet: one decoded RGBA image plus its identity.
///
/// The buffer is read-only for the duration of a session; grid preview
/// and detection both borrow it without coordination.
#[derive(Debug, Clone)]
pub struct Sheet {
    /// Original file path (empty for in-memory sheets)
    pub path: PathBuf,
    /// Display name, typically the file stem
    pub name: String,
    /// Decoded pixel data
    pub image: RgbaImage,
}

impl Sheet {
    /// Wrap a decoded image. Zero-area buffers are rejected.
    pub fn new(path: PathBuf, name: String, image: RgbaImage) -> Result<Self, SliceError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(SliceError::InvalidInput(format!(
                "sheet '{}' has zero area",
                name
            )));
        }
        Ok(Self { path, name, image })
    }

    /// Build a sheet from an in-memory image, for callers that decode
    /// elsewhere.
    pub fn from_image(name: &str, image: RgbaImage) -> Result<Self, SliceError> {
        Self::new(PathBuf::new(), name.to_string(), image)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Alpha sample at (x, y).
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.image.get_pixel(x, y)[3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_zero_area_rejected() {
        let result = Sheet::from_image("empty", RgbaImage::new(0, 0));
        assert!(matches!(result, Err(SliceError::InvalidInput(_))));

        let result = Sheet::from_image("flat", RgbaImage::new(16, 0));
        assert!(matches!(result, Err(SliceError::InvalidInput(_))));
    }

    #[test]
    fn test_alpha_at() {
        let mut img = RgbaImage::new(4, 4);
        img.put_pixel(2, 1, Rgba([255, 0, 0, 200]));

        let sheet = Sheet::from_image("dot", img).unwrap();

        assert_eq!(sheet.alpha_at(2, 1), 200);
        assert_eq!(sheet.alpha_at(0, 0), 0);
    }
}
