use std::path::Path;

use anyhow::Result;
use image::ImageReader;
use log::debug;

use crate::error::SliceError;

use super::Sheet;

/// Load and decode a sheet image from disk.
pub fn load_sheet(path: &Path) -> Result<Sheet> {
    if !path.exists() {
        return Err(SliceError::InputNotFound(path.to_path_buf()).into());
    }

    let image = ImageReader::open(path)
        .map_err(|e| SliceError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .decode()
        .map_err(|e| SliceError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?
        .into_rgba8();

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("sheet")
        .to_string();

    debug!(
        "Decoded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );

    Ok(Sheet::new(path.to_path_buf(), name, image)?)
}
