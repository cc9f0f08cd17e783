use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::Result;
use image::{ImageFormat, RgbaImage, imageops};
use log::info;
use rayon::prelude::*;

use crate::cli::CompressionLevel;
use crate::error::SliceError;
use crate::session::Session;

use super::frame_filename;

/// Crop every leaf region out of the sheet and write one PNG per frame.
///
/// Files are named `<prefix>_<index>.png` in depth-first tree order,
/// matching the metadata document. Returns the written paths in that
/// order.
pub fn export_frames(
    session: &Session,
    output_dir: &Path,
    prefix: &str,
    compress: Option<CompressionLevel>,
) -> Result<Vec<PathBuf>> {
    let leaves = session.tree().leaves();
    let sheet = session.sheet();

    info!("Writing {} frames...", leaves.len());

    leaves
        .par_iter()
        .enumerate()
        .map(|(index, leaf)| {
            let bounds = leaf.region.bounds;
            let frame =
                imageops::crop_imm(&sheet.image, bounds.x, bounds.y, bounds.width, bounds.height)
                    .to_image();

            let path = output_dir.join(frame_filename(prefix, index));
            write_png(&frame, &path, compress)?;
            Ok(path)
        })
        .collect()
}

/// Encode a frame as PNG in memory, optionally recompress, write to disk.
fn write_png(frame: &RgbaImage, path: &Path, compress: Option<CompressionLevel>) -> Result<()> {
    let mut png_data = Cursor::new(Vec::new());
    frame
        .write_to(&mut png_data, ImageFormat::Png)
        .map_err(|e| SliceError::ImageSave {
            path: path.to_path_buf(),
            source: e,
        })?;

    let output_data = if let Some(level) = compress {
        let opts = match level {
            CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
            CompressionLevel::Max => oxipng::Options::max_compression(),
        };
        oxipng::optimize_from_memory(&png_data.into_inner(), &opts).map_err(|e| {
            SliceError::PngCompress {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?
    } else {
        png_data.into_inner()
    };

    fs::write(path, output_data).map_err(|e| SliceError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
