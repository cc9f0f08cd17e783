mod components;
mod mask;

pub use components::{component_boxes, merge_within_gap};
pub use mask::ForegroundMask;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::SliceError;
use crate::region::Rect;

/// Tuning for automatic sprite boundary detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectConfig {
    /// Pixels with alpha strictly above this count as sprite
    pub alpha_threshold: u8,
    /// Smallest bounding box width worth keeping
    pub min_width: u32,
    /// Smallest bounding box height worth keeping
    pub min_height: u32,
    /// Merge components whose boxes are at most this far apart in both
    /// axes; 0 disables merging
    pub merge_gap: u32,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            alpha_threshold: 0,
            min_width: 8,
            min_height: 8,
            merge_gap: 0,
        }
    }
}

impl DetectConfig {
    pub fn validate(&self) -> Result<(), SliceError> {
        if self.min_width == 0 || self.min_height == 0 {
            return Err(SliceError::InvalidConfig(
                "minimum sprite dimensions must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Find connected opaque regions in a sheet image.
///
/// Components whose bounding box is smaller than the configured minimum
/// are treated as noise and dropped; the survivors are gap-merged and
/// returned sorted by ascending `(y, x)` so identical input always
/// yields identical output. A fully transparent image is a valid empty
/// result, not an error.
pub fn detect_regions(
    image: &RgbaImage,
    config: &DetectConfig,
    cancel: Option<&Arc<AtomicBool>>,
) -> Result<Vec<Rect>, SliceError> {
    config.validate()?;
    if image.width() == 0 || image.height() == 0 {
        return Err(SliceError::InvalidInput(
            "cannot scan a zero-area image".to_string(),
        ));
    }

    let mask = ForegroundMask::from_alpha(image, config.alpha_threshold);
    let boxes = component_boxes(&mask, cancel)?;

    let mut boxes: Vec<Rect> = boxes
        .into_iter()
        .filter(|b| b.width >= config.min_width && b.height >= config.min_height)
        .collect();

    if config.merge_gap > 0 {
        boxes = merge_within_gap(boxes, config.merge_gap);
    }

    boxes.sort_by_key(|b| (b.y, b.x));
    Ok(boxes)
}
