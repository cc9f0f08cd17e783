use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::SliceError;
use crate::region::Rect;

use super::mask::ForegroundMask;

/// Bounding boxes of all 8-connected foreground components.
///
/// Scan order is row-major; each unvisited foreground pixel seeds an
/// explicit-stack flood fill. The cancellation token is checked once per
/// scan row.
pub fn component_boxes(
    mask: &ForegroundMask,
    cancel: Option<&Arc<AtomicBool>>,
) -> Result<Vec<Rect>, SliceError> {
    let width = mask.width();
    let height = mask.height();
    let mut visited = vec![false; width as usize * height as usize];
    let mut boxes = Vec::new();
    let mut stack: Vec<(u32, u32)> = Vec::new();

    for y in 0..height {
        if let Some(token) = cancel
            && token.load(Ordering::Relaxed)
        {
            return Err(SliceError::Cancelled);
        }

        for x in 0..width {
            let idx = y as usize * width as usize + x as usize;
            if visited[idx] || !mask.is_foreground(x, y) {
                continue;
            }

            visited[idx] = true;
            stack.push((x, y));

            let (mut min_x, mut min_y, mut max_x, mut max_y) = (x, y, x, y);
            while let Some((px, py)) = stack.pop() {
                min_x = min_x.min(px);
                min_y = min_y.min(py);
                max_x = max_x.max(px);
                max_y = max_y.max(py);

                // 8-connectivity: diagonal touches count as connected
                let x0 = px.saturating_sub(1);
                let y0 = py.saturating_sub(1);
                let x1 = (px + 1).min(width - 1);
                let y1 = (py + 1).min(height - 1);
                for ny in y0..=y1 {
                    for nx in x0..=x1 {
                        if nx == px && ny == py {
                            continue;
                        }
                        let nidx = ny as usize * width as usize + nx as usize;
                        if !visited[nidx] && mask.is_foreground(nx, ny) {
                            visited[nidx] = true;
                            stack.push((nx, ny));
                        }
                    }
                }
            }

            boxes.push(Rect::new(
                min_x,
                min_y,
                max_x - min_x + 1,
                max_y - min_y + 1,
            ));
        }
    }

    Ok(boxes)
}

/// Merge boxes whose per-axis gap is at most `gap`, repeated until the
/// set is stable. Boxes already overlapping in an axis have a gap of 0
/// there.
pub fn merge_within_gap(mut boxes: Vec<Rect>, gap: u32) -> Vec<Rect> {
    let mut merged = true;
    while merged {
        merged = false;
        let mut i = 0;
        while i < boxes.len() {
            let mut j = i + 1;
            while j < boxes.len() {
                if boxes[i].gap_x(&boxes[j]) <= gap && boxes[i].gap_y(&boxes[j]) <= gap {
                    boxes[i] = boxes[i].union(&boxes[j]);
                    boxes.swap_remove(j);
                    merged = true;
                } else {
                    j += 1;
                }
            }
            i += 1;
        }
    }
    boxes
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn fill(img: &mut RgbaImage, rect: Rect) {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                img.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
    }

    #[test]
    fn test_single_component_box() {
        let mut img = RgbaImage::new(32, 32);
        fill(&mut img, Rect::new(5, 7, 10, 4));

        let mask = ForegroundMask::from_alpha(&img, 0);
        let boxes = component_boxes(&mask, None).unwrap();

        assert_eq!(boxes, vec![Rect::new(5, 7, 10, 4)]);
    }

    #[test]
    fn test_diagonal_pixels_are_one_component() {
        let mut img = RgbaImage::new(8, 8);
        img.put_pixel(2, 2, Rgba([0, 0, 0, 255]));
        img.put_pixel(3, 3, Rgba([0, 0, 0, 255]));
        img.put_pixel(4, 4, Rgba([0, 0, 0, 255]));

        let mask = ForegroundMask::from_alpha(&img, 0);
        let boxes = component_boxes(&mask, None).unwrap();

        assert_eq!(boxes, vec![Rect::new(2, 2, 3, 3)]);
    }

    #[test]
    fn test_separated_components_stay_apart() {
        let mut img = RgbaImage::new(32, 16);
        fill(&mut img, Rect::new(0, 0, 8, 8));
        fill(&mut img, Rect::new(16, 4, 8, 8));

        let mask = ForegroundMask::from_alpha(&img, 0);
        let boxes = component_boxes(&mask, None).unwrap();

        assert_eq!(boxes.len(), 2);
    }

    #[test]
    fn test_cancel_token_stops_scan() {
        let img = RgbaImage::new(16, 16);
        let mask = ForegroundMask::from_alpha(&img, 0);
        let token = Arc::new(AtomicBool::new(true));

        let result = component_boxes(&mask, Some(&token));

        assert!(matches!(result, Err(SliceError::Cancelled)));
    }

    #[test]
    fn test_merge_within_gap() {
        let boxes = vec![Rect::new(0, 0, 10, 10), Rect::new(12, 0, 10, 10)];

        let merged = merge_within_gap(boxes.clone(), 3);
        assert_eq!(merged, vec![Rect::new(0, 0, 22, 10)]);

        // gap of 2 exceeds a merge distance of 1
        let kept = merge_within_gap(boxes, 1);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_merge_is_transitive() {
        // a-b and b-c are in range; the union of all three results
        let boxes = vec![
            Rect::new(0, 0, 10, 10),
            Rect::new(12, 0, 10, 10),
            Rect::new(24, 0, 10, 10),
        ];

        let merged = merge_within_gap(boxes, 2);

        assert_eq!(merged, vec![Rect::new(0, 0, 34, 10)]);
    }
}
