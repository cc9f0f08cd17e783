use std::collections::HashSet;

use crate::error::SliceError;

use super::{Rect, RegionId, RegionSource, SpriteRegion};

/// Monotonic region id allocator. Ids are never reused within a session,
/// even after the regions they named are deleted.
#[derive(Debug)]
pub struct RegionIds {
    next: u64,
}

impl RegionIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn allocate(&mut self) -> RegionId {
        let id = RegionId(self.next);
        self.next += 1;
        id
    }
}

impl Default for RegionIds {
    fn default() -> Self {
        Self::new()
    }
}

/// Conflict-free insertion plan for a batch of candidate rectangles.
#[derive(Debug, Default)]
pub struct InsertionPlan {
    /// Regions cleared for insertion, in candidate order.
    pub accepted: Vec<SpriteRegion>,
    /// Candidates skipped because an identical rectangle already exists.
    pub duplicates: Vec<Rect>,
    /// Candidates rejected for lying fully outside the canvas.
    pub rejected: Vec<Rect>,
    /// Pairs of region ids whose bounds overlap without being identical.
    /// Both members are kept; resolution is up to the caller.
    pub overlaps: Vec<(RegionId, RegionId)>,
}

/// Resolve candidate rectangles against the regions already in the tree.
///
/// Exact-duplicate bounds collapse to one region, first seen wins, so
/// re-running an identical extraction pass is a no-op. Rectangles fully
/// outside the canvas are dropped into `rejected`. Overlapping but
/// non-identical rectangles are accepted and flagged.
pub fn resolve_candidates(
    candidates: &[Rect],
    source: RegionSource,
    canvas_width: u32,
    canvas_height: u32,
    existing: &[SpriteRegion],
    ids: &mut RegionIds,
) -> InsertionPlan {
    let mut seen: HashSet<Rect> = existing.iter().map(|r| r.bounds).collect();
    let mut plan = InsertionPlan::default();

    for &bounds in candidates {
        if bounds.is_outside(canvas_width, canvas_height) {
            plan.rejected.push(bounds);
            continue;
        }
        if !seen.insert(bounds) {
            plan.duplicates.push(bounds);
            continue;
        }

        let region = SpriteRegion {
            id: ids.allocate(),
            bounds,
            source,
        };

        let mut flagged = Vec::new();
        for prior in existing.iter().chain(plan.accepted.iter()) {
            if prior.bounds != bounds && prior.bounds.intersects(&bounds) {
                flagged.push((prior.id, region.id));
            }
        }
        plan.overlaps.extend(flagged);
        plan.accepted.push(region);
    }

    plan
}

/// Validity check for region bounds edits: non-zero area, fully inside
/// the sheet.
pub fn validate_bounds(
    bounds: Rect,
    canvas_width: u32,
    canvas_height: u32,
) -> Result<(), SliceError> {
    if bounds.width == 0 || bounds.height == 0 {
        return Err(SliceError::InvalidConfig(
            "region must have non-zero area".to_string(),
        ));
    }
    if !bounds.fits_within(canvas_width, canvas_height) {
        return Err(SliceError::OutOfBounds {
            region: bounds,
            width: canvas_width,
            height: canvas_height,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(id: u64, bounds: Rect) -> SpriteRegion {
        SpriteRegion {
            id: RegionId(id),
            bounds,
            source: RegionSource::Manual,
        }
    }

    #[test]
    fn test_duplicate_in_batch_collapses() {
        let mut ids = RegionIds::new();
        let rect = Rect::new(0, 0, 16, 16);

        let plan = resolve_candidates(&[rect, rect], RegionSource::Grid, 64, 64, &[], &mut ids);

        assert_eq!(plan.accepted.len(), 1);
        assert_eq!(plan.duplicates, vec![rect]);
        assert!(plan.rejected.is_empty());
    }

    #[test]
    fn test_duplicate_of_existing_collapses() {
        let mut ids = RegionIds::new();
        let rect = Rect::new(4, 4, 8, 8);
        let existing = vec![region(1, rect)];

        let plan =
            resolve_candidates(&[rect], RegionSource::Detected, 64, 64, &existing, &mut ids);

        assert!(plan.accepted.is_empty());
        assert_eq!(plan.duplicates.len(), 1);
    }

    #[test]
    fn test_fully_outside_rejected() {
        let mut ids = RegionIds::new();
        let outside = Rect::new(64, 0, 8, 8);
        let inside = Rect::new(0, 0, 8, 8);

        let plan = resolve_candidates(
            &[outside, inside],
            RegionSource::Manual,
            64,
            64,
            &[],
            &mut ids,
        );

        assert_eq!(plan.rejected, vec![outside]);
        assert_eq!(plan.accepted.len(), 1);
        assert_eq!(plan.accepted[0].bounds, inside);
    }

    #[test]
    fn test_overlap_kept_and_flagged() {
        let mut ids = RegionIds::new();
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);

        let plan = resolve_candidates(&[a, b], RegionSource::Manual, 64, 64, &[], &mut ids);

        assert_eq!(plan.accepted.len(), 2);
        assert_eq!(plan.overlaps.len(), 1);
        let (first, second) = plan.overlaps[0];
        assert_eq!(first, plan.accepted[0].id);
        assert_eq!(second, plan.accepted[1].id);
    }

    #[test]
    fn test_ids_monotonic_across_batches() {
        let mut ids = RegionIds::new();
        let first = resolve_candidates(
            &[Rect::new(0, 0, 8, 8)],
            RegionSource::Grid,
            64,
            64,
            &[],
            &mut ids,
        );
        // A second batch never reuses ids, even if earlier regions were deleted
        let second = resolve_candidates(
            &[Rect::new(16, 0, 8, 8)],
            RegionSource::Grid,
            64,
            64,
            &[],
            &mut ids,
        );

        assert!(second.accepted[0].id > first.accepted[0].id);
    }

    #[test]
    fn test_validate_bounds() {
        assert!(validate_bounds(Rect::new(0, 0, 8, 8), 64, 64).is_ok());

        let zero = validate_bounds(Rect::new(0, 0, 0, 8), 64, 64);
        assert!(matches!(zero, Err(SliceError::InvalidConfig(_))));

        let hanging = validate_bounds(Rect::new(60, 0, 8, 8), 64, 64);
        assert!(matches!(hanging, Err(SliceError::OutOfBounds { .. })));
    }
}
