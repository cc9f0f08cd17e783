use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::detect::{DetectConfig, detect_regions};
use crate::error::SliceError;
use crate::grid::GridConfig;
use crate::region::{
    Rect, RegionId, RegionIds, RegionSource, SpriteRegion, resolve_candidates, validate_bounds,
};
use crate::sheet::Sheet;
use crate::tree::{NodeId, SpriteTree};

/// Default group name for detection passes.
pub const DETECTED_GROUP: &str = "Detected Sprites";
/// Default group name for grid passes.
pub const GRID_GROUP: &str = "Grid";

/// One editing session: a sheet, its sprite tree and the region id
/// allocator. All core operations go through the session; there is no
/// global state. Mutations are serialized by `&mut self`.
pub struct Session {
    sheet: Sheet,
    tree: SpriteTree,
    ids: RegionIds,
}

/// What an extraction pass changed.
#[derive(Debug)]
pub struct PassOutcome {
    /// Group the new leaves were inserted under
    pub group: NodeId,
    /// Newly created leaves, in insertion order
    pub leaves: Vec<NodeId>,
    /// Candidates skipped because an identical rectangle already exists
    pub duplicates: usize,
    /// Candidates rejected for lying fully outside the sheet
    pub rejected: usize,
    /// Region id pairs with overlapping but non-identical bounds; both
    /// members are kept
    pub overlaps: Vec<(RegionId, RegionId)>,
}

impl Session {
    pub fn new(sheet: Sheet) -> Self {
        Self {
            sheet,
            tree: SpriteTree::new(),
            ids: RegionIds::new(),
        }
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    pub fn tree(&self) -> &SpriteTree {
        &self.tree
    }

    /// Tree mutations (rename, reparent, reorder, remove) are issued by
    /// the caller directly against the arena.
    pub fn tree_mut(&mut self) -> &mut SpriteTree {
        &mut self.tree
    }

    /// Materialize a grid over the sheet and insert one leaf per cell
    /// under a new group.
    pub fn grid_pass(
        &mut self,
        config: &GridConfig,
        group_name: &str,
    ) -> Result<PassOutcome, SliceError> {
        let cells: Vec<Rect> = config
            .cells(self.sheet.width(), self.sheet.height())?
            .collect();
        self.insert_candidates(&cells, RegionSource::Grid, group_name)
    }

    /// Run boundary detection and insert one leaf per region found
    /// under a new group.
    pub fn detect_pass(
        &mut self,
        config: &DetectConfig,
        group_name: &str,
        cancel: Option<&Arc<AtomicBool>>,
    ) -> Result<PassOutcome, SliceError> {
        let boxes = detect_regions(&self.sheet.image, config, cancel)?;
        self.insert_candidates(&boxes, RegionSource::Detected, group_name)
    }

    /// Add a single user-drawn rectangle under `parent`. An exact
    /// duplicate of an existing region resolves to the existing leaf.
    pub fn add_manual_region(
        &mut self,
        parent: NodeId,
        bounds: Rect,
        name: &str,
    ) -> Result<NodeId, SliceError> {
        validate_bounds(bounds, self.sheet.width(), self.sheet.height())?;

        if let Some(existing) = self
            .tree
            .leaves()
            .into_iter()
            .find(|leaf| leaf.region.bounds == bounds)
        {
            return Ok(existing.id);
        }

        let region = SpriteRegion {
            id: self.ids.allocate(),
            bounds,
            source: RegionSource::Manual,
        };
        self.tree.add_leaf(parent, region, name)
    }

    /// Re-validate and commit edited bounds for a leaf region.
    pub fn edit_region_bounds(&mut self, leaf: NodeId, bounds: Rect) -> Result<(), SliceError> {
        validate_bounds(bounds, self.sheet.width(), self.sheet.height())?;
        self.tree.update_region_bounds(leaf, bounds)
    }

    /// Drop the tree and start a fresh extraction pass over the same
    /// sheet. Region and node ids keep counting up.
    pub fn reset(&mut self) {
        self.tree.clear();
    }

    fn insert_candidates(
        &mut self,
        candidates: &[Rect],
        source: RegionSource,
        group_name: &str,
    ) -> Result<PassOutcome, SliceError> {
        let existing = self.tree.leaf_regions();
        let plan = resolve_candidates(
            candidates,
            source,
            self.sheet.width(),
            self.sheet.height(),
            &existing,
            &mut self.ids,
        );

        let root = self.tree.root();
        let group = self.tree.add_group(root, group_name)?;
        let mut leaves = Vec::with_capacity(plan.accepted.len());
        for region in &plan.accepted {
            let name = self.tree.next_child_name(group)?;
            leaves.push(self.tree.add_leaf(group, *region, &name)?);
        }

        Ok(PassOutcome {
            group,
            leaves,
            duplicates: plan.duplicates.len(),
            rejected: plan.rejected.len(),
            overlaps: plan.overlaps,
        })
    }
}
