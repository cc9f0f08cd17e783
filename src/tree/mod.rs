mod node;

pub use node::{NodeId, NodeKind, SpriteNode};

use std::collections::HashMap;

use crate::error::SliceError;
use crate::region::{Rect, RegionId, SpriteRegion};

/// Name of the implicit root group.
const ROOT_NAME: &str = "Sprites";

/// Hierarchy of sprite groups and leaves, indexed by stable ids.
///
/// Nodes live in an arena keyed by `NodeId`; a presentation layer holds
/// only ids and re-renders from the arena. Every mutation validates
/// before it commits, so a failed call leaves the tree untouched. The
/// implicit root group always exists and cannot be removed or moved.
#[derive(Debug)]
pub struct SpriteTree {
    nodes: HashMap<NodeId, SpriteNode>,
    root: NodeId,
    next_id: u64,
}

/// A leaf with its location in the hierarchy, as produced by
/// [`SpriteTree::leaves`]. `group_path` is the `/`-joined chain of
/// group names below the root.
#[derive(Debug, Clone)]
pub struct LeafView {
    pub id: NodeId,
    pub name: String,
    pub group_path: String,
    pub region: SpriteRegion,
}

impl SpriteTree {
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            SpriteNode {
                name: ROOT_NAME.to_string(),
                parent: None,
                kind: NodeKind::Group {
                    children: Vec::new(),
                    name_counter: 1,
                },
            },
        );
        Self {
            nodes,
            root,
            next_id: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> Result<&SpriteNode, SliceError> {
        self.nodes.get(&id).ok_or(SliceError::NotFound(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut SpriteNode, SliceError> {
        self.nodes.get_mut(&id).ok_or(SliceError::NotFound(id))
    }

    fn expect_group(&self, id: NodeId) -> Result<(), SliceError> {
        if self.get(id)?.is_group() {
            Ok(())
        } else {
            Err(SliceError::NotAGroup(id))
        }
    }

    fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(&parent)
            && let NodeKind::Group { children, .. } = &mut node.kind
        {
            children.push(child);
        }
    }

    fn detach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(&parent)
            && let NodeKind::Group { children, .. } = &mut node.kind
        {
            children.retain(|&c| c != child);
        }
    }

    /// Add an empty group under `parent`.
    pub fn add_group(&mut self, parent: NodeId, name: &str) -> Result<NodeId, SliceError> {
        self.expect_group(parent)?;
        let id = self.allocate();
        self.nodes.insert(
            id,
            SpriteNode {
                name: name.to_string(),
                parent: Some(parent),
                kind: NodeKind::Group {
                    children: Vec::new(),
                    name_counter: 1,
                },
            },
        );
        self.attach(parent, id);
        Ok(id)
    }

    /// Add a leaf sprite under `parent`.
    pub fn add_leaf(
        &mut self,
        parent: NodeId,
        region: SpriteRegion,
        name: &str,
    ) -> Result<NodeId, SliceError> {
        self.expect_group(parent)?;
        let id = self.allocate();
        self.nodes.insert(
            id,
            SpriteNode {
                name: name.to_string(),
                parent: Some(parent),
                kind: NodeKind::Leaf { region },
            },
        );
        self.attach(parent, id);
        Ok(id)
    }

    /// Next auto-generated child name for a group: "<group> <n>". The
    /// counter only moves forward, so deleted names are not recycled.
    pub fn next_child_name(&mut self, group: NodeId) -> Result<String, SliceError> {
        let node = self.get_mut(group)?;
        match &mut node.kind {
            NodeKind::Group { name_counter, .. } => {
                let name = format!("{} {}", node.name, name_counter);
                *name_counter += 1;
                Ok(name)
            }
            NodeKind::Leaf { .. } => Err(SliceError::NotAGroup(group)),
        }
    }

    /// Remove a node and its whole subtree. Returns the region ids of
    /// every removed leaf so the caller can release export state.
    pub fn remove(&mut self, id: NodeId) -> Result<Vec<RegionId>, SliceError> {
        if id == self.root {
            return Err(SliceError::RootImmutable);
        }
        let parent = self.get(id)?.parent;

        if let Some(parent) = parent {
            self.detach(parent, id);
        }

        let mut removed_regions = Vec::new();
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                match node.kind {
                    NodeKind::Leaf { region } => removed_regions.push(region.id),
                    NodeKind::Group { children, .. } => pending.extend(children),
                }
            }
        }
        Ok(removed_regions)
    }

    /// Move a node under a new parent group, appended at the end of its
    /// child list. Fails with `Cycle` when the target is the node
    /// itself or one of its descendants; the tree is unchanged on
    /// failure.
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId) -> Result<(), SliceError> {
        if id == self.root {
            return Err(SliceError::RootImmutable);
        }
        let old_parent = self.get(id)?.parent;
        self.expect_group(new_parent)?;

        if id == new_parent || self.is_descendant(new_parent, id) {
            return Err(SliceError::Cycle {
                node: id,
                target: new_parent,
            });
        }

        if let Some(old_parent) = old_parent {
            self.detach(old_parent, id);
        }
        self.attach(new_parent, id);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = Some(new_parent);
        }
        Ok(())
    }

    /// True when `node` lies strictly inside the subtree rooted at
    /// `ancestor`.
    fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.nodes.get(&node).and_then(|n| n.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    pub fn rename(&mut self, id: NodeId, name: &str) -> Result<(), SliceError> {
        self.get_mut(id)?.name = name.to_string();
        Ok(())
    }

    /// Replace a group's child order. The new order must be a
    /// permutation of the current children.
    pub fn reorder(&mut self, parent: NodeId, new_order: &[NodeId]) -> Result<(), SliceError> {
        self.expect_group(parent)?;

        let current = self.get(parent)?.children();
        let mut expected = current.to_vec();
        let mut proposed = new_order.to_vec();
        expected.sort_unstable();
        proposed.sort_unstable();
        if expected != proposed {
            return Err(SliceError::InvalidOrder { parent });
        }

        if let Some(node) = self.nodes.get_mut(&parent)
            && let NodeKind::Group { children, .. } = &mut node.kind
        {
            *children = new_order.to_vec();
        }
        Ok(())
    }

    /// Replace the bounds of a leaf's region. Validity (non-zero area,
    /// inside the sheet) is checked by the session before this commits.
    pub fn update_region_bounds(&mut self, id: NodeId, bounds: Rect) -> Result<(), SliceError> {
        let node = self.get_mut(id)?;
        match &mut node.kind {
            NodeKind::Leaf { region } => {
                region.bounds = bounds;
                Ok(())
            }
            NodeKind::Group { .. } => Err(SliceError::NotALeaf(id)),
        }
    }

    /// All leaf regions in depth-first order.
    pub fn leaf_regions(&self) -> Vec<SpriteRegion> {
        self.leaves().into_iter().map(|leaf| leaf.region).collect()
    }

    /// All leaves with their hierarchy context, in depth-first order.
    pub fn leaves(&self) -> Vec<LeafView> {
        let mut out = Vec::new();
        self.collect_leaves(self.root, "", &mut out);
        out
    }

    fn collect_leaves(&self, id: NodeId, prefix: &str, out: &mut Vec<LeafView>) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        match &node.kind {
            NodeKind::Leaf { region } => out.push(LeafView {
                id,
                name: node.name.clone(),
                group_path: prefix.to_string(),
                region: *region,
            }),
            NodeKind::Group { children, .. } => {
                let child_prefix = if id == self.root {
                    String::new()
                } else if prefix.is_empty() {
                    node.name.clone()
                } else {
                    format!("{}/{}", prefix, node.name)
                };
                for &child in children {
                    self.collect_leaves(child, &child_prefix, out);
                }
            }
        }
    }

    /// Drop everything below the root. Node ids keep counting up, so
    /// stale ids from before the clear never resolve again.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.insert(
            self.root,
            SpriteNode {
                name: ROOT_NAME.to_string(),
                parent: None,
                kind: NodeKind::Group {
                    children: Vec::new(),
                    name_counter: 1,
                },
            },
        );
    }
}

impl Default for SpriteTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{RegionSource, SpriteRegion};

    fn region(id: u64) -> SpriteRegion {
        SpriteRegion {
            id: RegionId(id),
            bounds: Rect::new(0, 0, 8, 8),
            source: RegionSource::Manual,
        }
    }

    #[test]
    fn test_add_and_get() {
        let mut tree = SpriteTree::new();
        let group = tree.add_group(tree.root(), "Walk").unwrap();
        let leaf = tree.add_leaf(group, region(1), "Walk 1").unwrap();

        assert!(tree.get(group).unwrap().is_group());
        assert_eq!(tree.get(leaf).unwrap().name, "Walk 1");
        assert_eq!(tree.get(leaf).unwrap().parent, Some(group));
    }

    #[test]
    fn test_add_under_leaf_fails() {
        let mut tree = SpriteTree::new();
        let leaf = tree.add_leaf(tree.root(), region(1), "lone").unwrap();

        let result = tree.add_leaf(leaf, region(2), "child");
        assert!(matches!(result, Err(SliceError::NotAGroup(_))));
    }

    #[test]
    fn test_next_child_name_counts_up() {
        let mut tree = SpriteTree::new();
        let group = tree.add_group(tree.root(), "Run").unwrap();

        assert_eq!(tree.next_child_name(group).unwrap(), "Run 1");
        assert_eq!(tree.next_child_name(group).unwrap(), "Run 2");

        // Deleting children does not rewind the counter
        let leaf = tree.add_leaf(group, region(1), "Run 3").unwrap();
        tree.remove(leaf).unwrap();
        assert_eq!(tree.next_child_name(group).unwrap(), "Run 3");
    }

    #[test]
    fn test_remove_cascades_and_returns_region_ids() {
        let mut tree = SpriteTree::new();
        let group = tree.add_group(tree.root(), "Idle").unwrap();
        let sub = tree.add_group(group, "Blink").unwrap();
        tree.add_leaf(group, region(10), "Idle 1").unwrap();
        tree.add_leaf(sub, region(11), "Blink 1").unwrap();
        tree.add_leaf(sub, region(12), "Blink 2").unwrap();

        let mut removed = tree.remove(group).unwrap();
        removed.sort_unstable();

        assert_eq!(removed, vec![RegionId(10), RegionId(11), RegionId(12)]);
        assert!(!tree.contains(group));
        assert!(!tree.contains(sub));
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_add_under_removed_parent_fails() {
        let mut tree = SpriteTree::new();
        let group = tree.add_group(tree.root(), "Gone").unwrap();
        tree.remove(group).unwrap();

        let result = tree.add_leaf(group, region(1), "orphan");
        assert!(matches!(result, Err(SliceError::NotFound(id)) if id == group));
    }

    #[test]
    fn test_remove_root_fails() {
        let mut tree = SpriteTree::new();
        assert!(matches!(
            tree.remove(tree.root()),
            Err(SliceError::RootImmutable)
        ));
    }

    #[test]
    fn test_reparent_moves_subtree() {
        let mut tree = SpriteTree::new();
        let a = tree.add_group(tree.root(), "A").unwrap();
        let b = tree.add_group(tree.root(), "B").unwrap();
        let leaf = tree.add_leaf(a, region(1), "A 1").unwrap();

        tree.reparent(leaf, b).unwrap();

        assert_eq!(tree.get(leaf).unwrap().parent, Some(b));
        assert_eq!(tree.get(a).unwrap().children(), &[]);
        assert_eq!(tree.get(b).unwrap().children(), &[leaf]);
    }

    #[test]
    fn test_reparent_into_descendant_fails_unchanged() {
        let mut tree = SpriteTree::new();
        let a = tree.add_group(tree.root(), "A").unwrap();
        let b = tree.add_group(a, "B").unwrap();
        let c = tree.add_group(b, "C").unwrap();

        let result = tree.reparent(a, c);

        assert!(matches!(result, Err(SliceError::Cycle { .. })));
        // Structure untouched
        assert_eq!(tree.get(a).unwrap().parent, Some(tree.root()));
        assert_eq!(tree.get(a).unwrap().children(), &[b]);
        assert_eq!(tree.get(b).unwrap().children(), &[c]);
    }

    #[test]
    fn test_reparent_onto_itself_fails() {
        let mut tree = SpriteTree::new();
        let a = tree.add_group(tree.root(), "A").unwrap();

        assert!(matches!(
            tree.reparent(a, a),
            Err(SliceError::Cycle { .. })
        ));
    }

    #[test]
    fn test_reorder() {
        let mut tree = SpriteTree::new();
        let group = tree.add_group(tree.root(), "G").unwrap();
        let x = tree.add_leaf(group, region(1), "G 1").unwrap();
        let y = tree.add_leaf(group, region(2), "G 2").unwrap();
        let z = tree.add_leaf(group, region(3), "G 3").unwrap();

        tree.reorder(group, &[z, x, y]).unwrap();
        assert_eq!(tree.get(group).unwrap().children(), &[z, x, y]);

        // Not a permutation of the current children
        let result = tree.reorder(group, &[z, x]);
        assert!(matches!(result, Err(SliceError::InvalidOrder { .. })));
        let result = tree.reorder(group, &[z, x, x]);
        assert!(matches!(result, Err(SliceError::InvalidOrder { .. })));
    }

    #[test]
    fn test_rename() {
        let mut tree = SpriteTree::new();
        let group = tree.add_group(tree.root(), "Old").unwrap();

        tree.rename(group, "New").unwrap();

        assert_eq!(tree.get(group).unwrap().name, "New");
        assert!(matches!(
            tree.rename(NodeId(999), "x"),
            Err(SliceError::NotFound(_))
        ));
    }

    #[test]
    fn test_leaves_depth_first_with_paths() {
        let mut tree = SpriteTree::new();
        let walk = tree.add_group(tree.root(), "Walk").unwrap();
        let north = tree.add_group(walk, "North").unwrap();
        tree.add_leaf(walk, region(1), "Walk 1").unwrap();
        tree.add_leaf(north, region(2), "North 1").unwrap();
        tree.add_leaf(tree.root(), region(3), "stray").unwrap();

        let leaves = tree.leaves();

        assert_eq!(leaves.len(), 3);
        assert_eq!(leaves[0].group_path, "Walk/North");
        assert_eq!(leaves[0].name, "North 1");
        assert_eq!(leaves[1].group_path, "Walk");
        assert_eq!(leaves[2].group_path, "");
    }

    #[test]
    fn test_clear_keeps_ids_fresh() {
        let mut tree = SpriteTree::new();
        let before = tree.add_group(tree.root(), "A").unwrap();

        tree.clear();
        let after = tree.add_group(tree.root(), "B").unwrap();

        assert!(after > before);
        assert!(!tree.contains(before));
    }
}
