use std::fmt;

use serde::{Deserialize, Serialize};

use crate::region::SpriteRegion;

/// Stable identifier for a node in the sprite tree. Allocated
/// monotonically; never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payload of a tree node: a named group or a leaf sprite.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Group {
        /// Child ids in display order
        children: Vec<NodeId>,
        /// Next ordinal for auto-named children; survives deletions so
        /// names are not recycled
        name_counter: u32,
    },
    Leaf { region: SpriteRegion },
}

/// One node in the arena. Every node has exactly one parent except the
/// root.
#[derive(Debug, Clone)]
pub struct SpriteNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl SpriteNode {
    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group { .. })
    }

    pub fn region(&self) -> Option<&SpriteRegion> {
        match &self.kind {
            NodeKind::Leaf { region } => Some(region),
            NodeKind::Group { .. } => None,
        }
    }

    /// Child ids for a group, empty for a leaf.
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Group { children, .. } => children,
            NodeKind::Leaf { .. } => &[],
        }
    }
}
