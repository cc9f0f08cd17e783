use std::fmt;

use serde::{Deserialize, Serialize};

use super::Rect;

/// Stable identifier for a sprite region within a session.
///
/// Ids are allocated monotonically and never reused after deletion, so
/// external references (animation frame lists, export manifests) stay
/// valid across tree edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub u64);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a region came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionSource {
    /// Materialized from a grid cell
    Grid,
    /// Found by boundary detection
    Detected,
    /// Drawn or edited by hand
    Manual,
}

/// A rectangular sub-area of the sheet identified as one sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteRegion {
    pub id: RegionId,
    pub bounds: Rect,
    pub source: RegionSource,
}
