pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod export;
pub mod grid;
pub mod region;
pub mod session;
pub mod sheet;
pub mod tree;

pub use detect::DetectConfig;
pub use error::SliceError;
pub use grid::{GridCells, GridConfig};
pub use region::{Rect, RegionId, RegionSource, SpriteRegion};
pub use session::{PassOutcome, Session};
pub use sheet::Sheet;
pub use tree::{LeafView, NodeId, SpriteTree};
