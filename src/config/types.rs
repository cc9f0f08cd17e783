use serde::{Deserialize, Serialize};

use crate::detect::DetectConfig;
use crate::grid::GridConfig;

/// PNG compression level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// Sashimi configuration file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Input sheet image path
    pub input: String,
    /// Output directory for extracted frames
    pub output_dir: String,
    /// Base name for output files (frame_000.png, frame.json, etc.)
    pub name: String,
    /// Grid geometry used by the `grid` command
    pub grid: GridConfig,
    /// Detection tuning used by the `detect` command
    pub detect: DetectConfig,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            version: 1,
            input: String::new(),
            output_dir: ".".to_string(),
            name: "frame".to_string(),
            grid: GridConfig::default(),
            detect: DetectConfig::default(),
            compress: None,
        }
    }
}
