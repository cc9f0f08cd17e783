use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sashimi")]
#[command(version, about = "Sprite sheet slicer", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Slice the sheet along a uniform grid
    Grid(GridArgs),
    /// Auto-detect sprite boundaries from the alpha channel
    Detect(DetectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GridArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Cell width in pixels
    #[arg(long, required_unless_present = "config")]
    pub cell_width: Option<u32>,

    /// Cell height in pixels
    #[arg(long, required_unless_present = "config")]
    pub cell_height: Option<u32>,

    /// Horizontal inset of each cell within its grid slot [default: 0]
    #[arg(long)]
    pub padding_x: Option<u32>,

    /// Vertical inset of each cell within its grid slot [default: 0]
    #[arg(long)]
    pub padding_y: Option<u32>,

    /// Horizontal gap between adjacent cells [default: 0]
    #[arg(long)]
    pub spacing_x: Option<u32>,

    /// Vertical gap between adjacent cells [default: 0]
    #[arg(long)]
    pub spacing_y: Option<u32>,

    /// X of the first grid slot [default: 0]
    #[arg(long)]
    pub origin_x: Option<u32>,

    /// Y of the first grid slot [default: 0]
    #[arg(long)]
    pub origin_y: Option<u32>,
}

#[derive(Args, Debug, Clone)]
pub struct DetectArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Alpha value a pixel must exceed to count as sprite [default: 0]
    #[arg(long)]
    pub alpha_threshold: Option<u8>,

    /// Discard detected boxes narrower than this [default: 8]
    #[arg(long)]
    pub min_width: Option<u32>,

    /// Discard detected boxes shorter than this [default: 8]
    #[arg(long)]
    pub min_height: Option<u32>,

    /// Merge boxes separated by a gap of at most this many pixels [default: 0]
    #[arg(long)]
    pub merge_gap: Option<u32>,
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Input sprite sheet image
    #[arg(required_unless_present = "config")]
    pub input: Option<PathBuf>,

    /// Load settings from a JSON config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output directory for extracted frames [default: .]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Base name for output files (frame_000.png, frame.json, etc.) [default: frame]
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_level_parses() {
        assert_eq!("0".parse::<CompressionLevel>(), Ok(CompressionLevel::Level(0)));
        assert_eq!("6".parse::<CompressionLevel>(), Ok(CompressionLevel::Level(6)));
        assert_eq!("max".parse::<CompressionLevel>(), Ok(CompressionLevel::Max));
        assert_eq!("MAX".parse::<CompressionLevel>(), Ok(CompressionLevel::Max));
        assert!("7".parse::<CompressionLevel>().is_err());
        assert!("fast".parse::<CompressionLevel>().is_err());
    }
}
