use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};

use sashimi::cli::{CliArgs, Command, CommonArgs, CompressionLevel, DetectArgs, GridArgs};
use sashimi::config::{CompressConfig, LoadedConfig, SheetConfig};
use sashimi::detect::DetectConfig;
use sashimi::export::{export_frames, write_metadata};
use sashimi::grid::GridConfig;
use sashimi::session::{DETECTED_GROUP, GRID_GROUP, Session};
use sashimi::sheet::load_sheet;

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();

    let common = match &cli.command {
        Command::Grid(args) => args.common.clone(),
        Command::Detect(args) => args.common.clone(),
    };

    // Load config if specified and merge with CLI args
    let merged = merge_config_with_args(&common)?;

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(if merged.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    info!("Sashimi sprite slicer v{}", env!("CARGO_PKG_VERSION"));

    // Create output directory if it doesn't exist
    if !merged.output.exists() {
        fs::create_dir_all(&merged.output)?;
    }

    let sheet = load_sheet(&merged.input)?;
    info!(
        "Loaded {} ({}x{})",
        merged.input.display(),
        sheet.width(),
        sheet.height()
    );

    let mut session = Session::new(sheet);

    let outcome = match &cli.command {
        Command::Grid(args) => {
            let config = resolve_grid_config(args, merged.file.as_ref());
            session.grid_pass(&config, GRID_GROUP)?
        }
        Command::Detect(args) => {
            let config = resolve_detect_config(args, merged.file.as_ref());
            // No cancellation for CLI
            session.detect_pass(&config, DETECTED_GROUP, None)?
        }
    };

    info!("Extracted {} sprites", outcome.leaves.len());
    if outcome.duplicates > 0 {
        debug!("Skipped {} duplicate region(s)", outcome.duplicates);
    }
    if outcome.rejected > 0 {
        warn!("Rejected {} out-of-bounds region(s)", outcome.rejected);
    }
    if !outcome.overlaps.is_empty() {
        warn!(
            "Kept {} overlapping region pair(s); adjust spacing or merge-gap if unintended",
            outcome.overlaps.len()
        );
    }

    let written = export_frames(&session, &merged.output, &merged.name, merged.compress)?;
    info!("Saved {} frames to {}", written.len(), merged.output.display());

    write_metadata(&session, &merged.output, &merged.name)?;
    info!("Generated {}.json", merged.name);

    info!("Done!");

    Ok(())
}

/// Merged configuration from CLI args and optional config file.
struct MergedConfig {
    input: PathBuf,
    output: PathBuf,
    name: String,
    compress: Option<CompressionLevel>,
    verbose: bool,
    /// Parsed config file, kept for per-mode parameter fallbacks
    file: Option<SheetConfig>,
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_config_with_args(args: &CommonArgs) -> Result<MergedConfig> {
    // Load config if specified
    let loaded_config = if let Some(config_path) = &args.config {
        Some(
            LoadedConfig::load(config_path)
                .with_context(|| format!("failed to load config: {}", config_path.display()))?,
        )
    } else {
        None
    };

    // Determine input sheet: CLI args override config
    let input = if let Some(input) = &args.input {
        input.clone()
    } else if let Some(ref lc) = loaded_config {
        lc.resolve_input()
            .context("config file does not name an input sheet")?
    } else {
        // This shouldn't happen due to clap's required_unless_present
        anyhow::bail!("no input sheet given");
    };

    // Determine output directory: CLI > config > default
    let output = args.output.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.resolve_output_dir())
            .unwrap_or_else(|| PathBuf::from("."))
    });

    // Determine name: CLI > config > default
    let name = args.name.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.config.name.clone())
            .unwrap_or_else(|| "frame".to_string())
    });

    // Compress: CLI option overrides config
    let compress = if args.compress.is_some() {
        args.compress
    } else if let Some(ref lc) = loaded_config {
        lc.config.compress.as_ref().map(|c| match c {
            CompressConfig::Level(n) => CompressionLevel::Level(*n),
            CompressConfig::Max(_) => CompressionLevel::Max,
        })
    } else {
        None
    };

    Ok(MergedConfig {
        input,
        output,
        name,
        compress,
        verbose: args.verbose,
        file: loaded_config.map(|lc| lc.config),
    })
}

/// Per-field grid geometry: CLI > config > default.
fn resolve_grid_config(args: &GridArgs, file: Option<&SheetConfig>) -> GridConfig {
    let base = file.map(|c| c.grid).unwrap_or_default();
    GridConfig {
        cell_width: args.cell_width.unwrap_or(base.cell_width),
        cell_height: args.cell_height.unwrap_or(base.cell_height),
        padding_x: args.padding_x.unwrap_or(base.padding_x),
        padding_y: args.padding_y.unwrap_or(base.padding_y),
        spacing_x: args.spacing_x.unwrap_or(base.spacing_x),
        spacing_y: args.spacing_y.unwrap_or(base.spacing_y),
        origin_x: args.origin_x.unwrap_or(base.origin_x),
        origin_y: args.origin_y.unwrap_or(base.origin_y),
    }
}

/// Per-field detection tuning: CLI > config > default.
fn resolve_detect_config(args: &DetectArgs, file: Option<&SheetConfig>) -> DetectConfig {
    let base = file.map(|c| c.detect).unwrap_or_default();
    DetectConfig {
        alpha_threshold: args.alpha_threshold.unwrap_or(base.alpha_threshold),
        min_width: args.min_width.unwrap_or(base.min_width),
        min_height: args.min_height.unwrap_or(base.min_height),
        merge_gap: args.merge_gap.unwrap_or(base.merge_gap),
    }
}
