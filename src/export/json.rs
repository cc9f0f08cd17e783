use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::error::SliceError;
use crate::region::RegionSource;
use crate::session::Session;

use super::frame_filename;

#[derive(Serialize)]
struct JsonOutput {
    meta: Meta,
    frames: Vec<JsonFrame>,
}

#[derive(Serialize)]
struct Meta {
    app: &'static str,
    version: &'static str,
    sheet: SheetInfo,
}

#[derive(Serialize)]
struct SheetInfo {
    name: String,
    size: Size,
}

#[derive(Serialize)]
struct Size {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct JsonFrame {
    name: String,
    group: String,
    file: String,
    frame: Frame,
    source: RegionSource,
}

#[derive(Serialize)]
struct Frame {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

/// Write the frame metadata document next to the exported images.
pub fn write_metadata(session: &Session, output_dir: &Path, prefix: &str) -> Result<()> {
    let output = build_document(session, prefix);

    let json_path = output_dir.join(format!("{}.json", prefix));
    let content = serde_json::to_string_pretty(&output)?;

    fs::write(&json_path, content).map_err(|e| SliceError::OutputWrite {
        path: json_path,
        source: e,
    })?;

    Ok(())
}

fn build_document(session: &Session, prefix: &str) -> JsonOutput {
    let sheet = session.sheet();
    let frames = session
        .tree()
        .leaves()
        .into_iter()
        .enumerate()
        .map(|(index, leaf)| JsonFrame {
            name: leaf.name,
            group: leaf.group_path,
            file: frame_filename(prefix, index),
            frame: Frame {
                x: leaf.region.bounds.x,
                y: leaf.region.bounds.y,
                w: leaf.region.bounds.width,
                h: leaf.region.bounds.height,
            },
            source: leaf.region.source,
        })
        .collect();

    JsonOutput {
        meta: Meta {
            app: "sashimi",
            version: env!("CARGO_PKG_VERSION"),
            sheet: SheetInfo {
                name: sheet.name.clone(),
                size: Size {
                    w: sheet.width(),
                    h: sheet.height(),
                },
            },
        },
        frames,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridConfig;
    use crate::session::GRID_GROUP;
    use crate::sheet::Sheet;
    use image::RgbaImage;

    #[test]
    fn test_document_lists_frames_in_tree_order() {
        let sheet = Sheet::from_image("tiles", RgbaImage::new(64, 32)).unwrap();
        let mut session = Session::new(sheet);
        let config = GridConfig {
            cell_width: 32,
            cell_height: 32,
            ..GridConfig::default()
        };
        session.grid_pass(&config, GRID_GROUP).unwrap();

        let doc = build_document(&session, "tile");

        assert_eq!(doc.meta.app, "sashimi");
        assert_eq!(doc.meta.sheet.name, "tiles");
        assert_eq!(doc.meta.sheet.size.w, 64);
        assert_eq!(doc.frames.len(), 2);
        assert_eq!(doc.frames[0].name, "Grid 1");
        assert_eq!(doc.frames[0].group, "Grid");
        assert_eq!(doc.frames[0].file, "tile_000.png");
        assert_eq!(doc.frames[1].file, "tile_001.png");
        assert_eq!(doc.frames[1].frame.x, 32);
    }

    #[test]
    fn test_document_serializes_source_lowercase() {
        let sheet = Sheet::from_image("s", RgbaImage::new(32, 32)).unwrap();
        let mut session = Session::new(sheet);
        let config = GridConfig {
            cell_width: 32,
            cell_height: 32,
            ..GridConfig::default()
        };
        session.grid_pass(&config, GRID_GROUP).unwrap();

        let doc = build_document(&session, "s");
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["frames"][0]["source"], "grid");
    }
}
