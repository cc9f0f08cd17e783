use serde::{Deserialize, Serialize};

use crate::error::SliceError;
use crate::region::Rect;

/// Geometry of a uniform sprite grid laid over a sheet.
///
/// The cell at column `c`, row `r` occupies
/// `x = origin_x + c*(cell_width+spacing_x) + padding_x`,
/// `y = origin_y + r*(cell_height+spacing_y) + padding_y`
/// with size `cell_width x cell_height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cell width in pixels
    pub cell_width: u32,
    /// Cell height in pixels
    pub cell_height: u32,
    /// Horizontal inset of each cell within its grid slot
    pub padding_x: u32,
    /// Vertical inset of each cell within its grid slot
    pub padding_y: u32,
    /// Horizontal gap between adjacent cells
    pub spacing_x: u32,
    /// Vertical gap between adjacent cells
    pub spacing_y: u32,
    /// X of the first grid slot
    pub origin_x: u32,
    /// Y of the first grid slot
    pub origin_y: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_width: 32,
            cell_height: 32,
            padding_x: 0,
            padding_y: 0,
            spacing_x: 0,
            spacing_y: 0,
            origin_x: 0,
            origin_y: 0,
        }
    }
}

impl GridConfig {
    /// Reject non-positive cell dimensions before any iteration starts.
    pub fn validate(&self) -> Result<(), SliceError> {
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(SliceError::InvalidConfig(
                "cell dimensions must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Lazy sequence of cell rectangles over a canvas, left to right
    /// then top to bottom. Cells that would extend past a canvas edge
    /// are never emitted, so every rectangle lies fully inside.
    pub fn cells(&self, canvas_width: u32, canvas_height: u32) -> Result<GridCells, SliceError> {
        self.validate()?;
        Ok(GridCells::new(*self, canvas_width, canvas_height))
    }
}

/// Row-major iterator over grid cell rectangles. Pure function of its
/// inputs: cloning restarts the sequence.
#[derive(Debug, Clone)]
pub struct GridCells {
    config: GridConfig,
    columns: u32,
    rows: u32,
    col: u32,
    row: u32,
}

impl GridCells {
    fn new(config: GridConfig, canvas_width: u32, canvas_height: u32) -> Self {
        let columns = axis_count(
            config.origin_x,
            config.padding_x,
            config.cell_width,
            config.spacing_x,
            canvas_width,
        );
        let rows = axis_count(
            config.origin_y,
            config.padding_y,
            config.cell_height,
            config.spacing_y,
            canvas_height,
        );
        Self {
            config,
            columns,
            rows,
            col: 0,
            row: 0,
        }
    }

    fn remaining(&self) -> u64 {
        if self.columns == 0 || self.row >= self.rows {
            return 0;
        }
        u64::from(self.rows - self.row) * u64::from(self.columns) - u64::from(self.col)
    }
}

/// Number of whole cells that fit along one axis.
fn axis_count(origin: u32, padding: u32, cell: u32, spacing: u32, canvas: u32) -> u32 {
    let first_end = match origin.checked_add(padding).and_then(|v| v.checked_add(cell)) {
        Some(end) => end,
        None => return 0,
    };
    if first_end > canvas {
        return 0;
    }
    match cell.checked_add(spacing) {
        Some(stride) => (canvas - first_end) / stride + 1,
        // A stride past u32::MAX means no second cell can start
        None => 1,
    }
}

impl Iterator for GridCells {
    type Item = Rect;

    fn next(&mut self) -> Option<Rect> {
        if self.columns == 0 || self.row >= self.rows {
            return None;
        }

        let c = &self.config;
        let rect = Rect::new(
            c.origin_x + self.col * (c.cell_width + c.spacing_x) + c.padding_x,
            c.origin_y + self.row * (c.cell_height + c.spacing_y) + c.padding_y,
            c.cell_width,
            c.cell_height,
        );

        self.col += 1;
        if self.col == self.columns {
            self.col = 0;
            self.row += 1;
        }

        Some(rect)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::try_from(self.remaining()).unwrap_or(usize::MAX);
        (n, Some(n))
    }
}
