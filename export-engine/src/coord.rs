//! FILENAME: export-engine/src/coord.rs
//! PURPOSE: Grid coordinates and merged-region rectangles.
//! CONTEXT: All positions are 0-based (row, col) pairs. Rectangles are
//! inclusive on both ends and are what the grid sink receives for merges.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell coordinate as (row, col) with 0-based indices.
pub type CellCoord = (u32, u32);

/// Converts a 0-based column index to a column string.
/// 0 -> "A", 1 -> "B", ..., 25 -> "Z", 26 -> "AA", 27 -> "AB", etc.
pub fn index_to_col(mut col_index: u32) -> String {
    let mut result = String::new();
    loop {
        let remainder = col_index % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if col_index < 26 {
            break;
        }
        col_index = col_index / 26 - 1;
    }
    result
}

/// Converts a 0-based (row, col) coordinate to an A1-style reference string.
/// (0, 0) -> "A1", (1, 1) -> "B2", (99, 26) -> "AA100"
pub fn coord_to_a1(coord: CellCoord) -> String {
    let (row, col) = coord;
    format!("{}{}", index_to_col(col), row + 1)
}

/// An inclusive rectangular region of cells.
///
/// A single cell is the degenerate rectangle where start == end. Regions are
/// handed to the grid sink for merge-and-style instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    pub row_start: u32,
    pub col_start: u32,
    pub row_end: u32,
    pub col_end: u32,
}

impl CellRect {
    pub fn new(row_start: u32, col_start: u32, row_end: u32, col_end: u32) -> Self {
        CellRect {
            row_start,
            col_start,
            row_end,
            col_end,
        }
    }

    /// A 1x1 region covering a single cell.
    pub fn cell(row: u32, col: u32) -> Self {
        CellRect::new(row, col, row, col)
    }

    /// Builds a region from its top-left corner and a (height, width) extent.
    /// Both extents must be at least 1.
    pub fn spanning(top_left: CellCoord, height: u32, width: u32) -> Self {
        let (row, col) = top_left;
        CellRect::new(row, col, row + height - 1, col + width - 1)
    }

    pub fn top_left(&self) -> CellCoord {
        (self.row_start, self.col_start)
    }

    pub fn width(&self) -> u32 {
        self.col_end - self.col_start + 1
    }

    pub fn height(&self) -> u32 {
        self.row_end - self.row_start + 1
    }

    pub fn is_single_cell(&self) -> bool {
        self.row_start == self.row_end && self.col_start == self.col_end
    }

    /// Whether the given coordinate falls inside this region.
    pub fn contains(&self, coord: CellCoord) -> bool {
        let (row, col) = coord;
        row >= self.row_start && row <= self.row_end && col >= self.col_start && col <= self.col_end
    }
}

impl fmt::Display for CellRect {
    /// Formats as an A1-style range, e.g. "E5:G7", or "E5" for a single cell.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_cell() {
            write!(f, "{}", coord_to_a1(self.top_left()))
        } else {
            write!(
                f,
                "{}:{}",
                coord_to_a1(self.top_left()),
                coord_to_a1((self.row_end, self.col_end))
            )
        }
    }
}
