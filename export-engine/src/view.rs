//! FILENAME: export-engine/src/view.rs
//! PURPOSE: An in-memory grid sink, the renderable output for any frontend.
//! CONTEXT: Records exactly the instructions a backend would receive: cell
//! texts, merged regions in call order, and overall extents. Useful on its
//! own for display layers and in tests for asserting export results.

use crate::coord::{CellCoord, CellRect};
use crate::error::SinkError;
use crate::sink::GridSink;
use crate::style::CellStyle;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One merged rectangle and the style it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRegion {
    pub region: CellRect,
    pub style: CellStyle,
}

/// The captured grid. Cell texts are keyed by coordinate; merges keep the
/// order they were issued in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridView {
    cells: FxHashMap<CellCoord, String>,
    merges: Vec<MergedRegion>,
    row_count: u32,
    col_count: u32,
}

impl GridView {
    pub fn new() -> Self {
        GridView::default()
    }

    /// Text at (row, col), if any was written there.
    pub fn cell(&self, row: u32, col: u32) -> Option<&str> {
        self.cells.get(&(row, col)).map(String::as_str)
    }

    pub fn merges(&self) -> &[MergedRegion] {
        &self.merges
    }

    /// The merged region whose top-left corner is (row, col), if any.
    pub fn merge_at(&self, row: u32, col: u32) -> Option<&MergedRegion> {
        self.merges
            .iter()
            .find(|merge| merge.region.top_left() == (row, col))
    }

    /// All written cells, in no particular order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (CellCoord, &str)> {
        self.cells.iter().map(|(&coord, text)| (coord, text.as_str()))
    }

    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    pub fn col_count(&self) -> u32 {
        self.col_count
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.merges.is_empty()
    }

    fn grow_to(&mut self, row: u32, col: u32) {
        self.row_count = self.row_count.max(row + 1);
        self.col_count = self.col_count.max(col + 1);
    }
}

impl GridSink for GridView {
    fn set_cell(&mut self, row: u32, col: u32, text: &str) -> Result<(), SinkError> {
        self.cells.insert((row, col), text.to_string());
        self.grow_to(row, col);
        Ok(())
    }

    fn merge_and_style(&mut self, region: CellRect, style: &CellStyle) -> Result<(), SinkError> {
        self.grow_to(region.row_end, region.col_end);
        self.merges.push(MergedRegion {
            region,
            style: style.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_cells_and_extents() {
        let mut view = GridView::new();
        view.set_cell(0, 0, "a").unwrap();
        view.set_cell(2, 5, "b").unwrap();

        assert_eq!(view.cell(0, 0), Some("a"));
        assert_eq!(view.cell(2, 5), Some("b"));
        assert_eq!(view.cell(1, 1), None);
        assert_eq!(view.row_count(), 3);
        assert_eq!(view.col_count(), 6);
    }

    #[test]
    fn test_merges_keep_call_order_and_grow_extents() {
        let mut view = GridView::new();
        let style = CellStyle::header_default();
        view.merge_and_style(CellRect::new(0, 0, 1, 2), &style).unwrap();
        view.merge_and_style(CellRect::cell(4, 4), &style).unwrap();

        assert_eq!(view.merges().len(), 2);
        assert_eq!(view.merges()[0].region, CellRect::new(0, 0, 1, 2));
        assert_eq!(view.row_count(), 5);
        assert_eq!(view.col_count(), 5);
        assert!(view.merge_at(4, 4).is_some());
        assert!(view.merge_at(1, 0).is_none());
    }
}
