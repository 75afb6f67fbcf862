//! FILENAME: export-engine/src/sink.rs
//! PURPOSE: The write-target abstraction the exporters emit into.
//! CONTEXT: The engine only ever issues two instructions: put a text in a
//! cell, and merge-and-style a rectangle. Backends (in-memory grids, XLSX
//! writers, anything tabular) implement this trait; the engine assumes a
//! single writer and makes no thread-safety promises for the sink itself.

use crate::coord::CellRect;
use crate::error::SinkError;
use crate::style::CellStyle;

pub trait GridSink {
    /// Places `text` at (row, col). For merged regions this is called for
    /// the top-left cell before the merge instruction arrives.
    fn set_cell(&mut self, row: u32, col: u32, text: &str) -> Result<(), SinkError>;

    /// Declares `region` as one merged cell carrying `style`. Single-cell
    /// regions are style-only.
    fn merge_and_style(&mut self, region: CellRect, style: &CellStyle) -> Result<(), SinkError>;
}
