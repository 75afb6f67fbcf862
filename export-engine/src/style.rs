//! FILENAME: export-engine/src/style.rs
//! PURPOSE: Per-cell style attributes carried by header and value cells.
//! CONTEXT: The engine never renders styles itself; it attaches a CellStyle
//! to every merge instruction and leaves interpretation to the grid sink.

use serde::{Deserialize, Serialize};

/// Horizontal alignment options for cell content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HorizontalAlign {
    #[default]
    General, // Auto: numbers right, text left
    Left,
    Center,
    Right,
    Justify,
    Fill,
    Distributed,
}

/// Vertical alignment options for cell content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VerticalAlign {
    Top,
    #[default]
    Center,
    Bottom,
    Justify,
    Distributed,
}

/// Border weight around a cell or merged region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BorderStyle {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
}

/// The full set of style attributes a cell (or merged region) can carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub wrap_text: bool,

    /// Font size in points.
    pub font_size: u8,

    pub border_style: BorderStyle,
    pub horizontal_align: HorizontalAlign,
    pub vertical_align: VerticalAlign,

    /// Sink-specific number format string (e.g. "#,##0.00"). None = general.
    pub number_format: Option<String>,
}

impl Default for CellStyle {
    fn default() -> Self {
        CellStyle {
            bold: false,
            italic: false,
            underline: false,
            wrap_text: false,
            font_size: 14,
            border_style: BorderStyle::None,
            horizontal_align: HorizontalAlign::General,
            vertical_align: VerticalAlign::Center,
            number_format: None,
        }
    }
}

impl CellStyle {
    pub fn new() -> Self {
        CellStyle::default()
    }

    /// The default look of header cells: bold italic, wrapped, centered,
    /// thick border, 16pt.
    pub fn header_default() -> Self {
        CellStyle {
            bold: true,
            italic: true,
            wrap_text: true,
            font_size: 16,
            border_style: BorderStyle::Thick,
            horizontal_align: HorizontalAlign::Center,
            vertical_align: VerticalAlign::Center,
            ..CellStyle::default()
        }
    }

    /// The default look of value cells: wrapped, centered, medium border, 12pt.
    pub fn value_default() -> Self {
        CellStyle {
            wrap_text: true,
            font_size: 12,
            border_style: BorderStyle::Medium,
            horizontal_align: HorizontalAlign::Center,
            vertical_align: VerticalAlign::Center,
            ..CellStyle::default()
        }
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn with_number_format(mut self, format: impl Into<String>) -> Self {
        self.number_format = Some(format.into());
        self
    }
}
