//! FILENAME: xlsx-sink/src/writer.rs
//! PURPOSE: Grid sink backend over rust_xlsxwriter worksheets.
//! CONTEXT: The engine issues set_cell before merge_and_style for the same
//! region, while rust_xlsxwriter writes merged text and format in a single
//! call. The sink therefore buffers cell texts and flushes each one when
//! its merge instruction arrives; finish() writes whatever never became
//! part of a merge.

use crate::error::XlsxSinkError;
use crate::format::convert_style_to_format;
use export_engine::{CellRect, CellStyle, GridSink, GridView, SinkError};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// A GridSink writing into one rust_xlsxwriter worksheet.
pub struct XlsxGridSink<'a> {
    worksheet: &'a mut Worksheet,
    pending: HashMap<(u32, u32), String>,
}

impl<'a> XlsxGridSink<'a> {
    pub fn new(worksheet: &'a mut Worksheet) -> Self {
        XlsxGridSink {
            worksheet,
            pending: HashMap::new(),
        }
    }

    /// Writes out any buffered cells that never received a merge
    /// instruction. Must be called once the export is done.
    pub fn finish(mut self) -> Result<(), SinkError> {
        let mut rest: Vec<((u32, u32), String)> = self.pending.drain().collect();
        rest.sort();
        for ((row, col), text) in rest {
            self.worksheet
                .write_string(row, col16(col)?, text)
                .map_err(|e| SinkError::new(e.to_string()))?;
        }
        Ok(())
    }
}

impl GridSink for XlsxGridSink<'_> {
    fn set_cell(&mut self, row: u32, col: u32, text: &str) -> Result<(), SinkError> {
        self.pending.insert((row, col), text.to_string());
        Ok(())
    }

    fn merge_and_style(&mut self, region: CellRect, style: &CellStyle) -> Result<(), SinkError> {
        let format = convert_style_to_format(style);
        let text = self
            .pending
            .remove(&region.top_left())
            .unwrap_or_default();

        let result = if region.is_single_cell() {
            self.worksheet
                .write_string_with_format(region.row_start, col16(region.col_start)?, text, &format)
        } else {
            self.worksheet.merge_range(
                region.row_start,
                col16(region.col_start)?,
                region.row_end,
                col16(region.col_end)?,
                &text,
                &format,
            )
        };
        result.map_err(|e| SinkError::new(format!("{} at {}", e, region)))?;
        Ok(())
    }
}

/// Writes a captured GridView into a fresh workbook at `path`.
pub fn save_grid_view(view: &GridView, sheet_name: &str, path: &Path) -> Result<(), XlsxSinkError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    // Merged regions first; they claim their top-left texts and shadow
    // every coordinate they cover.
    let mut covered: HashSet<(u32, u32)> = HashSet::new();
    for merge in view.merges() {
        let region = merge.region;
        let format = convert_style_to_format(&merge.style);
        let text = view
            .cell(region.row_start, region.col_start)
            .unwrap_or_default();

        if region.is_single_cell() {
            worksheet.write_string_with_format(
                region.row_start,
                col16_xlsx(region.col_start)?,
                text,
                &format,
            )?;
        } else {
            worksheet.merge_range(
                region.row_start,
                col16_xlsx(region.col_start)?,
                region.row_end,
                col16_xlsx(region.col_end)?,
                text,
                &format,
            )?;
        }
        for row in region.row_start..=region.row_end {
            for col in region.col_start..=region.col_end {
                covered.insert((row, col));
            }
        }
    }

    let mut loose: Vec<((u32, u32), &str)> = view
        .iter_cells()
        .filter(|(coord, _)| !covered.contains(coord))
        .collect();
    loose.sort();
    for ((row, col), text) in loose {
        worksheet.write_string(row, col16_xlsx(col)?, text)?;
    }

    workbook.save(path)?;
    Ok(())
}

fn col16(col: u32) -> Result<u16, SinkError> {
    u16::try_from(col).map_err(|_| SinkError::new(format!("column {} out of XLSX range", col)))
}

fn col16_xlsx(col: u32) -> Result<u16, XlsxSinkError> {
    u16::try_from(col).map_err(|_| {
        rust_xlsxwriter::XlsxError::RowColumnLimitError.into()
    })
}
