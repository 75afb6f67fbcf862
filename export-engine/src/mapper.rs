//! FILENAME: export-engine/src/mapper.rs
//! PURPOSE: The public entry points: build a mapper once per type, export
//! any number of instances through it.
//! CONTEXT: A Mapper owns the schema tree and its computed layout, both
//! immutable after construction, so it can be shared read-only across
//! threads. Every export call allocates its own working state; the sink is
//! assumed to be a single writer.

use crate::coord::CellCoord;
use crate::datum::Datum;
use crate::error::{ExportError, SchemaError};
use crate::header::write_headers;
use crate::layout::{compute_layout, Layout};
use crate::schema::{build_tree, AccessorSource, SchemaTree};
use crate::sink::GridSink;
use crate::value::{write_values, RowTable};

/// A reusable exporter for one root type.
#[derive(Debug, Clone)]
pub struct Mapper {
    tree: SchemaTree,
    layout: Layout,
}

/// Builds the schema tree for `root_type` and computes its layout.
/// Fails without exposing a partial mapper.
pub fn build_mapper(root_type: &str, source: &dyn AccessorSource) -> Result<Mapper, SchemaError> {
    let tree = build_tree(root_type, source)?;
    let layout = compute_layout(&tree)?;
    Ok(Mapper { tree, layout })
}

impl Mapper {
    pub fn tree(&self) -> &SchemaTree {
        &self.tree
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Total leaf columns the export occupies.
    pub fn column_count(&self) -> u32 {
        self.layout.width(SchemaTree::ROOT)
    }

    /// Rows the header band occupies; values start this many rows below
    /// the start row.
    pub fn header_rows(&self) -> u32 {
        self.layout.max_depth()
    }

    /// Exports `instance` into `sink` with the table's top-left corner at
    /// (start_row, start_col): headers first, then the value region.
    ///
    /// Row-multiplier discovery runs before the first sink write, so
    /// accessor and shape failures abort with nothing written; sink writes
    /// already made when a later failure occurs are not rolled back.
    pub fn export<S: GridSink>(
        &self,
        sink: &mut S,
        start_row: u32,
        start_col: u32,
        instance: &Datum,
    ) -> Result<(), ExportError> {
        let sink: &mut dyn GridSink = sink;
        let start: CellCoord = (start_row, start_col);

        let table = RowTable::discover(&self.tree, &self.layout, instance)?;
        write_headers(&self.tree, &self.layout, sink, start)?;
        write_values(&self.tree, &self.layout, &table, sink, start, instance)?;
        Ok(())
    }
}
