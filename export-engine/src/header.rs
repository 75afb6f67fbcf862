//! FILENAME: export-engine/src/header.rs
//! PURPOSE: Places header labels into merged rectangles.
//! CONTEXT: Breadth-first walk with an explicit queue of (node, origin)
//! pairs. A node's children are laid out left-to-right from its origin, each
//! as one merged rectangle of the child's computed height and width; the
//! child's own children start one rectangle further down.

use crate::coord::{CellCoord, CellRect};
use crate::error::ExportError;
use crate::layout::Layout;
use crate::schema::SchemaTree;
use crate::sink::GridSink;
use std::collections::VecDeque;

pub(crate) fn write_headers(
    tree: &SchemaTree,
    layout: &Layout,
    sink: &mut dyn GridSink,
    start: CellCoord,
) -> Result<(), ExportError> {
    let mut queue: VecDeque<(usize, CellCoord)> = VecDeque::new();
    queue.push_back((SchemaTree::ROOT, start));

    while let Some((id, origin)) = queue.pop_front() {
        let (row, mut col) = origin;
        for &child_id in tree.children(id) {
            let child = tree.node(child_id);
            // Only the synthetic root lacks metadata and the root is never
            // anyone's child, but the walk tolerates unlabelled nodes by
            // traversing them without placing anything.
            let Some(meta) = child.metadata.as_ref() else {
                queue.push_back((child_id, (row, col)));
                col += layout.width(child_id);
                continue;
            };

            let height = layout.height(child_id);
            let width = layout.width(child_id);
            sink.set_cell(row, col, &meta.header_name)?;
            sink.merge_and_style(
                CellRect::spanning((row, col), height, width),
                &meta.header_style,
            )?;

            queue.push_back((child_id, (row + height, col)));
            col += width;
        }
    }
    Ok(())
}
