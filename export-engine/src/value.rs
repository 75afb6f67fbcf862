//! FILENAME: export-engine/src/value.rs
//! PURPOSE: Flattens an instance graph into value cells, one column per leaf.
//! CONTEXT: Two phases. Phase A walks the tree/instance pair and records the
//! maximum collection fan-out per tree depth, producing a global row
//! multiplier table before anything is written. Phase B re-walks the pair,
//! pads every collection to the table's fan-out so sibling columns stay
//! row-aligned, and writes each leaf value as one merged region. Computing
//! the table globally up front is what makes every leaf column consume the
//! same total row count; no per-leaf reconciliation happens afterwards.

use crate::coord::{CellCoord, CellRect};
use crate::datum::Datum;
use crate::error::{ExportError, ValueError};
use crate::layout::Layout;
use crate::schema::{Accessor, AccessorKind, MappingNode, NodeId, SchemaTree};
use crate::sink::GridSink;
use std::collections::VecDeque;

// ============================================================================
// PHASE A - ROW MULTIPLIER DISCOVERY
// ============================================================================

/// Per-depth fan-out maxima and the row multipliers derived from them.
///
/// `rows_per_unit[d]` is the product of the fan-out at depth d and every
/// fan-out below it: how many output rows one instance at that depth must
/// reserve. Depths with no collections contribute a factor of 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RowTable {
    fanout: Vec<u32>,
    rows_per_unit: Vec<u32>,
}

impl RowTable {
    /// Walks the tree together with the instance and records, per depth, the
    /// largest collection length reached (at least 1; empty and null
    /// collections still reserve one row). A root instance that is itself a
    /// sequence contributes its length at depth 0.
    pub(crate) fn discover(
        tree: &SchemaTree,
        layout: &Layout,
        instance: &Datum,
    ) -> Result<RowTable, ExportError> {
        let depth_count = layout.max_depth() as usize + 1;
        let mut fanout = vec![1u32; depth_count];

        let root_values = match instance {
            Datum::List(items) => {
                fanout[0] = (items.len().max(1)) as u32;
                items.clone()
            }
            other => vec![other.clone()],
        };

        let mut pending: VecDeque<(NodeId, Vec<Datum>)> = VecDeque::new();
        pending.push_back((SchemaTree::ROOT, root_values));

        while let Some((id, values)) = pending.pop_front() {
            for &child_id in tree.children(id) {
                let child = tree.node(child_id);
                let accessor = node_accessor(child)?;
                let child_depth = layout.depth(child_id) as usize;

                let mut child_values = Vec::new();
                for value in &values {
                    match (accessor.kind(), value) {
                        (_, Datum::Null) => child_values.push(Datum::Null),
                        (AccessorKind::Scalar, value) => {
                            child_values.push(accessor.invoke(value)?);
                        }
                        (AccessorKind::Collection, value) => match accessor.invoke(value)? {
                            Datum::Null => child_values.push(Datum::Null),
                            Datum::List(items) => {
                                fanout[child_depth] =
                                    fanout[child_depth].max(items.len().max(1) as u32);
                                if items.is_empty() {
                                    child_values.push(Datum::Null);
                                } else {
                                    child_values.extend(items);
                                }
                            }
                            other => return Err(shape_mismatch(child, &other).into()),
                        },
                    }
                }

                if !child.is_leaf() {
                    pending.push_back((child_id, child_values));
                }
            }
        }

        // rows_per_unit[max_depth + 1] = 1; each depth multiplies its own
        // fan-out with everything below it.
        let mut rows_per_unit = vec![1u32; depth_count + 1];
        for depth in (0..depth_count).rev() {
            rows_per_unit[depth] = fanout[depth] * rows_per_unit[depth + 1];
        }

        Ok(RowTable {
            fanout,
            rows_per_unit,
        })
    }

    pub(crate) fn fanout(&self, depth: u32) -> u32 {
        self.fanout[depth as usize]
    }

    pub(crate) fn unit(&self, depth: u32) -> u32 {
        self.rows_per_unit[depth as usize]
    }

    /// Rows the whole value region occupies.
    pub(crate) fn total_rows(&self) -> u32 {
        self.rows_per_unit[0]
    }
}

// ============================================================================
// PHASE B - VALUE COLLECTION AND EXPORT
// ============================================================================

/// Re-walks the tree/instance pair, pads collections to the table's
/// fan-out, and writes every leaf's value sequence starting right below the
/// header band.
pub(crate) fn write_values(
    tree: &SchemaTree,
    layout: &Layout,
    table: &RowTable,
    sink: &mut dyn GridSink,
    start: CellCoord,
    instance: &Datum,
) -> Result<(), ExportError> {
    let node_count = tree.len();
    let mut values: Vec<Vec<Datum>> = vec![Vec::new(); node_count];
    let mut spans: Vec<u32> = vec![0; node_count];

    values[SchemaTree::ROOT] = match instance {
        Datum::List(items) => {
            let mut padded = items.clone();
            pad_with_null(&mut padded, table.fanout(0) as usize);
            padded
        }
        other => vec![other.clone()],
    };
    spans[SchemaTree::ROOT] = table.unit(0) / table.fanout(0);

    // Breadth-first: a node's padded values exist before its children need
    // them. A scalar edge keeps count and span; a collection edge at depth d
    // pads every parent's elements to fanout(d) slots and divides the span
    // by fanout(d). Collections on other branches therefore still widen this
    // branch's spans through the shared table, keeping all columns at the
    // same total.
    for id in tree.breadth_first() {
        for &child_id in tree.children(id) {
            let child = tree.node(child_id);
            let accessor = node_accessor(child)?;
            let child_depth = layout.depth(child_id);

            let mut child_values = Vec::new();
            match accessor.kind() {
                AccessorKind::Scalar => {
                    for value in &values[id] {
                        match value {
                            Datum::Null => child_values.push(Datum::Null),
                            value => child_values.push(accessor.invoke(value)?),
                        }
                    }
                    spans[child_id] = spans[id];
                }
                AccessorKind::Collection => {
                    let slots = table.fanout(child_depth) as usize;
                    for value in &values[id] {
                        let filled = child_values.len() + slots;
                        match value {
                            Datum::Null => {}
                            value => match accessor.invoke(value)? {
                                Datum::Null => {}
                                Datum::List(items) => {
                                    debug_assert!(items.len() <= slots);
                                    child_values.extend(items);
                                }
                                other => return Err(shape_mismatch(child, &other).into()),
                            },
                        }
                        pad_with_null(&mut child_values, filled);
                    }
                    debug_assert_eq!(spans[id] % table.fanout(child_depth), 0);
                    spans[child_id] = spans[id] / table.fanout(child_depth);
                }
            }
            values[child_id] = child_values;
        }
    }

    // Each leaf is one output column; values run top-down from the first
    // row below the header band, one merged region per value.
    let top_row = start.0 + layout.max_depth();
    for (column, &leaf_id) in tree.leaves().iter().enumerate() {
        let col = start.1 + column as u32;
        let node = tree.node(leaf_id);
        let meta = node
            .metadata
            .as_ref()
            .ok_or(ExportError::MissingLeafMetadata { node_id: leaf_id })?;

        let span = spans[leaf_id];
        let mut row = top_row;
        for value in &values[leaf_id] {
            let text = match value {
                Datum::Null => meta.value_fallback.clone(),
                value => value.to_string(),
            };
            sink.set_cell(row, col, &text)?;
            sink.merge_and_style(CellRect::spanning((row, col), span, 1), &meta.value_style)?;
            row += span;
        }
        debug_assert_eq!(row - top_row, table.total_rows());
    }

    Ok(())
}

fn node_accessor(node: &MappingNode) -> Result<&Accessor, ExportError> {
    node.accessor
        .as_ref()
        .ok_or(ExportError::MissingAccessor { node_id: node.id })
}

fn shape_mismatch(node: &MappingNode, actual: &Datum) -> ValueError {
    ValueError::ShapeMismatch {
        field: node.display_name().to_string(),
        expected: "list",
        actual: actual.kind_name(),
    }
}

fn pad_with_null(values: &mut Vec<Datum>, len: usize) {
    while values.len() < len {
        values.push(Datum::Null);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_layout;
    use crate::schema::{
        build_tree, Accessor, ExportMetadata, FieldSpec, SchemaTree, StaticAccessorSource,
    };
    use crate::view::GridView;

    fn create_tagged_list_tree() -> SchemaTree {
        // {tag: string, items: list<int>}
        let source = StaticAccessorSource::new().register(
            "Tagged",
            vec![
                FieldSpec::new(
                    ExportMetadata::new(0, "Tag").with_fallback("-"),
                    "String",
                    Accessor::field("tag"),
                ),
                FieldSpec::new(
                    ExportMetadata::new(1, "Items").with_fallback("-"),
                    "i64",
                    Accessor::collection_field("items"),
                ),
            ],
        );
        build_tree("Tagged", &source).unwrap()
    }

    fn tagged(tag: &str, items: &[i64]) -> Datum {
        Datum::record([
            ("tag", Datum::from(tag)),
            ("items", Datum::list(items.iter().map(|&i| Datum::from(i)))),
        ])
    }

    #[test]
    fn test_row_table_uses_global_maximum() {
        let tree = create_tagged_list_tree();
        let layout = compute_layout(&tree).unwrap();
        let instance = Datum::list([tagged("a", &[1, 2]), tagged("b", &[3, 4, 5, 6, 7])]);

        let table = RowTable::discover(&tree, &layout, &instance).unwrap();
        assert_eq!(table.fanout(0), 2); // two root records
        assert_eq!(table.fanout(1), 5); // longest item list wins for both
        assert_eq!(table.unit(1), 5);
        assert_eq!(table.total_rows(), 10);
    }

    #[test]
    fn test_short_collections_are_padded_with_fallback() {
        let tree = create_tagged_list_tree();
        let layout = compute_layout(&tree).unwrap();
        let instance = Datum::list([tagged("a", &[1, 2]), tagged("b", &[3, 4, 5, 6, 7])]);

        let table = RowTable::discover(&tree, &layout, &instance).unwrap();
        let mut view = GridView::new();
        write_values(&tree, &layout, &table, &mut view, (0, 0), &instance).unwrap();

        // Tag column: each record's tag spans its five item rows.
        assert_eq!(view.cell(1, 0), Some("a"));
        assert_eq!(view.merge_at(1, 0).unwrap().region, CellRect::new(1, 0, 5, 0));
        assert_eq!(view.cell(6, 0), Some("b"));

        // Item column: record a's two items, then three fallback rows.
        assert_eq!(view.cell(1, 1), Some("1"));
        assert_eq!(view.cell(2, 1), Some("2"));
        assert_eq!(view.cell(3, 1), Some("-"));
        assert_eq!(view.cell(5, 1), Some("-"));
        assert_eq!(view.cell(6, 1), Some("3"));
        assert_eq!(view.cell(10, 1), Some("7"));
    }

    #[test]
    fn test_empty_collection_renders_one_fallback_row() {
        let tree = create_tagged_list_tree();
        let layout = compute_layout(&tree).unwrap();
        let instance = tagged("only", &[]);

        let table = RowTable::discover(&tree, &layout, &instance).unwrap();
        assert_eq!(table.total_rows(), 1);

        let mut view = GridView::new();
        write_values(&tree, &layout, &table, &mut view, (0, 0), &instance).unwrap();
        assert_eq!(view.cell(1, 0), Some("only"));
        assert_eq!(view.cell(1, 1), Some("-"));
        assert_eq!(view.row_count(), 2);
    }

    #[test]
    fn test_null_root_renders_one_fallback_row_per_leaf() {
        let tree = create_tagged_list_tree();
        let layout = compute_layout(&tree).unwrap();

        let table = RowTable::discover(&tree, &layout, &Datum::Null).unwrap();
        assert_eq!(table.total_rows(), 1);

        let mut view = GridView::new();
        write_values(&tree, &layout, &table, &mut view, (0, 0), &Datum::Null).unwrap();
        assert_eq!(view.cell(1, 0), Some("-"));
        assert_eq!(view.cell(1, 1), Some("-"));
    }

    #[test]
    fn test_collection_accessor_returning_scalar_is_an_error() {
        let source = StaticAccessorSource::new().register(
            "Bad",
            vec![FieldSpec::new(
                ExportMetadata::new(0, "Items"),
                "i64",
                Accessor::collection_field("items"),
            )],
        );
        let tree = build_tree("Bad", &source).unwrap();
        let layout = compute_layout(&tree).unwrap();
        let instance = Datum::record([("items", Datum::from(7i64))]);

        let err = RowTable::discover(&tree, &layout, &instance).unwrap_err();
        assert_eq!(
            err,
            ExportError::Value(ValueError::ShapeMismatch {
                field: "Items".to_string(),
                expected: "list",
                actual: "integer",
            })
        );
    }

    #[test]
    fn test_columns_agree_on_total_rows_with_collections_on_one_branch_only() {
        // {home: {city}, jobs: list<{company}>}: the city column must span
        // all job rows even though its own branch has no collections.
        let source = StaticAccessorSource::new()
            .register(
                "Person",
                vec![
                    FieldSpec::new(
                        ExportMetadata::new(0, "Home"),
                        "Address",
                        Accessor::field("home"),
                    ),
                    FieldSpec::new(
                        ExportMetadata::new(1, "Jobs"),
                        "Job",
                        Accessor::collection_field("jobs"),
                    ),
                ],
            )
            .register(
                "Address",
                vec![FieldSpec::new(
                    ExportMetadata::new(0, "City"),
                    "String",
                    Accessor::field("city"),
                )],
            )
            .register(
                "Job",
                vec![FieldSpec::new(
                    ExportMetadata::new(0, "Company"),
                    "String",
                    Accessor::field("company"),
                )],
            );
        let tree = build_tree("Person", &source).unwrap();
        let layout = compute_layout(&tree).unwrap();

        let job = |company: &str| Datum::record([("company", Datum::from(company))]);
        let instance = Datum::record([
            ("home", Datum::record([("city", Datum::from("Lund"))])),
            ("jobs", Datum::list([job("Acme"), job("初创"), job("Bolt")])),
        ]);

        let table = RowTable::discover(&tree, &layout, &instance).unwrap();
        assert_eq!(table.total_rows(), 3);

        let mut view = GridView::new();
        write_values(&tree, &layout, &table, &mut view, (0, 0), &instance).unwrap();

        // Header band is two rows; values start at row 2.
        assert_eq!(view.cell(2, 0), Some("Lund"));
        assert_eq!(view.merge_at(2, 0).unwrap().region, CellRect::new(2, 0, 4, 0));
        assert_eq!(view.cell(2, 1), Some("Acme"));
        assert_eq!(view.cell(4, 1), Some("Bolt"));
    }
}
