//! FILENAME: export-engine/src/layout.rs
//! PURPOSE: Computes per-node header widths, heights and depths.
//! CONTEXT: Two passes over the built tree. Widths flow bottom-up (a node
//! spans the leaf columns under it); heights flow top-down (shallow leaves
//! stretch down so every column reaches the same header row). The result is
//! a separate immutable structure indexed by node id; the tree itself is
//! never mutated.

use crate::error::SchemaError;
use crate::schema::{NodeId, SchemaTree};

/// Computed layout for one schema tree. Built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    widths: Vec<u32>,
    heights: Vec<u32>,
    depths: Vec<u32>,
    max_depth: u32,
}

impl Layout {
    /// Number of leaf columns under the node (1 for a leaf).
    pub fn width(&self, id: NodeId) -> u32 {
        self.widths[id]
    }

    /// Header rows the node's rectangle occupies.
    pub fn height(&self, id: NodeId) -> u32 {
        self.heights[id]
    }

    /// Distance from the root (root = 0).
    pub fn depth(&self, id: NodeId) -> u32 {
        self.depths[id]
    }

    /// Depth of the deepest leaf; also the number of header rows the whole
    /// header band occupies.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

/// Runs the width and height passes and checks the width-sum invariant.
pub fn compute_layout(tree: &SchemaTree) -> Result<Layout, SchemaError> {
    let order = tree.breadth_first();
    let node_count = tree.len();

    // Depth pass, top-down: child depth = parent depth + 1.
    let mut depths = vec![0u32; node_count];
    for &id in order.iter().skip(1) {
        let parent = tree.node(id).parent.unwrap_or(SchemaTree::ROOT);
        depths[id] = depths[parent] + 1;
    }

    // Width pass, bottom-up: reverse breadth-first order guarantees every
    // child is finished before its parent.
    let mut widths = vec![0u32; node_count];
    for &id in order.iter().rev() {
        let child_sum: u32 = tree.children(id).iter().map(|&c| widths[c]).sum();
        widths[id] = child_sum.max(1);
    }

    let max_depth = tree
        .leaves()
        .iter()
        .map(|&leaf| depths[leaf])
        .max()
        .unwrap_or(0);

    // Non-leaf headers are one row tall; leaf headers stretch down to the
    // common bottom header row.
    let mut heights = vec![1u32; node_count];
    for &leaf in tree.leaves() {
        heights[leaf] = max_depth - depths[leaf] + 1;
    }

    let leaf_total: u32 = tree.leaves().iter().map(|&leaf| widths[leaf]).sum();
    if leaf_total != widths[SchemaTree::ROOT] {
        return Err(SchemaError::LayoutInvariant {
            leaf_total,
            root_width: widths[SchemaTree::ROOT],
        });
    }

    Ok(Layout {
        widths,
        heights,
        depths,
        max_depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{build_tree, Accessor, ExportMetadata, FieldSpec, StaticAccessorSource};

    fn create_nested_tree() -> SchemaTree {
        // Root: Name, Jobs{Company, Position}, Age -> 4 leaf columns
        let source = StaticAccessorSource::new()
            .register(
                "Person",
                vec![
                    FieldSpec::new(ExportMetadata::new(0, "Name"), "String", Accessor::field("name")),
                    FieldSpec::new(
                        ExportMetadata::new(1, "Jobs"),
                        "Job",
                        Accessor::collection_field("jobs"),
                    ),
                    FieldSpec::new(ExportMetadata::new(2, "Age"), "i64", Accessor::field("age")),
                ],
            )
            .register(
                "Job",
                vec![
                    FieldSpec::new(
                        ExportMetadata::new(0, "Company"),
                        "String",
                        Accessor::field("company"),
                    ),
                    FieldSpec::new(
                        ExportMetadata::new(1, "Position"),
                        "String",
                        Accessor::field("position"),
                    ),
                ],
            );
        build_tree("Person", &source).unwrap()
    }

    #[test]
    fn test_widths() {
        let tree = create_nested_tree();
        let layout = compute_layout(&tree).unwrap();

        assert_eq!(layout.width(SchemaTree::ROOT), 4);
        let top = tree.children(SchemaTree::ROOT);
        assert_eq!(layout.width(top[0]), 1); // Name
        assert_eq!(layout.width(top[1]), 2); // Jobs spans Company + Position
        assert_eq!(layout.width(top[2]), 1); // Age
    }

    #[test]
    fn test_leaf_widths_sum_to_root_width() {
        let tree = create_nested_tree();
        let layout = compute_layout(&tree).unwrap();
        let leaf_total: u32 = tree.leaves().iter().map(|&leaf| layout.width(leaf)).sum();
        assert_eq!(leaf_total, layout.width(SchemaTree::ROOT));
    }

    #[test]
    fn test_depths_and_heights() {
        let tree = create_nested_tree();
        let layout = compute_layout(&tree).unwrap();
        assert_eq!(layout.max_depth(), 2);

        let top = tree.children(SchemaTree::ROOT);
        // Shallow leaves stretch down two rows; the nested branch's leaves
        // sit one row lower and are one row tall.
        assert_eq!(layout.depth(top[0]), 1);
        assert_eq!(layout.height(top[0]), 2); // Name leaf
        assert_eq!(layout.height(top[1]), 1); // Jobs is a non-leaf header
        assert_eq!(layout.height(top[2]), 2); // Age leaf

        for &job_field in tree.children(top[1]) {
            assert_eq!(layout.depth(job_field), 2);
            assert_eq!(layout.height(job_field), 1);
        }
    }

    #[test]
    fn test_leaf_height_formula_holds_for_all_leaves() {
        let tree = create_nested_tree();
        let layout = compute_layout(&tree).unwrap();
        for &leaf in tree.leaves() {
            assert_eq!(
                layout.height(leaf),
                layout.max_depth() - layout.depth(leaf) + 1
            );
            assert!(layout.height(leaf) >= 1);
        }
    }

    #[test]
    fn test_flat_tree_heights_are_one() {
        let source = StaticAccessorSource::new().register(
            "Row",
            vec![
                FieldSpec::new(ExportMetadata::new(0, "name"), "String", Accessor::field("name")),
                FieldSpec::new(ExportMetadata::new(1, "age"), "i64", Accessor::field("age")),
            ],
        );
        let tree = build_tree("Row", &source).unwrap();
        let layout = compute_layout(&tree).unwrap();
        assert_eq!(layout.max_depth(), 1);
        for &leaf in tree.leaves() {
            assert_eq!(layout.height(leaf), 1);
        }
    }
}
