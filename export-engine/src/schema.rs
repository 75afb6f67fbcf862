//! FILENAME: export-engine/src/schema.rs
//! PURPOSE: Accessor descriptions and the mapping tree built from them.
//! CONTEXT: The tree is built once per root type from an AccessorSource and is
//! immutable afterwards; it is shared read-only across any number of exports.
//! Nodes live in an arena indexed by id, with explicit parent/child links.

use crate::datum::Datum;
use crate::error::{SchemaError, ValueError};
use crate::style::CellStyle;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// Index of a node in the tree arena. Assigned in discovery order; carries
/// no business meaning beyond deterministic ordering.
pub type NodeId = usize;

/// Hard ceiling on schema depth. Self-referential types left recursive would
/// otherwise expand forever; hitting this limit is a SchemaError.
pub const MAX_SCHEMA_DEPTH: u32 = 32;

/// Hard ceiling on arena size. Branching self-referential schemas grow
/// exponentially long before the depth limit triggers.
pub const MAX_SCHEMA_NODES: usize = 65_536;

// ============================================================================
// EXPORT METADATA
// ============================================================================

/// Per-field export configuration. Every node except the synthetic root
/// carries one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Label placed in the field's header rectangle.
    pub header_name: String,

    /// Left-to-right position among siblings (ascending). Ties keep the
    /// order the descriptor listed them in.
    pub order: i32,

    pub header_style: CellStyle,
    pub value_style: CellStyle,

    /// Text rendered for null values.
    pub value_fallback: String,

    /// When false, the field becomes a leaf even if its element type has
    /// exportable fields of its own; the raw value is stringified directly.
    pub is_recursive: bool,
}

impl ExportMetadata {
    pub fn new(order: i32, header_name: impl Into<String>) -> Self {
        ExportMetadata {
            header_name: header_name.into(),
            order,
            header_style: CellStyle::header_default(),
            value_style: CellStyle::value_default(),
            value_fallback: String::new(),
            is_recursive: true,
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.value_fallback = fallback.into();
        self
    }

    pub fn with_header_style(mut self, style: CellStyle) -> Self {
        self.header_style = style;
        self
    }

    pub fn with_value_style(mut self, style: CellStyle) -> Self {
        self.value_style = style;
        self
    }

    /// Stops schema expansion below this field.
    pub fn without_recursion(mut self) -> Self {
        self.is_recursive = false;
        self
    }
}

// ============================================================================
// ACCESSORS
// ============================================================================

/// Whether an accessor yields one value or an ordered sequence of values.
/// Mutually exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessorKind {
    Scalar,
    Collection,
}

type AccessorFn = Arc<dyn Fn(&Datum) -> Result<Datum, ValueError> + Send + Sync>;

/// A compiled getter: maps an instance value to the field's value.
///
/// Collection accessors must produce a List (or Null); the export walk
/// enforces this and reports a ValueError rather than coercing.
#[derive(Clone)]
pub struct Accessor {
    kind: AccessorKind,
    get: AccessorFn,
}

impl Accessor {
    pub fn scalar(get: impl Fn(&Datum) -> Result<Datum, ValueError> + Send + Sync + 'static) -> Self {
        Accessor {
            kind: AccessorKind::Scalar,
            get: Arc::new(get),
        }
    }

    pub fn collection(
        get: impl Fn(&Datum) -> Result<Datum, ValueError> + Send + Sync + 'static,
    ) -> Self {
        Accessor {
            kind: AccessorKind::Collection,
            get: Arc::new(get),
        }
    }

    /// Scalar accessor reading a record field by name. Absent fields read
    /// as Null; non-record inputs are a shape error.
    pub fn field(name: impl Into<String>) -> Self {
        let name = name.into();
        Accessor::scalar(move |value| match value {
            Datum::Record(fields) => Ok(fields.get(&name).cloned().unwrap_or(Datum::Null)),
            other => Err(ValueError::ShapeMismatch {
                field: name.clone(),
                expected: "record",
                actual: other.kind_name(),
            }),
        })
    }

    /// Collection accessor reading a record field by name.
    pub fn collection_field(name: impl Into<String>) -> Self {
        let name = name.into();
        Accessor::collection(move |value| match value {
            Datum::Record(fields) => Ok(fields.get(&name).cloned().unwrap_or(Datum::Null)),
            other => Err(ValueError::ShapeMismatch {
                field: name.clone(),
                expected: "record",
                actual: other.kind_name(),
            }),
        })
    }

    pub fn kind(&self) -> AccessorKind {
        self.kind
    }

    pub fn is_collection(&self) -> bool {
        self.kind == AccessorKind::Collection
    }

    pub fn invoke(&self, value: &Datum) -> Result<Datum, ValueError> {
        (self.get)(value)
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// ACCESSOR SOURCE
// ============================================================================

/// One exportable member of a type, as reported by an AccessorSource.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub metadata: ExportMetadata,

    /// Declared type of the accessed value (collection element type for
    /// collection accessors). Looked up in the source when expanding.
    pub element_type: String,

    pub accessor: Accessor,
}

impl FieldSpec {
    pub fn new(metadata: ExportMetadata, element_type: impl Into<String>, accessor: Accessor) -> Self {
        FieldSpec {
            metadata,
            element_type: element_type.into(),
            accessor,
        }
    }
}

/// The external collaborator that knows which members of a type are
/// exportable. How that knowledge is produced (hand-written tables, codegen,
/// a serde bridge) is entirely the caller's business.
pub trait AccessorSource {
    /// Returns the exportable members of `type_ref`, or an empty list when
    /// the type is opaque (a plain scalar column).
    fn describe(&self, type_ref: &str) -> Result<Vec<FieldSpec>, SchemaError>;
}

/// A statically declared accessor-description table keyed by type name.
#[derive(Debug, Clone, Default)]
pub struct StaticAccessorSource {
    types: rustc_hash::FxHashMap<String, Vec<FieldSpec>>,
}

impl StaticAccessorSource {
    pub fn new() -> Self {
        StaticAccessorSource::default()
    }

    pub fn register(mut self, type_ref: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        self.types.insert(type_ref.into(), fields);
        self
    }
}

impl AccessorSource for StaticAccessorSource {
    fn describe(&self, type_ref: &str) -> Result<Vec<FieldSpec>, SchemaError> {
        Ok(self.types.get(type_ref).cloned().unwrap_or_default())
    }
}

// ============================================================================
// MAPPING TREE
// ============================================================================

/// One node of the mapping tree. The root is synthetic: it has no metadata
/// and no accessor, and exists only to turn the field forest into a tree.
#[derive(Debug, Clone)]
pub struct MappingNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,

    /// Children sorted by (order, discovery index).
    pub children: SmallVec<[NodeId; 4]>,

    pub metadata: Option<ExportMetadata>,
    pub accessor: Option<Accessor>,
    pub element_type: String,
}

impl MappingNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_collection(&self) -> bool {
        self.accessor
            .as_ref()
            .map_or(false, Accessor::is_collection)
    }

    /// Header label, or the element type for the unlabelled root.
    /// Used in error messages.
    pub fn display_name(&self) -> &str {
        self.metadata
            .as_ref()
            .map(|m| m.header_name.as_str())
            .unwrap_or(self.element_type.as_str())
    }
}

/// The immutable schema tree: an arena of nodes plus the leaf list in
/// column order (depth-first, respecting sibling order).
#[derive(Debug, Clone)]
pub struct SchemaTree {
    nodes: Vec<MappingNode>,
    leaves: Vec<NodeId>,
}

impl SchemaTree {
    pub const ROOT: NodeId = 0;

    pub fn node(&self, id: NodeId) -> &MappingNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[MappingNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Leaf ids in column order: leaf i maps to output column start + i.
    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    /// Node ids in breadth-first order starting at the root.
    pub fn breadth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut queue = VecDeque::from([Self::ROOT]);
        while let Some(id) = queue.pop_front() {
            order.push(id);
            queue.extend(self.nodes[id].children.iter().copied());
        }
        order
    }

    /// Checks the single-parent tree shape: every non-root node referenced
    /// exactly once as a child, the root never.
    fn verify(&self) -> Result<(), SchemaError> {
        let mut parent_counts = vec![0usize; self.nodes.len()];
        for node in &self.nodes {
            for &child in &node.children {
                parent_counts[child] += 1;
            }
        }
        for (id, &count) in parent_counts.iter().enumerate() {
            let expected = if id == Self::ROOT { 0 } else { 1 };
            if count != expected {
                return Err(SchemaError::NotATree {
                    node_id: id,
                    parent_count: count,
                });
            }
        }
        Ok(())
    }
}

/// Builds the mapping tree for a root type.
///
/// The traversal is queue-based rather than call-recursive, so deep or
/// self-referential schemas cannot exhaust the call stack. Expansion stops
/// at fields marked non-recursive and at types the source reports no
/// members for; runaway self-referential schemas hit the depth or node
/// limit and fail without exposing a partial tree.
pub fn build_tree(root_type: &str, source: &dyn AccessorSource) -> Result<SchemaTree, SchemaError> {
    let mut nodes = vec![MappingNode {
        id: SchemaTree::ROOT,
        parent: None,
        children: SmallVec::new(),
        metadata: None,
        accessor: None,
        element_type: root_type.to_string(),
    }];
    let mut depths = vec![0u32];
    let mut queue = VecDeque::from([SchemaTree::ROOT]);

    while let Some(parent_id) = queue.pop_front() {
        let expand = nodes[parent_id]
            .metadata
            .as_ref()
            .map_or(true, |meta| meta.is_recursive);
        if !expand {
            continue;
        }

        let type_ref = nodes[parent_id].element_type.clone();
        let mut fields = source.describe(&type_ref)?;
        if fields.is_empty() {
            continue;
        }
        // Stable sort: ties keep descriptor order.
        fields.sort_by_key(|field| field.metadata.order);

        let child_depth = depths[parent_id] + 1;
        if child_depth > MAX_SCHEMA_DEPTH {
            return Err(SchemaError::DepthLimitExceeded {
                type_ref,
                limit: MAX_SCHEMA_DEPTH,
            });
        }

        for spec in fields {
            let id = nodes.len();
            if id >= MAX_SCHEMA_NODES {
                return Err(SchemaError::NodeLimitExceeded {
                    limit: MAX_SCHEMA_NODES,
                });
            }
            nodes.push(MappingNode {
                id,
                parent: Some(parent_id),
                children: SmallVec::new(),
                metadata: Some(spec.metadata),
                accessor: Some(spec.accessor),
                element_type: spec.element_type,
            });
            depths.push(child_depth);
            nodes[parent_id].children.push(id);
            queue.push_back(id);
        }
    }

    if nodes[SchemaTree::ROOT].children.is_empty() {
        return Err(SchemaError::NoExportableFields {
            type_ref: root_type.to_string(),
        });
    }

    let leaves = collect_leaves(&nodes);
    let tree = SchemaTree { nodes, leaves };
    tree.verify()?;
    Ok(tree)
}

/// Depth-first pre-order leaf collection with an explicit stack. This is
/// the column order: header rectangles nest left-to-right, so a subtree's
/// leaves occupy a contiguous column run.
fn collect_leaves(nodes: &[MappingNode]) -> Vec<NodeId> {
    let mut leaves = Vec::new();
    let mut stack = vec![SchemaTree::ROOT];
    while let Some(id) = stack.pop() {
        if nodes[id].children.is_empty() {
            leaves.push(id);
        } else {
            for &child in nodes[id].children.iter().rev() {
                stack.push(child);
            }
        }
    }
    leaves
}
