//! FILENAME: export-engine/src/error.rs
//! PURPOSE: Error types for schema construction, accessor evaluation and export.
//! CONTEXT: All failures propagate synchronously to the caller and are never
//! retried; the transform is deterministic so a retry would reproduce them.

use thiserror::Error;

/// Fatal problems detected while building or laying out a schema tree.
/// No partial tree is ever exposed after one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("invalid descriptor for type '{type_ref}': {reason}")]
    InvalidDescriptor { type_ref: String, reason: String },

    #[error(
        "schema expansion exceeded depth limit {limit} at type '{type_ref}' \
         (self-referential field left recursive?)"
    )]
    DepthLimitExceeded { type_ref: String, limit: u32 },

    #[error("schema expansion exceeded node limit {limit}")]
    NodeLimitExceeded { limit: usize },

    #[error("root type '{type_ref}' has no exportable fields")]
    NoExportableFields { type_ref: String },

    #[error("mapping graph is not a tree: node {node_id} is referenced by {parent_count} parents")]
    NotATree { node_id: usize, parent_count: usize },

    #[error("layout invariant violated: leaf widths sum to {leaf_total}, root spans {root_width}")]
    LayoutInvariant { leaf_total: u32, root_width: u32 },
}

/// An accessor invocation failed or produced a value of the wrong shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("accessor for '{field}' failed: {reason}")]
    AccessorFailed { field: String, reason: String },

    #[error("accessor for '{field}' returned {actual} where {expected} was expected")]
    ShapeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// A grid sink rejected a write.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("grid sink rejected a write: {message}")]
pub struct SinkError {
    pub message: String,
}

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        SinkError {
            message: message.into(),
        }
    }
}

/// Failures while exporting an instance through a built mapper.
///
/// Sink writes made before the failure are not rolled back. Row-multiplier
/// discovery runs before the first write, so accessor and shape errors abort
/// with a clean sink; only sink errors themselves can leave a partial grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// A leaf reached during export carries no metadata. Unreachable for
    /// trees built by this crate, checked anyway.
    #[error("leaf node {node_id} has no export metadata")]
    MissingLeafMetadata { node_id: usize },

    /// A non-root node carries no accessor. Unreachable for trees built by
    /// this crate, checked anyway.
    #[error("node {node_id} has no accessor")]
    MissingAccessor { node_id: usize },

    #[error(transparent)]
    Value(#[from] ValueError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}
