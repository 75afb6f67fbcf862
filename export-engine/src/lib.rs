//! FILENAME: export-engine/src/lib.rs
//! Object-graph to grid export engine.
//!
//! Turns an arbitrary nested object graph (scalar fields, nested records,
//! nested collections of records) into a two-dimensional grid with
//! multi-level, rectangle-merged headers, emitted through an abstract grid
//! sink.
//!
//! Layers:
//! - `schema`: Accessor descriptions and the mapping tree (what a type IS)
//! - `layout`: Computed header widths/heights/depths (WHERE headers land)
//! - `header` / `value`: The two export walks (HOW cells are produced)
//! - `sink` / `view`: The write-target contract and an in-memory grid
//!
//! Build a `Mapper` once per root type, then export any number of
//! instances of that type through it.

pub mod coord;
pub mod datum;
pub mod error;
pub mod layout;
pub mod mapper;
pub mod schema;
pub mod sink;
pub mod style;
pub mod view;

mod header;
mod value;

// Re-export commonly used types at the crate root
pub use coord::{coord_to_a1, index_to_col, CellCoord, CellRect};
pub use datum::Datum;
pub use error::{ExportError, SchemaError, SinkError, ValueError};
pub use layout::{compute_layout, Layout};
pub use mapper::{build_mapper, Mapper};
pub use schema::{
    build_tree, Accessor, AccessorKind, AccessorSource, ExportMetadata, FieldSpec, MappingNode,
    NodeId, SchemaTree, StaticAccessorSource, MAX_SCHEMA_DEPTH, MAX_SCHEMA_NODES,
};
pub use sink::GridSink;
pub use style::{BorderStyle, CellStyle, HorizontalAlign, VerticalAlign};
pub use view::{GridView, MergedRegion};
