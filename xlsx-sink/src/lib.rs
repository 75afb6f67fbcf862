//! FILENAME: xlsx-sink/src/lib.rs
//! XLSX backend for the export engine.
//!
//! Two entry points:
//! - `XlsxGridSink` streams an export straight into a rust_xlsxwriter
//!   worksheet the caller owns.
//! - `save_grid_view` replays a captured `GridView` into a fresh workbook
//!   on disk.

mod error;
mod format;
mod writer;

pub use error::XlsxSinkError;
pub use format::convert_style_to_format;
pub use writer::{save_grid_view, XlsxGridSink};
