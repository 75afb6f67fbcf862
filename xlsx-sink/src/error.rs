//! FILENAME: xlsx-sink/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum XlsxSinkError {
    #[error("XLSX write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
