//! Error types for documentation conversion.

use thiserror::Error;

/// Errors that abort a document conversion.
///
/// Type resolution misses and malformed member identifiers never show up
/// here; they degrade the affected node and the conversion continues.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Unknown element type \"{tag}\" on line {line}, pos {column}")]
    UnrecognizedTag {
        tag: String,
        line: usize,
        column: usize,
    },

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed documentation file: {0}")]
    MalformedDocument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
