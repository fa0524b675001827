//! Error type for crop and split operations.
//!
//! [`CropError`] covers every failure the orchestrator can surface to a user.
//! Degenerate boxes discarded by the editor are not errors and never reach
//! this type.

use std::fmt;

/// Fatal error for a crop, split, render, or detection operation.
#[derive(Debug, Clone, PartialEq)]
pub enum CropError {
    /// The input bytes are not a readable PDF.
    ParseError(String),
    /// I/O error reading or writing document data.
    IoError(String),
    /// The page renderer failed.
    RenderError(String),
    /// The PDF mutation backend failed.
    MutationError(String),
    /// The AI detector returned no usable result.
    DetectionFailed,
    /// A numeric input cannot produce a usable rectangle.
    InvalidGeometry(String),
    /// A page index is outside the document.
    PageOutOfRange {
        /// Requested 0-based index.
        index: usize,
        /// Number of pages in the document.
        page_count: usize,
    },
    /// No document is loaded.
    NoDocument,
    /// An operation of the same kind is already running.
    Busy(&'static str),
    /// The PDF is encrypted.
    Encrypted,
}

impl fmt::Display for CropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CropError::ParseError(msg) => write!(f, "parse error: {msg}"),
            CropError::IoError(msg) => write!(f, "I/O error: {msg}"),
            CropError::RenderError(msg) => write!(f, "render error: {msg}"),
            CropError::MutationError(msg) => write!(f, "PDF mutation failed: {msg}"),
            CropError::DetectionFailed => write!(f, "AI detection returned no result"),
            CropError::InvalidGeometry(msg) => write!(f, "invalid geometry: {msg}"),
            CropError::PageOutOfRange { index, page_count } => write!(
                f,
                "page index {index} out of range (document has {page_count} pages)"
            ),
            CropError::NoDocument => write!(f, "no document loaded"),
            CropError::Busy(kind) => write!(f, "{kind} already in progress"),
            CropError::Encrypted => write!(f, "encrypted PDFs are not supported"),
        }
    }
}

impl std::error::Error for CropError {}

impl From<std::io::Error> for CropError {
    fn from(err: std::io::Error) -> Self {
        CropError::IoError(err.to_string())
    }
}
