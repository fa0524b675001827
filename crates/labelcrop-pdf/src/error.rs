//! Error types for the mutation backend.
//!
//! Uses [`thiserror`] for derivation. [`BackendError`] wraps backend-specific
//! failures and converts into [`CropError`] at the crate boundary.

use labelcrop_core::CropError;
use thiserror::Error;

/// Error type for PDF mutation backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The document structure could not be read.
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading or writing PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A page index is outside the document.
    #[error("page index {index} out of range (0..{page_count})")]
    PageOutOfRange { index: usize, page_count: usize },

    /// A page box or target rectangle is unusable.
    #[error("invalid page geometry: {0}")]
    Geometry(String),

    /// The page tree could not be rewritten.
    #[error("page tree error: {0}")]
    PageTree(String),

    /// The document could not be serialized.
    #[error("failed to write PDF: {0}")]
    Write(String),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] CropError),
}

impl From<BackendError> for CropError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => CropError::ParseError(msg),
            BackendError::Io(e) => CropError::IoError(e.to_string()),
            BackendError::PageOutOfRange { index, page_count } => {
                CropError::PageOutOfRange { index, page_count }
            }
            BackendError::Geometry(msg) => CropError::InvalidGeometry(msg),
            BackendError::PageTree(msg) => CropError::MutationError(msg),
            BackendError::Write(msg) => CropError::MutationError(msg),
            BackendError::Core(e) => e,
        }
    }
}
