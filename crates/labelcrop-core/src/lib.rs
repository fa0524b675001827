//! labelcrop-core: Backend-independent crop geometry and interaction.
//!
//! This crate provides the crop box types, the screen/logical/PDF coordinate
//! mapper, the interactive crop editor state machine, and the label split
//! computation used by labelcrop. It has no required external dependencies.

pub mod error;
pub mod geometry;
pub mod interaction;
pub mod mapping;
pub mod split;

pub use error::CropError;
pub use geometry::{CropBox, MIN_BOX_SIZE, PdfRect, PercentRect, Point, Size};
pub use interaction::{
    ChangeCallback, CropEditor, DragKind, EditorState, HANDLE_HIT_SIZE, Handle, HitTarget,
};
pub use mapping::{
    PageGeometry, logical_to_pdf, logical_to_screen, pdf_to_logical, percent_to_logical,
    screen_to_logical,
};
pub use split::{LabelDimensions, SplitPlan, split_at_anchor, split_fixed};
