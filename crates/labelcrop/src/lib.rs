//! labelcrop: Crop PDF pages and split shipping labels from tax invoices.
//!
//! This is the public API facade crate for labelcrop. It re-exports types from
//! labelcrop-core and uses labelcrop-pdf for page-box mutation.
//!
//! # Architecture
//!
//! - **labelcrop-core**: Geometry, coordinate mapping, the crop editor state
//!   machine, and split computation
//! - **labelcrop-pdf**: Page-box mutation and page composition over lopdf
//! - **labelcrop** (this crate): [`Document`], the renderer and detector
//!   contracts, and the [`Workspace`] orchestrator
//!
//! # Example
//!
//! ```ignore
//! use labelcrop::{CropBox, CropScope, GeometryRenderer, Workspace};
//!
//! let mut ws = Workspace::new(GeometryRenderer::default());
//! ws.load("order.pdf", std::fs::read("order.pdf")?)?;
//! let out = ws.crop(CropBox::new(100.0, 50.0, 200.0, 300.0), CropScope::Current)?;
//! ```

mod detect;
mod document;
#[cfg(feature = "ollama")]
mod ollama;
mod render;
mod workspace;

pub use detect::BoxDetector;
pub use document::{CropScope, Document, is_pdf};
pub use labelcrop_core::*;
pub use labelcrop_pdf::PageBox;
#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaDetector, OllamaError};
pub use render::{GeometryRenderer, PageImage, PageRenderer, RenderOptions, RenderedPage};
pub use workspace::{BusyFlags, BusyGuard, BusyKind, Workspace};

pub use labelcrop_core;
pub use labelcrop_pdf;
