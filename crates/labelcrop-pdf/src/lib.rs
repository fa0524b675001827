//! labelcrop-pdf: PDF mutation backend for labelcrop.
//!
//! This crate implements the page-box reading and rewriting that crop and
//! split operations need. It provides the [`PdfMutator`] trait for
//! pluggable backends and a default implementation using [lopdf](https://crates.io/crates/lopdf).

pub mod backend;
pub mod error;
pub mod lopdf_backend;

pub use backend::{PageBox, PagePlan, PdfMutator};
pub use error::BackendError;
pub use labelcrop_core;
pub use lopdf_backend::{LopdfBackend, LopdfDocument};
