//! PDF mutation backend trait.
//!
//! Defines the [`PdfMutator`] trait that abstracts the document operations a
//! crop or split needs: reading page boxes, replacing a page's CropBox and
//! MediaBox, and composing a new document from (possibly repeated) source
//! pages.

use labelcrop_core::{CropError, PdfRect, Point, Size};

/// The visible box of a page: its origin in PDF user space and its size.
///
/// The origin matters for pages whose MediaBox does not start at `(0, 0)`;
/// rectangles produced by the mapper are relative to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub origin: Point,
    pub size: Size,
}

/// One page of a composed document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlan {
    /// 0-based index of the source page.
    pub source: usize,
    /// Box to apply as CropBox and MediaBox, relative to the source page box
    /// origin. `None` copies the page unchanged.
    pub rect: Option<PdfRect>,
}

impl PagePlan {
    /// Copy a source page unchanged.
    pub fn keep(source: usize) -> Self {
        Self { source, rect: None }
    }

    /// Copy a source page and crop it to `rect`.
    pub fn cropped(source: usize, rect: PdfRect) -> Self {
        Self {
            source,
            rect: Some(rect),
        }
    }
}

/// Trait abstracting PDF mutation operations.
///
/// # Associated Types
///
/// - `Document`: The parsed, mutable document representation.
/// - `Error`: Backend-specific error type, convertible to [`CropError`].
///
/// # Usage
///
/// ```ignore
/// let mut doc = MyBackend::open(pdf_bytes)?;
/// let page = MyBackend::page_box(&doc, 0)?;
/// MyBackend::set_page_box(&mut doc, 0, &rect)?;
/// let bytes = MyBackend::save(&mut doc)?;
/// ```
pub trait PdfMutator {
    /// The parsed document type.
    type Document;

    /// Backend-specific error type, convertible to [`CropError`].
    type Error: std::error::Error + Into<CropError>;

    /// Parse PDF bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid, unencrypted PDF.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    /// Return the number of pages in the document.
    fn page_count(doc: &Self::Document) -> usize;

    /// Visible box of a page (CropBox clipped to MediaBox, or MediaBox).
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the page has no
    /// usable MediaBox.
    fn page_box(doc: &Self::Document, index: usize) -> Result<PageBox, Self::Error>;

    /// Set `rect` (relative to the page box origin) as both CropBox and
    /// MediaBox of a page.
    fn set_page_box(
        doc: &mut Self::Document,
        index: usize,
        rect: &PdfRect,
    ) -> Result<(), Self::Error>;

    /// Build a new document whose pages follow `plan`, in order.
    ///
    /// Source pages may appear more than once; each occurrence is an
    /// independent page.
    fn compose(doc: &Self::Document, plan: &[PagePlan]) -> Result<Self::Document, Self::Error>;

    /// Serialize the document.
    fn save(doc: &mut Self::Document) -> Result<Vec<u8>, Self::Error>;
}
