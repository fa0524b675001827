//! Coordinate mapping between screen, logical, and PDF spaces.
//!
//! Screen to logical is a translate-then-unzoom. Logical to PDF scales X and
//! Y independently by the ratio of the page's point size to its rendered
//! viewport and flips the origin from top-left to bottom-left.
//!
//! # Example
//!
//! ```
//! use labelcrop_core::{CropBox, logical_to_pdf};
//!
//! let rect = logical_to_pdf(&CropBox::new(100.0, 50.0, 200.0, 300.0), 595.0, 842.0, 800.0, 1000.0);
//! assert!((rect.x - 74.375).abs() < 1e-9);
//! assert!((rect.y - 547.3).abs() < 1e-9);
//! ```

use crate::error::CropError;
use crate::geometry::{CropBox, PdfRect, PercentRect, Point, Size};

/// Convert a pointer position to logical page coordinates.
pub fn screen_to_logical(screen: Point, container_origin: Point, zoom: f64) -> Point {
    Point::new(
        (screen.x - container_origin.x) / zoom,
        (screen.y - container_origin.y) / zoom,
    )
}

/// Convert a logical page position back to screen coordinates.
pub fn logical_to_screen(logical: Point, container_origin: Point, zoom: f64) -> Point {
    Point::new(
        logical.x * zoom + container_origin.x,
        logical.y * zoom + container_origin.y,
    )
}

/// Map a logical crop box onto a PDF page.
///
/// `page_*_pt` is the page size in points; `viewport_*_px` is the natural
/// pixel size the page was rendered at.
pub fn logical_to_pdf(
    crop: &CropBox,
    page_width_pt: f64,
    page_height_pt: f64,
    viewport_width_px: f64,
    viewport_height_px: f64,
) -> PdfRect {
    let scale_x = page_width_pt / viewport_width_px;
    let scale_y = page_height_pt / viewport_height_px;
    PdfRect {
        x: crop.x * scale_x,
        y: page_height_pt - (crop.y * scale_y) - (crop.height * scale_y),
        width: crop.width * scale_x,
        height: crop.height * scale_y,
    }
}

/// Inverse of [`logical_to_pdf`].
pub fn pdf_to_logical(
    rect: &PdfRect,
    page_width_pt: f64,
    page_height_pt: f64,
    viewport_width_px: f64,
    viewport_height_px: f64,
) -> CropBox {
    let scale_x = page_width_pt / viewport_width_px;
    let scale_y = page_height_pt / viewport_height_px;
    CropBox {
        x: rect.x / scale_x,
        y: (page_height_pt - rect.y - rect.height) / scale_y,
        width: rect.width / scale_x,
        height: rect.height / scale_y,
    }
}

/// Convert a percent-of-page rectangle to logical pixels, clipped to the page.
pub fn percent_to_logical(pct: &PercentRect, viewport: Size) -> CropBox {
    CropBox::new(
        pct.x / 100.0 * viewport.width,
        pct.y / 100.0 * viewport.height,
        pct.width / 100.0 * viewport.width,
        pct.height / 100.0 * viewport.height,
    )
    .clamp_to(viewport)
}

/// A page's PDF point size paired with the pixel size it was rendered at.
///
/// Deserializing goes through [`PageGeometry::new`], so unusable sizes are
/// rejected there too.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "PageGeometryParts"))]
pub struct PageGeometry {
    page: Size,
    viewport: Size,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct PageGeometryParts {
    page: Size,
    viewport: Size,
}

#[cfg(feature = "serde")]
impl TryFrom<PageGeometryParts> for PageGeometry {
    type Error = CropError;

    fn try_from(parts: PageGeometryParts) -> Result<Self, Self::Error> {
        PageGeometry::new(parts.page, parts.viewport)
    }
}

impl PageGeometry {
    /// Create a geometry; both sizes must be finite and positive.
    pub fn new(page: Size, viewport: Size) -> Result<Self, CropError> {
        if !page.is_usable() {
            return Err(CropError::InvalidGeometry(format!(
                "page size {}x{} pt",
                page.width, page.height
            )));
        }
        if !viewport.is_usable() {
            return Err(CropError::InvalidGeometry(format!(
                "viewport size {}x{} px",
                viewport.width, viewport.height
            )));
        }
        Ok(Self { page, viewport })
    }

    /// Page size in points.
    pub fn page(&self) -> Size {
        self.page
    }

    /// Rendered viewport size in pixels.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Points per logical pixel along X.
    pub fn scale_x(&self) -> f64 {
        self.page.width / self.viewport.width
    }

    /// Points per logical pixel along Y.
    pub fn scale_y(&self) -> f64 {
        self.page.height / self.viewport.height
    }

    pub fn to_pdf(&self, crop: &CropBox) -> PdfRect {
        logical_to_pdf(
            crop,
            self.page.width,
            self.page.height,
            self.viewport.width,
            self.viewport.height,
        )
    }

    pub fn to_logical(&self, rect: &PdfRect) -> CropBox {
        pdf_to_logical(
            rect,
            self.page.width,
            self.page.height,
            self.viewport.width,
            self.viewport.height,
        )
    }

    /// The same viewport applied to a page of a different point size.
    ///
    /// Used when one logical box is applied across every page of a document.
    pub fn with_page(&self, page: Size) -> Result<Self, CropError> {
        Self::new(page, self.viewport)
    }
}
