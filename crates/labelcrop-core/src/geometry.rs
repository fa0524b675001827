//! Geometry primitives shared by the editor, the mapper, and the PDF backend.
//!
//! Three coordinate spaces are in play:
//! - screen space: pointer positions, affected by zoom and container offset
//! - logical space: the rendered page at its natural pixel size, top-left origin
//! - PDF space: points, bottom-left origin, relative to the page box origin

/// Minimum width and height of a finalized crop box, in logical units.
pub const MIN_BOX_SIZE: f64 = 5.0;

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair, used for page point sizes and rendered viewports.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are finite and strictly positive.
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// The user's crop region in logical page units (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CropBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Axis-aligned box spanning two corner points, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self {
            x,
            y,
            width: a.x.max(b.x) - x,
            height: a.y.max(b.y) - y,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether the box meets the minimum finalized size.
    pub fn is_finalizable(&self) -> bool {
        self.width >= MIN_BOX_SIZE && self.height >= MIN_BOX_SIZE
    }

    /// Whether `p` lies inside the box (edges inclusive).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Whether the box lies fully within a page of the given size.
    pub fn fits_within(&self, page: Size) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.width >= 0.0
            && self.height >= 0.0
            && self.right() <= page.width
            && self.bottom() <= page.height
    }

    /// Clip the box to `[0, page.width] x [0, page.height]`.
    pub fn clamp_to(&self, page: Size) -> Self {
        let x0 = clamp(self.x, 0.0, page.width);
        let y0 = clamp(self.y, 0.0, page.height);
        let x1 = clamp(self.right(), x0, page.width);
        let y1 = clamp(self.bottom(), y0, page.height);
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }
}

/// A rectangle in PDF points with bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PdfRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PdfRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Upper edge (largest y).
    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    /// The rectangle as a PDF box array `[llx, lly, urx, ury]`, shifted by
    /// the page box origin.
    pub fn to_box_array(&self, origin: Point) -> [f64; 4] {
        [
            origin.x + self.x,
            origin.y + self.y,
            origin.x + self.x + self.width,
            origin.y + self.y + self.height,
        ]
    }
}

/// A rectangle expressed in percent (0-100) of the rendered page.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PercentRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PercentRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Non-panicking clamp: `hi` wins when the bounds cross.
pub(crate) fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}
