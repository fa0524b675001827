//! Shipping label / tax invoice split computation.
//!
//! E-commerce label PDFs carry the courier label in the upper part of the
//! first page and the tax invoice below it. A split produces two bands of
//! that page, both in PDF space (bottom-left origin, relative to the page box
//! origin) and spanning the full page width.

use crate::error::CropError;
use crate::geometry::{PdfRect, Size};

/// Fixed label/invoice heights measured on a reference viewport.
///
/// Heights are in reference-viewport pixels; they are scaled to points by
/// `page_width_pt / view_width`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabelDimensions {
    pub label_height: f64,
    pub invoice_height: f64,
    pub view_width: f64,
}

impl LabelDimensions {
    /// Meesho portal labels.
    pub const MEESHO: Self = Self {
        label_height: 490.0,
        invoice_height: 360.0,
        view_width: 800.0,
    };

    /// Look up a named preset (case-insensitive).
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "meesho" => Some(Self::MEESHO),
            _ => None,
        }
    }

    /// Points per reference pixel for a page of the given width.
    pub fn scale_for(&self, page_width_pt: f64) -> f64 {
        page_width_pt / self.view_width
    }

    fn validate(&self) -> Result<(), CropError> {
        let fields = [
            ("label height", self.label_height),
            ("invoice height", self.invoice_height),
            ("view width", self.view_width),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(CropError::InvalidGeometry(format!("{name} {value}")));
            }
        }
        Ok(())
    }
}

/// The two bands a split produces.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplitPlan {
    /// Upper band (shipping label), becomes output page 1.
    pub label: PdfRect,
    /// Lower band (tax invoice), becomes output page 2.
    pub invoice: PdfRect,
}

/// Split at `anchor_percent` of the page height, measured from the top.
///
/// # Example
///
/// ```
/// use labelcrop_core::{Size, split_at_anchor};
///
/// let plan = split_at_anchor(Size::new(600.0, 1000.0), 60.0).unwrap();
/// assert_eq!((plan.label.y, plan.label.top()), (400.0, 1000.0));
/// assert_eq!((plan.invoice.y, plan.invoice.top()), (0.0, 400.0));
/// ```
pub fn split_at_anchor(page: Size, anchor_percent: f64) -> Result<SplitPlan, CropError> {
    if !page.is_usable() {
        return Err(CropError::InvalidGeometry(format!(
            "page size {}x{} pt",
            page.width, page.height
        )));
    }
    if !anchor_percent.is_finite() || anchor_percent <= 0.0 || anchor_percent >= 100.0 {
        return Err(CropError::InvalidGeometry(format!(
            "split anchor {anchor_percent}% must be strictly between 0 and 100"
        )));
    }
    let split_y = page.height - page.height * anchor_percent / 100.0;
    Ok(SplitPlan {
        label: PdfRect::new(0.0, split_y, page.width, page.height - split_y),
        invoice: PdfRect::new(0.0, 0.0, page.width, split_y),
    })
}

/// Split using fixed label and invoice heights.
///
/// The label band is taken from the top of the page; the invoice band sits
/// directly beneath it and is cut off at the bottom of the page if it would
/// extend past it.
pub fn split_fixed(page: Size, dims: &LabelDimensions) -> Result<SplitPlan, CropError> {
    if !page.is_usable() {
        return Err(CropError::InvalidGeometry(format!(
            "page size {}x{} pt",
            page.width, page.height
        )));
    }
    dims.validate()?;

    let scale = dims.scale_for(page.width);
    let label_height = dims.label_height * scale;
    let invoice_height = dims.invoice_height * scale;

    let label_bottom = page.height - label_height;
    if label_bottom <= 0.0 {
        return Err(CropError::InvalidGeometry(format!(
            "label band of {label_height:.2} pt leaves no room on a {:.2} pt page",
            page.height
        )));
    }
    let invoice_bottom = (label_bottom - invoice_height).max(0.0);

    Ok(SplitPlan {
        label: PdfRect::new(0.0, label_bottom, page.width, label_height),
        invoice: PdfRect::new(
            0.0,
            invoice_bottom,
            page.width,
            label_bottom - invoice_bottom,
        ),
    })
}
