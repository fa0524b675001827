//! AI box and split-line detection contract.

use labelcrop_core::PercentRect;

use crate::render::PageImage;

/// Proposes a crop box or a label/invoice split line for a page image.
///
/// Implementations swallow their own failures: any error (network, bad
/// response, nothing found) is reported as `None` and logged by the
/// implementation.
pub trait BoxDetector {
    /// The region worth keeping, in percent of the rendered page.
    fn detect_box(&self, image: &PageImage) -> Option<PercentRect>;

    /// Where the label ends, in percent of the page height from the top.
    fn detect_split(&self, image: &PageImage) -> Option<f64>;
}

impl<D: BoxDetector + ?Sized> BoxDetector for &D {
    fn detect_box(&self, image: &PageImage) -> Option<PercentRect> {
        (**self).detect_box(image)
    }

    fn detect_split(&self, image: &PageImage) -> Option<f64> {
        (**self).detect_split(image)
    }
}

impl<D: BoxDetector + ?Sized> BoxDetector for Box<D> {
    fn detect_box(&self, image: &PageImage) -> Option<PercentRect> {
        (**self).detect_box(image)
    }

    fn detect_split(&self, image: &PageImage) -> Option<f64> {
        (**self).detect_split(image)
    }
}
