//! Page renderer contract.
//!
//! Rasterizing pages is the job of an external renderer (pdf.js in the
//! browser, a PDFium host on the desktop). The orchestrator only needs each
//! page's rendered pixel size, which fixes the logical coordinate space the
//! crop editor works in, plus an optional encoded image for AI detection.

use labelcrop_core::{CropError, Size};
use serde::{Deserialize, Serialize};

use crate::document::Document;

/// An encoded page image (PNG, JPEG, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    /// MIME type, e.g. `image/png`.
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl PageImage {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            mime: "image/png".to_string(),
            bytes,
        }
    }
}

/// One rendered page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    /// 0-based page index.
    pub index: usize,
    /// Natural width of the rendering in pixels.
    pub width_px: f64,
    /// Natural height of the rendering in pixels.
    pub height_px: f64,
    /// Encoded image, when the renderer produces one.
    pub image: Option<PageImage>,
}

impl RenderedPage {
    /// The rendering's natural size, i.e. the crop editor's logical page size.
    pub fn viewport(&self) -> Size {
        Size::new(self.width_px, self.height_px)
    }
}

/// Renders every page of a PDF.
pub trait PageRenderer {
    /// Render all pages of the PDF in `bytes`, in page order.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::RenderError`] if rendering fails.
    fn render(&self, bytes: &[u8]) -> Result<Vec<RenderedPage>, CropError>;
}

/// Options for [`GeometryRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Pixels per PDF point.
    pub scale: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { scale: 1.5 }
    }
}

/// Renderer that computes page pixel sizes from page boxes without
/// rasterizing.
///
/// Images produced elsewhere can be attached with
/// [`GeometryRenderer::with_images`]; they are matched to pages by position.
#[derive(Debug, Clone, Default)]
pub struct GeometryRenderer {
    options: RenderOptions,
    images: Vec<Option<PageImage>>,
}

impl GeometryRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            images: Vec::new(),
        }
    }

    /// Attach externally rendered images, one per page in page order.
    pub fn with_images(mut self, images: Vec<Option<PageImage>>) -> Self {
        self.images = images;
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }
}

impl PageRenderer for GeometryRenderer {
    fn render(&self, bytes: &[u8]) -> Result<Vec<RenderedPage>, CropError> {
        let scale = self.options.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CropError::RenderError(format!("render scale {scale}")));
        }
        let doc = Document::open(bytes).map_err(|e| CropError::RenderError(e.to_string()))?;
        (0..doc.page_count())
            .map(|index| {
                let size = doc.page_size(index)?;
                Ok(RenderedPage {
                    index,
                    width_px: size.width * scale,
                    height_px: size.height * scale,
                    image: self.images.get(index).cloned().flatten(),
                })
            })
            .collect()
    }
}
