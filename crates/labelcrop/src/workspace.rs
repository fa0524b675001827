//! Crop/split orchestration for one editing session.
//!
//! [`Workspace`] owns the loaded document, its rendered page geometry, and the
//! [`CropEditor`] for the active page. It runs crop and split operations
//! against the document, guards them with busy flags, and keeps the last
//! failure as a user-facing alert. Failed operations leave the session as it
//! was.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use labelcrop_core::{
    CropBox, CropEditor, CropError, LabelDimensions, PageGeometry, Point, Size,
    percent_to_logical,
};
use tracing::{debug, info, warn};

use crate::detect::BoxDetector;
use crate::document::{CropScope, Document, is_pdf};
use crate::render::{GeometryRenderer, PageImage, PageRenderer, RenderedPage};

/// The kind of long-running operation a busy flag tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyKind {
    /// Loading, cropping, or splitting a document.
    Processing,
    /// Waiting for the AI detector.
    Analyzing,
}

impl BusyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusyKind::Processing => "processing",
            BusyKind::Analyzing => "analyzing",
        }
    }
}

/// Shared busy flags.
///
/// Cloning shares the flags, so a UI can keep a clone to disable its buttons
/// while an operation runs.
#[derive(Debug, Clone, Default)]
pub struct BusyFlags {
    processing: Arc<AtomicBool>,
    analyzing: Arc<AtomicBool>,
}

impl BusyFlags {
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing.load(Ordering::Acquire)
    }

    /// Mark an operation of `kind` as running until the guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::Busy`] if an operation of the same kind is
    /// already running.
    pub fn begin(&self, kind: BusyKind) -> Result<BusyGuard, CropError> {
        let flag = match kind {
            BusyKind::Processing => &self.processing,
            BusyKind::Analyzing => &self.analyzing,
        };
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CropError::Busy(kind.as_str()))?;
        Ok(BusyGuard {
            flag: Arc::clone(flag),
        })
    }
}

/// Clears its busy flag when dropped.
#[derive(Debug)]
#[must_use = "the busy flag is cleared as soon as the guard is dropped"]
pub struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// The document being edited.
#[derive(Debug)]
struct Session {
    file_name: String,
    document: Document,
    pages: Vec<RenderedPage>,
}

/// One crop/split editing session.
///
/// # Example
///
/// ```ignore
/// let mut ws = Workspace::new(GeometryRenderer::default());
/// ws.load("order.pdf", bytes)?;
/// let out = ws.split_label_fixed(&LabelDimensions::MEESHO)?;
/// ```
pub struct Workspace<R = GeometryRenderer> {
    renderer: R,
    detector: Option<Box<dyn BoxDetector>>,
    session: Option<Session>,
    current_page: usize,
    editor: CropEditor,
    busy: BusyFlags,
    alert: Option<String>,
}

impl<R> std::fmt::Debug for Workspace<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("session", &self.session.as_ref().map(|s| &s.file_name))
            .field("current_page", &self.current_page)
            .field("editor", &self.editor)
            .field("busy", &self.busy)
            .field("alert", &self.alert)
            .finish_non_exhaustive()
    }
}

impl<R: PageRenderer> Workspace<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            detector: None,
            session: None,
            current_page: 0,
            editor: CropEditor::new(Size::new(0.0, 0.0)),
            busy: BusyFlags::default(),
            alert: None,
        }
    }

    /// Attach the AI detector used by [`detect_box`](Self::detect_box),
    /// [`ai_crop`](Self::ai_crop), and [`ai_split`](Self::ai_split).
    pub fn with_detector(mut self, detector: impl BoxDetector + 'static) -> Self {
        self.detector = Some(Box::new(detector));
        self
    }

    pub fn editor(&self) -> &CropEditor {
        &self.editor
    }

    /// Mutable access for pointer input and change-callback registration.
    pub fn editor_mut(&mut self) -> &mut CropEditor {
        &mut self.editor
    }

    pub fn busy(&self) -> &BusyFlags {
        &self.busy
    }

    /// Message of the last failed operation, if not yet dismissed.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Dismiss and return the current alert.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.file_name.as_str())
    }

    pub fn document(&self) -> Option<&Document> {
        self.session.as_ref().map(|s| &s.document)
    }

    pub fn pages(&self) -> &[RenderedPage] {
        self.session.as_ref().map_or(&[], |s| s.pages.as_slice())
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Load a file chosen by the user.
    ///
    /// Returns `Ok(false)` without touching the session when `bytes` are not
    /// a PDF. On success the first page becomes active and the editor is
    /// cleared.
    pub fn load(&mut self, file_name: &str, bytes: Vec<u8>) -> Result<bool, CropError> {
        if !is_pdf(&bytes) {
            debug!(file_name, "ignoring non-PDF input");
            return Ok(false);
        }
        let _guard = self.begin(BusyKind::Processing)?;
        let result = self.open_session(file_name, bytes);
        let session = self.record("load", result)?;

        info!(
            file_name,
            pages = session.pages.len(),
            "loaded document"
        );
        let viewport = session.pages[0].viewport();
        self.session = Some(session);
        self.current_page = 0;
        self.editor.set_page_size(viewport);
        self.alert = None;
        Ok(true)
    }

    fn open_session(&self, file_name: &str, bytes: Vec<u8>) -> Result<Session, CropError> {
        let pages = self.renderer.render(&bytes)?;
        let document = Document::open(bytes)?;
        if pages.len() != document.page_count() {
            return Err(CropError::RenderError(format!(
                "renderer produced {} pages for a {}-page document",
                pages.len(),
                document.page_count()
            )));
        }
        if let Some(page) = pages.iter().find(|p| !p.viewport().is_usable()) {
            return Err(CropError::RenderError(format!(
                "page {} rendered at {}x{} px",
                page.index, page.width_px, page.height_px
            )));
        }
        Ok(Session {
            file_name: file_name.to_string(),
            document,
            pages,
        })
    }

    /// Switch the active page. The editor is resized to the page and its box
    /// cleared.
    pub fn set_current_page(&mut self, index: usize) -> Result<(), CropError> {
        let viewport = self.rendered_page(index)?.viewport();
        self.current_page = index;
        self.editor.set_page_size(viewport);
        Ok(())
    }

    pub fn set_zoom(&mut self, zoom: f64) -> Result<(), CropError> {
        self.editor.set_zoom(zoom)
    }

    pub fn set_container_origin(&mut self, origin: Point) {
        self.editor.set_container_origin(origin);
    }

    /// Point size versus rendered viewport of a page.
    pub fn page_geometry(&self, index: usize) -> Result<PageGeometry, CropError> {
        let session = self.session()?;
        let viewport = self.rendered_page(index)?.viewport();
        PageGeometry::new(session.document.page_size(index)?, viewport)
    }

    /// Crop pages to `crop`, given in the active page's logical pixels.
    ///
    /// With [`CropScope::All`] every page is cropped; each page uses its own
    /// point size with the active page's viewport. Returns the new PDF.
    pub fn crop(&mut self, crop: CropBox, scope: CropScope) -> Result<Vec<u8>, CropError> {
        let _guard = self.begin(BusyKind::Processing)?;
        let result = self.crop_document(crop, scope);
        let bytes = self.record("crop", result)?;
        info!(?scope, page = self.current_page, bytes = bytes.len(), "cropped document");
        Ok(bytes)
    }

    /// Crop to the editor's current box.
    pub fn crop_selection(&mut self, scope: CropScope) -> Result<Vec<u8>, CropError> {
        let crop = self
            .editor
            .crop_box()
            .ok_or_else(|| CropError::InvalidGeometry("no crop box selected".into()))?;
        self.crop(crop, scope)
    }

    fn crop_document(&self, crop: CropBox, scope: CropScope) -> Result<Vec<u8>, CropError> {
        let session = self.session()?;
        let viewport = self.rendered_page(self.current_page)?.viewport();
        session
            .document
            .crop(crop, self.current_page, viewport, scope)
    }

    /// Split page 1 at `anchor_percent` of its height from the top into a
    /// label page and an invoice page, followed by the remaining pages.
    pub fn split_label(&mut self, anchor_percent: f64) -> Result<Vec<u8>, CropError> {
        let _guard = self.begin(BusyKind::Processing)?;
        let result = self
            .session()
            .and_then(|s| s.document.split_at_anchor(anchor_percent));
        let bytes = self.record("split", result)?;
        info!(anchor_percent, bytes = bytes.len(), "split label");
        Ok(bytes)
    }

    /// Split page 1 into fixed-height label and invoice bands.
    pub fn split_label_fixed(&mut self, dims: &LabelDimensions) -> Result<Vec<u8>, CropError> {
        let _guard = self.begin(BusyKind::Processing)?;
        let result = self.session().and_then(|s| s.document.split_fixed(dims));
        let bytes = self.record("fixed split", result)?;
        info!(?dims, bytes = bytes.len(), "split label at fixed heights");
        Ok(bytes)
    }

    /// Ask the detector for a box on the active page and place it in the
    /// editor.
    ///
    /// On failure the editor's box and state are unchanged.
    pub fn detect_box(&mut self) -> Result<CropBox, CropError> {
        let _guard = self.begin(BusyKind::Analyzing)?;
        let result = self.propose_box();
        let proposed = self.record("box detection", result)?;
        let result = self.editor.set_box(proposed);
        let placed = self.record("box detection", result)?;
        info!(?placed, page = self.current_page, "placed detected box");
        Ok(placed)
    }

    fn propose_box(&self) -> Result<CropBox, CropError> {
        let page = self.rendered_page(self.current_page)?;
        let image = page_image(page)?;
        let pct = self
            .detector()?
            .detect_box(image)
            .ok_or(CropError::DetectionFailed)?;
        debug!(?pct, "detector proposed box");
        Ok(percent_to_logical(&pct, page.viewport()))
    }

    /// Detect a box, then crop to it.
    pub fn ai_crop(&mut self, scope: CropScope) -> Result<Vec<u8>, CropError> {
        let crop = self.detect_box()?;
        self.crop(crop, scope)
    }

    /// Ask the detector where the label ends on page 1, in percent of the
    /// page height from the top.
    pub fn detect_split(&mut self) -> Result<f64, CropError> {
        let _guard = self.begin(BusyKind::Analyzing)?;
        let result = self.propose_split();
        self.record("split detection", result)
    }

    /// Detect the label/invoice split line on page 1, then split there.
    pub fn ai_split(&mut self) -> Result<Vec<u8>, CropError> {
        let anchor = self.detect_split()?;
        self.split_label(anchor)
    }

    fn propose_split(&self) -> Result<f64, CropError> {
        let image = page_image(self.rendered_page(0)?)?;
        let anchor = self
            .detector()?
            .detect_split(image)
            .ok_or(CropError::DetectionFailed)?;
        debug!(anchor, "detector proposed split");
        Ok(anchor)
    }

    fn begin(&self, kind: BusyKind) -> Result<BusyGuard, CropError> {
        let guard = self.busy.begin(kind);
        if guard.is_err() {
            debug!(kind = kind.as_str(), "operation already running");
        }
        guard
    }

    /// Log a failed operation and keep its message as the alert.
    fn record<T>(&mut self, op: &str, result: Result<T, CropError>) -> Result<T, CropError> {
        if let Err(e) = &result {
            warn!(op, error = %e, "operation failed");
            self.alert = Some(format!("{op} failed: {e}"));
        }
        result
    }

    fn session(&self) -> Result<&Session, CropError> {
        self.session.as_ref().ok_or(CropError::NoDocument)
    }

    fn rendered_page(&self, index: usize) -> Result<&RenderedPage, CropError> {
        let session = self.session()?;
        session.pages.get(index).ok_or(CropError::PageOutOfRange {
            index,
            page_count: session.pages.len(),
        })
    }

    fn detector(&self) -> Result<&dyn BoxDetector, CropError> {
        match &self.detector {
            Some(d) => Ok(d.as_ref()),
            None => {
                warn!("no detector configured");
                Err(CropError::DetectionFailed)
            }
        }
    }
}

fn page_image(page: &RenderedPage) -> Result<&PageImage, CropError> {
    page.image.as_ref().ok_or_else(|| {
        CropError::RenderError(format!("page {} has no rendered image", page.index))
    })
}
