//! WebAssembly/JavaScript bindings for labelcrop.
//!
//! Exposes the crop editor state machine and the crop/split operations to
//! JavaScript via wasm-bindgen. Pages are rendered by pdf.js on the JS side;
//! the editor works in the rendered page's natural pixel space.

use wasm_bindgen::prelude::*;

use labelcrop::{
    CropBox, CropEditor, CropScope, Document, DragKind, EditorState, LabelDimensions, Point,
    Size,
};

fn js_err(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// A crop box in logical page pixels (top-left origin).
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WasmBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[wasm_bindgen]
impl WasmBox {
    #[wasm_bindgen(constructor)]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> WasmBox {
        WasmBox {
            x,
            y,
            width,
            height,
        }
    }
}

impl From<CropBox> for WasmBox {
    fn from(b: CropBox) -> Self {
        WasmBox::new(b.x, b.y, b.width, b.height)
    }
}

impl From<&WasmBox> for CropBox {
    fn from(b: &WasmBox) -> Self {
        CropBox::new(b.x, b.y, b.width, b.height)
    }
}

/// Interactive crop editor for one rendered page (WASM binding).
///
/// # JavaScript Usage
///
/// ```js
/// const editor = new WasmCropEditor(canvas.width, canvas.height);
/// canvas.onpointerdown = (e) => {
///   editor.pointerDown(e.clientX, e.clientY);
///   if (editor.isDragging) {
///     window.addEventListener("pointermove", onMove);
///     window.addEventListener("pointerup", onUp);
///   }
/// };
/// ```
///
/// Every pointer method returns the current box, or `undefined` when there
/// is none.
#[wasm_bindgen]
pub struct WasmCropEditor {
    inner: CropEditor,
}

#[wasm_bindgen]
impl WasmCropEditor {
    /// Create an editor for a page rendered at `width` x `height` pixels.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> WasmCropEditor {
        WasmCropEditor {
            inner: CropEditor::new(Size::new(width, height)),
        }
    }

    #[wasm_bindgen(js_name = "pointerDown")]
    pub fn pointer_down(&mut self, x: f64, y: f64) -> Option<WasmBox> {
        self.inner.pointer_down(Point::new(x, y));
        self.current()
    }

    #[wasm_bindgen(js_name = "pointerMove")]
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<WasmBox> {
        self.inner.pointer_move(Point::new(x, y)).map(WasmBox::from)
    }

    #[wasm_bindgen(js_name = "pointerUp")]
    pub fn pointer_up(&mut self) -> Option<WasmBox> {
        self.inner.pointer_up();
        self.current()
    }

    /// End a drag on pointercancel, blur, or lost capture.
    #[wasm_bindgen(js_name = "pointerCancel")]
    pub fn pointer_cancel(&mut self) -> Option<WasmBox> {
        self.inner.pointer_cancel();
        self.current()
    }

    #[wasm_bindgen(js_name = "setZoom")]
    pub fn set_zoom(&mut self, zoom: f64) -> Result<(), JsError> {
        self.inner.set_zoom(zoom).map_err(js_err)
    }

    /// Screen position of the page container's top-left corner.
    #[wasm_bindgen(js_name = "setOrigin")]
    pub fn set_origin(&mut self, x: f64, y: f64) {
        self.inner.set_container_origin(Point::new(x, y));
    }

    /// Switch to a page rendered at a different size. Clears the box.
    #[wasm_bindgen(js_name = "setPageSize")]
    pub fn set_page_size(&mut self, width: f64, height: f64) {
        self.inner.set_page_size(Size::new(width, height));
    }

    /// Place a box programmatically; it is clipped to the page.
    #[wasm_bindgen(js_name = "setBox")]
    pub fn set_box(&mut self, crop: &WasmBox) -> Result<WasmBox, JsError> {
        self.inner
            .set_box(CropBox::from(crop))
            .map(WasmBox::from)
            .map_err(js_err)
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// The current box, or `undefined`.
    #[wasm_bindgen(getter, js_name = "box")]
    pub fn current(&self) -> Option<WasmBox> {
        self.inner.crop_box().map(WasmBox::from)
    }

    /// One of `idle`, `selected`, `creating`, `moving`, or `resizing-<handle>`.
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        match self.inner.state() {
            EditorState::Idle => "idle".to_string(),
            EditorState::Selected => "selected".to_string(),
            EditorState::Dragging(DragKind::Create) => "creating".to_string(),
            EditorState::Dragging(DragKind::Move) => "moving".to_string(),
            EditorState::Dragging(DragKind::Resize(handle)) => format!("resizing-{handle}"),
        }
    }

    /// Whether window-level move/up listeners should be attached.
    #[wasm_bindgen(getter, js_name = "isDragging")]
    pub fn is_dragging(&self) -> bool {
        self.inner.is_dragging()
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.inner.zoom()
    }
}

/// A PDF opened for cropping and label splitting (WASM binding).
///
/// # JavaScript Usage
///
/// ```js
/// const doc = WasmLabelDocument.open(pdfBytes);
/// const out = doc.splitLabelFixed();   // Meesho preset
/// download(new Blob([out], { type: "application/pdf" }));
/// ```
#[wasm_bindgen]
pub struct WasmLabelDocument {
    inner: Document,
}

#[wasm_bindgen]
impl WasmLabelDocument {
    /// Open a PDF from raw bytes (Uint8Array in JavaScript).
    pub fn open(data: &[u8]) -> Result<WasmLabelDocument, JsError> {
        let doc = Document::open(data).map_err(js_err)?;
        Ok(WasmLabelDocument { inner: doc })
    }

    #[wasm_bindgen(getter, js_name = "pageCount")]
    pub fn page_count(&self) -> usize {
        self.inner.page_count()
    }

    /// `[width, height]` of a page in PDF points.
    #[wasm_bindgen(js_name = "pageSize")]
    pub fn page_size(&self, index: usize) -> Result<Vec<f64>, JsError> {
        let size = self.inner.page_size(index).map_err(js_err)?;
        Ok(vec![size.width, size.height])
    }

    /// All page sizes as `[{width, height}, ...]` in PDF points.
    #[wasm_bindgen(js_name = "pageSizes")]
    pub fn page_sizes(&self) -> Result<JsValue, JsError> {
        let sizes = (0..self.inner.page_count())
            .map(|i| self.inner.page_size(i))
            .collect::<Result<Vec<_>, _>>()
            .map_err(js_err)?;
        serde_wasm_bindgen::to_value(&sizes).map_err(js_err)
    }

    /// Crop to a box drawn on page `pageIndex` rendered at
    /// `viewportWidth` x `viewportHeight` pixels. Returns the new PDF.
    pub fn crop(
        &self,
        crop: &WasmBox,
        page_index: usize,
        viewport_width: f64,
        viewport_height: f64,
        all_pages: bool,
    ) -> Result<Vec<u8>, JsError> {
        let scope = if all_pages {
            CropScope::All
        } else {
            CropScope::Current
        };
        self.inner
            .crop(
                CropBox::from(crop),
                page_index,
                Size::new(viewport_width, viewport_height),
                scope,
            )
            .map_err(js_err)
    }

    /// Split page 1 at `anchorPercent` of its height from the top.
    #[wasm_bindgen(js_name = "splitLabel")]
    pub fn split_label(&self, anchor_percent: f64) -> Result<Vec<u8>, JsError> {
        self.inner.split_at_anchor(anchor_percent).map_err(js_err)
    }

    /// Split page 1 into fixed label and invoice bands. Omitted values come
    /// from the Meesho preset.
    #[wasm_bindgen(js_name = "splitLabelFixed")]
    pub fn split_label_fixed(
        &self,
        label_height: Option<f64>,
        invoice_height: Option<f64>,
        view_width: Option<f64>,
    ) -> Result<Vec<u8>, JsError> {
        let base = LabelDimensions::MEESHO;
        let dims = LabelDimensions {
            label_height: label_height.unwrap_or(base.label_height),
            invoice_height: invoice_height.unwrap_or(base.invoice_height),
            view_width: view_width.unwrap_or(base.view_width),
        };
        self.inner.split_fixed(&dims).map_err(js_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_pdf(sizes: &[(i64, i64)]) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object};

        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let kids: Vec<Object> = sizes
            .iter()
            .map(|(w, h)| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(*w),
                        Object::Integer(*h),
                    ],
                })
                .into()
            })
            .collect();
        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    // ---- WasmCropEditor tests ----

    #[test]
    fn test_create_drag_produces_box() {
        let mut editor = WasmCropEditor::new(600.0, 1000.0);
        assert_eq!(editor.state(), "idle");

        let started = editor.pointer_down(100.0, 100.0);
        assert_eq!(started, Some(WasmBox::new(100.0, 100.0, 0.0, 0.0)));
        assert!(editor.is_dragging());
        assert_eq!(editor.state(), "creating");

        let moved = editor.pointer_move(50.0, 300.0);
        assert_eq!(moved, Some(WasmBox::new(50.0, 100.0, 50.0, 200.0)));

        let done = editor.pointer_up();
        assert_eq!(done, Some(WasmBox::new(50.0, 100.0, 50.0, 200.0)));
        assert!(!editor.is_dragging());
        assert_eq!(editor.state(), "selected");
    }

    #[test]
    fn test_tiny_drag_is_discarded() {
        let mut editor = WasmCropEditor::new(600.0, 1000.0);
        editor.pointer_down(10.0, 10.0);
        editor.pointer_move(12.0, 40.0);
        assert_eq!(editor.pointer_up(), None);
        assert_eq!(editor.state(), "idle");
    }

    #[test]
    fn test_cancel_ends_drag() {
        let mut editor = WasmCropEditor::new(600.0, 1000.0);
        editor.pointer_down(10.0, 10.0);
        editor.pointer_move(110.0, 110.0);
        let kept = editor.pointer_cancel();
        assert_eq!(kept, Some(WasmBox::new(10.0, 10.0, 100.0, 100.0)));
        assert!(!editor.is_dragging());
    }

    #[test]
    fn test_zoom_and_origin_map_pointer() {
        let mut editor = WasmCropEditor::new(600.0, 1000.0);
        editor.set_zoom(2.0).unwrap();
        editor.set_origin(20.0, 40.0);
        editor.pointer_down(220.0, 240.0);
        let b = editor.pointer_move(420.0, 440.0).unwrap();
        assert_eq!(b, WasmBox::new(100.0, 100.0, 100.0, 100.0));
        assert_eq!(editor.zoom(), 2.0);
    }

    #[test]
    fn test_resize_state_name() {
        let mut editor = WasmCropEditor::new(600.0, 1000.0);
        editor.set_box(&WasmBox::new(100.0, 100.0, 200.0, 200.0)).unwrap();
        // South-east corner.
        editor.pointer_down(300.0, 300.0);
        assert_eq!(editor.state(), "resizing-se");
        let b = editor.pointer_move(350.0, 320.0).unwrap();
        assert_eq!(b, WasmBox::new(100.0, 100.0, 250.0, 220.0));
    }

    #[test]
    fn test_set_box_clips_and_page_switch_clears() {
        let mut editor = WasmCropEditor::new(600.0, 1000.0);
        let placed = editor.set_box(&WasmBox::new(500.0, 900.0, 300.0, 300.0)).unwrap();
        assert_eq!(placed, WasmBox::new(500.0, 900.0, 100.0, 100.0));
        editor.set_page_size(300.0, 500.0);
        assert_eq!(editor.current(), None);
    }

    #[test]
    fn test_clear() {
        let mut editor = WasmCropEditor::new(600.0, 1000.0);
        editor.set_box(&WasmBox::new(0.0, 0.0, 50.0, 50.0)).unwrap();
        editor.clear();
        assert_eq!(editor.current(), None);
        assert_eq!(editor.state(), "idle");
    }

    // ---- WasmLabelDocument tests ----

    // Error path tests use the underlying Rust API because JsError::new()
    // cannot be called on non-wasm targets.

    #[test]
    fn test_open_invalid_data() {
        assert!(Document::open(b"not a valid pdf".as_slice()).is_err());
    }

    #[test]
    fn test_page_count_and_size() {
        let doc = WasmLabelDocument::open(&create_test_pdf(&[(595, 842), (612, 792)])).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.page_size(1).unwrap(), vec![612.0, 792.0]);
    }

    #[test]
    fn test_crop_current_page() {
        let doc = WasmLabelDocument::open(&create_test_pdf(&[(595, 842)])).unwrap();
        let out = doc
            .crop(&WasmBox::new(100.0, 50.0, 200.0, 300.0), 0, 800.0, 1000.0, false)
            .unwrap();
        let cropped = WasmLabelDocument::open(&out).unwrap();
        let size = cropped.page_size(0).unwrap();
        assert!((size[0] - 148.75).abs() < 1e-2);
        assert!((size[1] - 252.6).abs() < 1e-2);
    }

    #[test]
    fn test_split_label() {
        let doc = WasmLabelDocument::open(&create_test_pdf(&[(600, 1000)])).unwrap();
        let out = WasmLabelDocument::open(&doc.split_label(60.0).unwrap()).unwrap();
        assert_eq!(out.page_count(), 2);
        assert_eq!(out.page_size(0).unwrap(), vec![600.0, 600.0]);
        assert_eq!(out.page_size(1).unwrap(), vec![600.0, 400.0]);
    }

    #[test]
    fn test_split_label_fixed_defaults_to_meesho() {
        let doc = WasmLabelDocument::open(&create_test_pdf(&[(800, 1000)])).unwrap();
        let out = WasmLabelDocument::open(&doc.split_label_fixed(None, None, None).unwrap())
            .unwrap();
        assert_eq!(out.page_size(0).unwrap(), vec![800.0, 490.0]);
        assert_eq!(out.page_size(1).unwrap(), vec![800.0, 360.0]);
    }
}
