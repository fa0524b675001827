//! lopdf-based mutation backend.
//!
//! Implements [`PdfMutator`] using the [lopdf](https://crates.io/crates/lopdf)
//! crate. Page boxes are read with page-tree inheritance; composed documents
//! get a flat page tree whose pages carry their inherited attributes
//! explicitly.

use std::collections::BTreeMap;

use labelcrop_core::{CropError, PdfRect, Point, Size};
use lopdf::{Dictionary, Object, ObjectId};

use crate::backend::{PageBox, PagePlan, PdfMutator};
use crate::error::BackendError;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// A parsed PDF document backed by lopdf.
#[derive(Clone)]
pub struct LopdfDocument {
    inner: lopdf::Document,
    /// Ordered page ObjectIds (indexed by 0-based page number).
    page_ids: Vec<ObjectId>,
}

impl LopdfDocument {
    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &lopdf::Document {
        &self.inner
    }

    fn from_inner(inner: lopdf::Document) -> Self {
        let page_ids = inner.get_pages().values().copied().collect();
        Self { inner, page_ids }
    }

    fn page_id(&self, index: usize) -> Result<ObjectId, BackendError> {
        self.page_ids
            .get(index)
            .copied()
            .ok_or(BackendError::PageOutOfRange {
                index,
                page_count: self.page_ids.len(),
            })
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// The lopdf-based mutation backend.
///
/// # Example
///
/// ```ignore
/// use labelcrop_pdf::{LopdfBackend, PdfMutator};
///
/// let mut doc = LopdfBackend::open(&bytes)?;
/// LopdfBackend::set_page_box(&mut doc, 0, &PdfRect::new(0.0, 0.0, 300.0, 400.0))?;
/// let out = LopdfBackend::save(&mut doc)?;
/// ```
pub struct LopdfBackend;

/// Follow a reference to its target object; other objects pass through.
fn resolve<'a>(doc: &'a lopdf::Document, obj: &'a Object) -> Result<&'a Object, BackendError> {
    match obj {
        Object::Reference(id) => doc
            .get_object(*id)
            .map_err(|e| BackendError::Parse(format!("broken reference {id:?}: {e}"))),
        other => Ok(other),
    }
}

/// Convert a lopdf numeric object (Integer or Real) to f64.
fn object_to_f64(doc: &lopdf::Document, obj: &Object) -> Result<f64, BackendError> {
    match resolve(doc, obj)? {
        Object::Integer(i) => Ok(*i as f64),
        Object::Real(f) => Ok(*f as f64),
        other => Err(BackendError::Parse(format!("expected number, got {other:?}"))),
    }
}

/// Read a `[x0 y0 x1 y1]` box array, normalized so that x0 <= x1, y0 <= y1.
fn read_box(doc: &lopdf::Document, obj: &Object) -> Result<[f64; 4], BackendError> {
    let array = resolve(doc, obj)?
        .as_array()
        .map_err(|e| BackendError::Parse(format!("page box is not an array: {e}")))?;
    if array.len() != 4 {
        return Err(BackendError::Parse(format!(
            "expected 4-element array for box, got {}",
            array.len()
        )));
    }
    let a = object_to_f64(doc, &array[0])?;
    let b = object_to_f64(doc, &array[1])?;
    let c = object_to_f64(doc, &array[2])?;
    let d = object_to_f64(doc, &array[3])?;
    Ok([a.min(c), b.min(d), a.max(c), b.max(d)])
}

/// Whole-number coordinates are written as integers so they stay exact.
fn box_object(values: [f64; 4]) -> Object {
    Object::Array(
        values
            .iter()
            .map(|&v| {
                if v.fract() == 0.0 && v.abs() < i32::MAX as f64 {
                    Object::Integer(v as i64)
                } else {
                    Object::Real(v as f32)
                }
            })
            .collect(),
    )
}

/// Rewrite every reference found in `renamed` to its new target.
fn remap_references(obj: &mut Object, renamed: &BTreeMap<ObjectId, ObjectId>) {
    match obj {
        Object::Reference(id) => {
            if let Some(new_id) = renamed.get(id) {
                *id = *new_id;
            }
        }
        Object::Array(items) => {
            for item in items {
                remap_references(item, renamed);
            }
        }
        Object::Dictionary(dict) => remap_dict_references(dict, renamed),
        Object::Stream(stream) => remap_dict_references(&mut stream.dict, renamed),
        _ => {}
    }
}

fn remap_dict_references(dict: &mut Dictionary, renamed: &BTreeMap<ObjectId, ObjectId>) {
    for (_, value) in dict.iter_mut() {
        remap_references(value, renamed);
    }
}

/// Give a duplicated page its own copies of its annotations.
///
/// An annotation belongs to exactly one page, so each copy gets fresh
/// objects whose `/P` points at `page_id`. References between annotations
/// of the page (`/Popup`, `/Parent`, `/IRT`) are pointed at the copies.
fn copy_annotations(
    src: &lopdf::Document,
    out: &mut lopdf::Document,
    page: &mut Dictionary,
    page_id: ObjectId,
) -> Result<(), BackendError> {
    let annots = match page.get(b"Annots") {
        Ok(obj) => resolve(src, obj)?
            .as_array()
            .map_err(|e| BackendError::Parse(format!("/Annots is not an array: {e}")))?
            .clone(),
        Err(_) => return Ok(()),
    };

    let mut renamed = BTreeMap::new();
    let mut copies = Vec::with_capacity(annots.len());
    for annot in &annots {
        match annot {
            Object::Reference(old_id) => {
                let new_id = out.new_object_id();
                renamed.insert(*old_id, new_id);
                copies.push(Object::Reference(new_id));
            }
            inline => copies.push(inline.clone()),
        }
    }

    for (old_id, new_id) in &renamed {
        let mut annot = src
            .get_object(*old_id)
            .map_err(|e| BackendError::Parse(format!("failed to get annotation: {e}")))?
            .clone();
        remap_references(&mut annot, &renamed);
        if let Object::Dictionary(dict) = &mut annot {
            dict.set("P", Object::Reference(page_id));
        }
        out.objects.insert(*new_id, annot);
    }
    for annot in &mut copies {
        if let Object::Dictionary(dict) = annot {
            remap_dict_references(dict, &renamed);
            dict.set("P", Object::Reference(page_id));
        }
    }

    page.set("Annots", Object::Array(copies));
    Ok(())
}

fn page_dict(doc: &lopdf::Document, id: ObjectId) -> Result<&Dictionary, BackendError> {
    doc.get_object(id)
        .and_then(|o| o.as_dict())
        .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))
}

/// Look up a key in the page dictionary, walking up the page tree (via
/// /Parent) if the key is not found on the page itself.
fn resolve_inherited<'a>(
    doc: &'a lopdf::Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, BackendError> {
    let mut current_id = page_id;
    // Bounded walk: a malformed /Parent cycle must not hang.
    for _ in 0..64 {
        let dict = page_dict(doc, current_id)?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }
        match dict.get(b"Parent") {
            Ok(parent) => {
                current_id = parent
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
    Err(BackendError::PageTree("page tree is too deep or cyclic".into()))
}

fn read_page_box(doc: &lopdf::Document, page_id: ObjectId) -> Result<PageBox, BackendError> {
    let media_obj = resolve_inherited(doc, page_id, b"MediaBox")?
        .ok_or_else(|| BackendError::Parse("MediaBox not found on page or ancestors".into()))?;
    let media = read_box(doc, media_obj)?;

    let visible = match resolve_inherited(doc, page_id, b"CropBox")? {
        Some(obj) => {
            let crop = read_box(doc, obj)?;
            [
                crop[0].max(media[0]),
                crop[1].max(media[1]),
                crop[2].min(media[2]),
                crop[3].min(media[3]),
            ]
        }
        None => media,
    };

    let size = Size::new(visible[2] - visible[0], visible[3] - visible[1]);
    if !size.is_usable() {
        return Err(BackendError::Geometry(format!(
            "page box {visible:?} has no area"
        )));
    }
    Ok(PageBox {
        origin: Point::new(visible[0], visible[1]),
        size,
    })
}

fn validate_rect(rect: &PdfRect) -> Result<(), BackendError> {
    let values = [rect.x, rect.y, rect.width, rect.height];
    if values.iter().any(|v| !v.is_finite()) || rect.width <= 0.0 || rect.height <= 0.0 {
        return Err(BackendError::Geometry(format!(
            "target rectangle {rect:?} is empty or not finite"
        )));
    }
    Ok(())
}

fn apply_box(dict: &mut Dictionary, origin: Point, rect: &PdfRect) {
    let values = rect.to_box_array(origin);
    dict.set("MediaBox", box_object(values));
    dict.set("CropBox", box_object(values));
}

/// Reference to the root /Pages node of the document catalog.
fn pages_root_id(doc: &lopdf::Document) -> Result<ObjectId, BackendError> {
    let root = doc
        .trailer
        .get(b"Root")
        .and_then(|o| o.as_reference())
        .map_err(|e| BackendError::PageTree(format!("trailer has no /Root: {e}")))?;
    doc.get_object(root)
        .and_then(|o| o.as_dict())
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(|o| o.as_reference())
        .map_err(|e| BackendError::PageTree(format!("catalog has no /Pages: {e}")))
}

impl PdfMutator for LopdfBackend {
    type Document = LopdfDocument;
    type Error = BackendError;

    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error> {
        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

        if inner.is_encrypted() {
            return Err(BackendError::Core(CropError::Encrypted));
        }

        let doc = LopdfDocument::from_inner(inner);
        #[cfg(feature = "tracing")]
        tracing::debug!(pages = doc.page_ids.len(), "opened PDF");
        Ok(doc)
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.page_ids.len()
    }

    fn page_box(doc: &Self::Document, index: usize) -> Result<PageBox, Self::Error> {
        let page_id = doc.page_id(index)?;
        read_page_box(&doc.inner, page_id)
    }

    fn set_page_box(
        doc: &mut Self::Document,
        index: usize,
        rect: &PdfRect,
    ) -> Result<(), Self::Error> {
        validate_rect(rect)?;
        let page_id = doc.page_id(index)?;
        let page_box = read_page_box(&doc.inner, page_id)?;

        let dict = doc
            .inner
            .get_object_mut(page_id)
            .and_then(|o| o.as_dict_mut())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;
        apply_box(dict, page_box.origin, rect);

        #[cfg(feature = "tracing")]
        tracing::debug!(page = index, ?rect, "set page box");
        Ok(())
    }

    fn compose(doc: &Self::Document, plan: &[PagePlan]) -> Result<Self::Document, Self::Error> {
        if plan.is_empty() {
            return Err(BackendError::PageTree("composed document has no pages".into()));
        }

        let mut out = doc.inner.clone();
        let root_id = pages_root_id(&out)?;

        let mut kids = Vec::with_capacity(plan.len());
        // First copy of each source page, for references from outside the page tree.
        let mut first_copy = BTreeMap::new();
        for entry in plan {
            let source_id = doc.page_id(entry.source)?;
            let mut dict = page_dict(&doc.inner, source_id)?.clone();

            for key in INHERITABLE_KEYS {
                if !dict.has(key) {
                    if let Some(value) = resolve_inherited(&doc.inner, source_id, key)? {
                        dict.set(key.to_vec(), value.clone());
                    }
                }
            }
            dict.set("Parent", Object::Reference(root_id));

            if let Some(rect) = &entry.rect {
                validate_rect(rect)?;
                let page_box = read_page_box(&doc.inner, source_id)?;
                apply_box(&mut dict, page_box.origin, rect);
            }

            let page_id = out.new_object_id();
            copy_annotations(&doc.inner, &mut out, &mut dict, page_id)?;
            out.objects.insert(page_id, Object::Dictionary(dict));
            first_copy.entry(source_id).or_insert(page_id);
            kids.push(Object::Reference(page_id));
        }

        // Link destinations, outlines, and leftover /P entries elsewhere in
        // the file would otherwise keep the source pages alive.
        for obj in out.objects.values_mut() {
            remap_references(obj, &first_copy);
        }

        let count = kids.len() as i64;
        let root = out
            .get_object_mut(root_id)
            .and_then(|o| o.as_dict_mut())
            .map_err(|e| BackendError::PageTree(format!("invalid /Pages node: {e}")))?;
        root.set("Kids", Object::Array(kids));
        root.set("Count", Object::Integer(count));

        // Original page objects and intermediate page-tree nodes are now unreachable.
        out.prune_objects();

        let composed = LopdfDocument::from_inner(out);
        #[cfg(feature = "tracing")]
        tracing::debug!(pages = composed.page_ids.len(), "composed document");
        Ok(composed)
    }

    fn save(doc: &mut Self::Document) -> Result<Vec<u8>, Self::Error> {
        let mut buf = Vec::new();
        doc.inner
            .save_to(&mut buf)
            .map_err(|e| BackendError::Write(e.to_string()))?;
        Ok(buf)
    }
}
