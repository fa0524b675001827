//! Shared test utilities: lopdf-built PDF fixtures and a scripted detector.

#![allow(dead_code)]

use labelcrop::{BoxDetector, PageImage, PercentRect};
use lopdf::{Object, Stream, dictionary};

/// Build a PDF with one page per `(width, height)` in points.
///
/// Each page carries a small content stream naming its page number so a
/// composed document can be told apart from its source.
pub fn pdf_with_pages(sizes: &[(i64, i64)]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut page_ids = Vec::new();
    for (i, (w, h)) in sizes.iter().enumerate() {
        let content = format!("BT /F1 12 Tf 20 20 Td (Page {}) Tj ET", i + 1);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_dict = dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(*w),
                Object::Integer(*h),
            ],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => Object::Reference(font_id),
                },
            },
        };
        page_ids.push(doc.add_object(page_dict));
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(sizes.len() as i64),
    });

    for &pid in &page_ids {
        if let Ok(obj) = doc.get_object_mut(pid) {
            if let Ok(dict) = obj.as_dict_mut() {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Raw `[x0, y0, x1, y1]` of a page's box entry in the output PDF.
pub fn page_box_entry(bytes: &[u8], index: usize, key: &[u8]) -> Option<[f64; 4]> {
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    let page_id = *doc.get_pages().values().nth(index)?;
    let dict = doc.get_object(page_id).ok()?.as_dict().ok()?;
    let array = dict.get(key).ok()?.as_array().ok()?;
    let mut out = [0.0; 4];
    for (slot, obj) in out.iter_mut().zip(array) {
        *slot = match obj {
            Object::Integer(i) => *i as f64,
            Object::Real(r) => *r as f64,
            _ => return None,
        };
    }
    Some(out)
}

/// The page label drawn into a page's content stream ("Page N").
pub fn page_label(bytes: &[u8], index: usize) -> String {
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    let page_id = *doc.get_pages().values().nth(index).unwrap();
    let content = doc.get_page_content(page_id).unwrap();
    let text = String::from_utf8_lossy(&content);
    let start = text.find("(Page ").unwrap() + 1;
    let end = start + text[start..].find(')').unwrap();
    text[start..end].to_string()
}

pub fn assert_approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-2,
        "expected {expected}, got {actual}"
    );
}

pub fn assert_box_approx(actual: [f64; 4], expected: [f64; 4]) {
    for (a, e) in actual.iter().zip(expected) {
        assert!(
            (a - e).abs() < 1e-2,
            "expected {expected:?}, got {actual:?}"
        );
    }
}

/// Detector returning canned answers.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDetector {
    pub rect: Option<PercentRect>,
    pub anchor: Option<f64>,
}

impl BoxDetector for ScriptedDetector {
    fn detect_box(&self, _image: &PageImage) -> Option<PercentRect> {
        self.rect
    }

    fn detect_split(&self, _image: &PageImage) -> Option<f64> {
        self.anchor
    }
}

/// A placeholder image, one per page.
pub fn page_images(count: usize) -> Vec<Option<PageImage>> {
    (0..count)
        .map(|_| Some(PageImage::png(b"\x89PNG\r\n\x1a\n".to_vec())))
        .collect()
}
