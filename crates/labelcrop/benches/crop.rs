//! Performance benchmarks for labelcrop.
//!
//! Benchmarks cover the output pipeline: mapping a box and rewriting page
//! boxes (crop) and composing a new page tree (split), on two document sizes:
//! - Label: 1-page shipping label
//! - Batch: 50-page order batch

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use labelcrop::{
    CropBox, CropScope, Document, GeometryRenderer, LabelDimensions, RenderOptions, Workspace,
};
use lopdf::{Object, Stream, dictionary};

// ---------------------------------------------------------------------------
// PDF fixture generators
// ---------------------------------------------------------------------------

/// Build a PDF with `pages` pages of 790x1100 pt, each with a little text.
fn build_pdf(pages: usize) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(790),
        Object::Integer(1100),
    ];

    let mut page_ids = Vec::new();
    for i in 0..pages {
        let content = format!(
            "BT\n/F1 12 Tf\n72 1000 Td\n(Order {} - Ship To) Tj\n0 -500 Td\n(Tax Invoice) Tj\nET\n",
            i + 1
        );
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        page_ids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => media_box.clone(),
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => Object::Reference(font_id) },
            },
        }));
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(pages as i64),
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

fn workspace(bytes: &[u8]) -> Workspace {
    let mut ws = Workspace::new(GeometryRenderer::new(RenderOptions::default()));
    ws.load("bench.pdf", bytes.to_vec()).unwrap();
    ws
}

fn bench_crop(c: &mut Criterion) {
    let label = build_pdf(1);
    let batch = build_pdf(50);
    let crop = CropBox::new(40.0, 40.0, 1000.0, 700.0);

    let mut group = c.benchmark_group("crop");

    group.bench_function("label_current", |b| {
        let mut ws = workspace(&label);
        b.iter(|| black_box(ws.crop(crop, CropScope::Current).unwrap().len()));
    });

    group.bench_function("batch_all", |b| {
        let mut ws = workspace(&batch);
        b.iter(|| black_box(ws.crop(crop, CropScope::All).unwrap().len()));
    });

    group.finish();
}

fn bench_split(c: &mut Criterion) {
    let label = build_pdf(1);
    let batch = build_pdf(50);

    let mut group = c.benchmark_group("split");

    group.bench_function("label_fixed_meesho", |b| {
        let doc = Document::open(label.clone()).unwrap();
        b.iter(|| black_box(doc.split_fixed(&LabelDimensions::MEESHO).unwrap().len()));
    });

    group.bench_function("batch_anchor", |b| {
        let doc = Document::open(batch.clone()).unwrap();
        b.iter(|| black_box(doc.split_at_anchor(55.0).unwrap().len()));
    });

    group.finish();
}

fn bench_open(c: &mut Criterion) {
    let batch = build_pdf(50);
    c.bench_function("open_batch", |b| {
        b.iter(|| black_box(Document::open(batch.as_slice()).unwrap().page_count()));
    });
}

criterion_group!(benches, bench_crop, bench_split, bench_open);
criterion_main!(benches);
