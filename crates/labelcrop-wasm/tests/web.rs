//! Browser-side tests for the error paths, which need a real JS engine.
//!
//! Run with `wasm-pack test --headless --firefox crates/labelcrop-wasm`.

#![cfg(target_arch = "wasm32")]

use labelcrop_wasm::{WasmBox, WasmCropEditor, WasmLabelDocument};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn open_rejects_garbage() {
    assert!(WasmLabelDocument::open(b"not a pdf").is_err());
}

#[wasm_bindgen_test]
fn zero_zoom_is_rejected() {
    let mut editor = WasmCropEditor::new(600.0, 1000.0);
    assert!(editor.set_zoom(0.0).is_err());
    assert_eq!(editor.zoom(), 1.0);
}

#[wasm_bindgen_test]
fn tiny_box_is_rejected() {
    let mut editor = WasmCropEditor::new(600.0, 1000.0);
    assert!(editor.set_box(&WasmBox::new(10.0, 10.0, 2.0, 2.0)).is_err());
    assert_eq!(editor.state(), "idle");
}
