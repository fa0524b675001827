use std::path::Path;

use labelcrop::{CropBox, CropScope};

use crate::shared::{fail, open_workspace, page_index, write_output};

pub fn run(
    file: &Path,
    output: &Path,
    crop: CropBox,
    page: usize,
    all: bool,
    scale: f64,
) -> Result<(), i32> {
    let mut ws = open_workspace(file, scale)?;
    let index = page_index(page, ws.pages().len())?;
    ws.set_current_page(index).map_err(|e| fail("page selection", e))?;

    let viewport = ws.pages()[index].viewport();
    if !crop.fits_within(viewport) {
        tracing::warn!(
            ?crop,
            width = viewport.width,
            height = viewport.height,
            "box extends past the rendered page; clipping"
        );
    }

    let scope = if all { CropScope::All } else { CropScope::Current };
    let bytes = ws.crop(crop, scope).map_err(|e| fail("crop", e))?;
    write_output(output, &bytes)?;

    let pages = if all {
        format!("{} pages", ws.pages().len())
    } else {
        format!("page {page}")
    };
    eprintln!("Cropped {pages} -> {}", output.display());
    Ok(())
}
