use std::path::Path;

use labelcrop::{
    CropScope, GeometryRenderer, OllamaConfig, OllamaDetector, PageImage, RenderOptions,
};

use crate::shared::{fail, open_workspace, open_workspace_with, page_index, write_output};

#[allow(clippy::too_many_arguments)]
pub fn run(
    file: &Path,
    image: &Path,
    page: usize,
    split: bool,
    output: Option<&Path>,
    ollama_host: &str,
    model: &str,
    scale: f64,
) -> Result<(), i32> {
    let image_bytes = std::fs::read(image).map_err(|e| {
        eprintln!("Error: failed to read image {}: {e}", image.display());
        1
    })?;
    let mime = match image.extension().and_then(|e| e.to_str()) {
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => "image/png",
    };
    let page_image = PageImage {
        mime: mime.to_string(),
        bytes: image_bytes,
    };

    // Validate --page against the document before sizing the image list.
    let page_count = open_workspace(file, scale)?.pages().len();
    let index = page_index(page, page_count)?;
    if split && index != 0 {
        eprintln!("Error: split detection works on page 1");
        return Err(1);
    }

    let mut images = vec![None; index];
    images.push(Some(page_image));
    let renderer = GeometryRenderer::new(RenderOptions { scale }).with_images(images);
    let ws = open_workspace_with(file, renderer)?;

    let detector = OllamaDetector::new(OllamaConfig {
        base_url: ollama_host.to_string(),
        model: model.to_string(),
        ..OllamaConfig::default()
    })
    .map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    let mut ws = ws.with_detector(detector);
    ws.set_current_page(index)
        .map_err(|e| fail("page selection", e))?;

    if split {
        match output {
            Some(out) => {
                let bytes = ws.ai_split().map_err(|e| fail("split detection", e))?;
                write_output(out, &bytes)?;
                eprintln!("Split page 1 at the detected line -> {}", out.display());
            }
            None => {
                let anchor = ws
                    .detect_split()
                    .map_err(|e| fail("split detection", e))?;
                println!("{anchor:.2}");
            }
        }
        return Ok(());
    }

    let crop = ws.detect_box().map_err(|e| fail("box detection", e))?;
    println!(
        "{:.2},{:.2},{:.2},{:.2}",
        crop.x, crop.y, crop.width, crop.height
    );
    if let Some(out) = output {
        let bytes = ws
            .crop(crop, CropScope::Current)
            .map_err(|e| fail("crop", e))?;
        write_output(out, &bytes)?;
        eprintln!("Cropped page {page} -> {}", out.display());
    }
    Ok(())
}
