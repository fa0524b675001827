use std::path::Path;

use crate::cli::OutputFormat;
use crate::shared::open_workspace;

pub fn run(file: &Path, format: &OutputFormat, scale: f64) -> Result<(), i32> {
    let ws = open_workspace(file, scale)?;
    let Some(doc) = ws.document() else {
        return Err(1);
    };

    let mut page_infos = Vec::with_capacity(doc.page_count());
    for rendered in ws.pages() {
        let page_box = doc.page_box(rendered.index).map_err(|e| {
            eprintln!("Error reading page {}: {e}", rendered.index + 1);
            1
        })?;

        match format {
            OutputFormat::Text => {
                println!("Page {}:", rendered.index + 1);
                println!(
                    "  Size: {:.2} x {:.2} pt",
                    page_box.size.width, page_box.size.height
                );
                if page_box.origin.x != 0.0 || page_box.origin.y != 0.0 {
                    println!(
                        "  Origin: {:.2}, {:.2}",
                        page_box.origin.x, page_box.origin.y
                    );
                }
                println!(
                    "  Viewport: {:.0} x {:.0} px",
                    rendered.width_px, rendered.height_px
                );
            }
            OutputFormat::Json => {
                page_infos.push(serde_json::json!({
                    "page": rendered.index + 1,
                    "width": page_box.size.width,
                    "height": page_box.size.height,
                    "origin": [page_box.origin.x, page_box.origin.y],
                    "viewport": [rendered.width_px, rendered.height_px],
                }));
            }
        }
    }

    match format {
        OutputFormat::Text => {
            println!();
            println!("Pages: {}", doc.page_count());
            println!("Render scale: {scale}");
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "file": ws.file_name(),
                "page_count": doc.page_count(),
                "scale": scale,
                "pages": page_infos,
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
        }
    }

    Ok(())
}
