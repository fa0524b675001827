use std::path::Path;

use labelcrop::{CropError, GeometryRenderer, RenderOptions, Workspace};

/// Read a PDF file into a fresh workspace with user-friendly error messages.
///
/// Returns `Err(1)` with a message printed to stderr if the file is not
/// found, is not a PDF, or cannot be opened.
pub fn open_workspace(file: &Path, scale: f64) -> Result<Workspace, i32> {
    open_workspace_with(file, GeometryRenderer::new(RenderOptions { scale }))
}

pub fn open_workspace_with(
    file: &Path,
    renderer: GeometryRenderer,
) -> Result<Workspace, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }
    if !scale_is_valid(renderer.options().scale) {
        eprintln!("Error: --scale must be a positive number");
        return Err(1);
    }

    let bytes = std::fs::read(file).map_err(|e| {
        eprintln!("Error: failed to read {}: {e}", file.display());
        1
    })?;

    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut ws = Workspace::new(renderer);
    match ws.load(&file_name, bytes) {
        Ok(true) => Ok(ws),
        Ok(false) => {
            eprintln!("Error: not a PDF file: {}", file.display());
            Err(1)
        }
        Err(e) => {
            eprintln!("Error: failed to open PDF: {e}");
            Err(1)
        }
    }
}

fn scale_is_valid(scale: f64) -> bool {
    scale.is_finite() && scale > 0.0
}

/// Convert a 1-indexed page option into a 0-indexed page index.
pub fn page_index(page: usize, page_count: usize) -> Result<usize, i32> {
    if page == 0 {
        eprintln!("Error: page 0 is invalid (pages start at 1)");
        return Err(1);
    }
    if page > page_count {
        eprintln!("Error: page {page} exceeds document page count ({page_count})");
        return Err(1);
    }
    Ok(page - 1)
}

/// Print an operation failure and map it to the exit code.
pub fn fail(action: &str, err: CropError) -> i32 {
    eprintln!("Error: {action} failed: {err}");
    1
}

/// Write the resulting PDF.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<(), i32> {
    std::fs::write(path, bytes).map_err(|e| {
        eprintln!("Error: failed to write {}: {e}", path.display());
        1
    })?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote output");
    Ok(())
}
