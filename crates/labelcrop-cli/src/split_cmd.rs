use std::path::Path;

use labelcrop::LabelDimensions;

use crate::cli::Preset;
use crate::shared::{fail, open_workspace, write_output};

/// Render scale is irrelevant to splits; they work in page points.
const SPLIT_SCALE: f64 = 1.0;

pub fn run_anchor(file: &Path, output: &Path, anchor: f64) -> Result<(), i32> {
    let mut ws = open_workspace(file, SPLIT_SCALE)?;
    let bytes = ws.split_label(anchor).map_err(|e| fail("split", e))?;
    write_output(output, &bytes)?;
    eprintln!("Split page 1 at {anchor}% -> {}", output.display());
    Ok(())
}

pub fn run_fixed(
    file: &Path,
    output: &Path,
    preset: &Preset,
    label_height: Option<f64>,
    invoice_height: Option<f64>,
    view_width: Option<f64>,
) -> Result<(), i32> {
    let Some(base) = LabelDimensions::preset(preset.name()) else {
        eprintln!("Error: unknown preset '{}'", preset.name());
        return Err(1);
    };
    let dims = LabelDimensions {
        label_height: label_height.unwrap_or(base.label_height),
        invoice_height: invoice_height.unwrap_or(base.invoice_height),
        view_width: view_width.unwrap_or(base.view_width),
    };

    let mut ws = open_workspace(file, SPLIT_SCALE)?;
    let bytes = ws
        .split_label_fixed(&dims)
        .map_err(|e| fail("fixed split", e))?;
    write_output(output, &bytes)?;
    eprintln!(
        "Split page 1 into {} + {} px bands -> {}",
        dims.label_height,
        dims.invoice_height,
        output.display()
    );
    Ok(())
}
