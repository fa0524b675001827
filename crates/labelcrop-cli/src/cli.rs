use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use labelcrop::CropBox;

use crate::box_arg::parse_box;

/// Crop PDF pages and split shipping labels from tax invoices.
#[derive(Debug, Parser)]
#[command(name = "labelcrop", about, version)]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show page sizes and rendered viewport sizes
    Info {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Render scale (pixels per point) for viewport sizes
        #[arg(long, default_value_t = 1.5)]
        scale: f64,
    },

    /// Crop pages to a box drawn on a rendered page
    Crop {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Where to write the cropped PDF
        #[arg(short, long, value_name = "OUT")]
        output: PathBuf,

        /// Box as 'x,y,width,height' in pixels of the rendered page (top-left origin)
        #[arg(long = "box", value_name = "X,Y,W,H", value_parser = parse_box)]
        crop: CropBox,

        /// Page the box was drawn on (1-indexed)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Apply the box to every page instead of only --page
        #[arg(long)]
        all: bool,

        /// Render scale (pixels per point) the box was measured at
        #[arg(long, default_value_t = 1.5)]
        scale: f64,
    },

    /// Split page 1 into a label page and an invoice page at a percentage
    Split {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Where to write the split PDF
        #[arg(short, long, value_name = "OUT")]
        output: PathBuf,

        /// Split line position in percent of page height from the top
        #[arg(long, value_name = "PCT")]
        anchor: f64,
    },

    /// Split page 1 using fixed label and invoice heights
    SplitFixed {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Where to write the split PDF
        #[arg(short, long, value_name = "OUT")]
        output: PathBuf,

        /// Portal preset
        #[arg(long, value_enum, default_value_t = Preset::Meesho)]
        preset: Preset,

        /// Label height in reference pixels (overrides the preset)
        #[arg(long)]
        label_height: Option<f64>,

        /// Invoice height in reference pixels (overrides the preset)
        #[arg(long)]
        invoice_height: Option<f64>,

        /// Reference viewport width in pixels (overrides the preset)
        #[arg(long)]
        view_width: Option<f64>,
    },

    /// Ask an Ollama vision model for a crop box or split line
    #[cfg(feature = "ollama")]
    Detect {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Rendered image of the page
        #[arg(long, value_name = "PNG")]
        image: PathBuf,

        /// Page the image shows (1-indexed)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Detect the label/invoice split line instead of a crop box
        #[arg(long)]
        split: bool,

        /// Apply the detection and write the result here
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,

        /// Ollama server URL
        #[arg(long, env = "OLLAMA_HOST", default_value = "http://localhost:11434")]
        ollama_host: String,

        /// Vision model name
        #[arg(long, env = "LABELCROP_MODEL", default_value = "llava")]
        model: String,

        /// Render scale (pixels per point) of the image
        #[arg(long, default_value_t = 1.5)]
        scale: f64,
    },
}

/// Output format for `info`.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Fixed-split presets.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Preset {
    Meesho,
}

impl Preset {
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Meesho => "meesho",
        }
    }
}
