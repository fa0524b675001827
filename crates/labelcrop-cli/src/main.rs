mod box_arg;
mod cli;
mod crop_cmd;
#[cfg(feature = "ollama")]
mod detect_cmd;
mod info_cmd;
mod shared;
mod split_cmd;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        cli::Commands::Info {
            ref file,
            ref format,
            scale,
        } => info_cmd::run(file, format, scale),
        cli::Commands::Crop {
            ref file,
            ref output,
            crop,
            page,
            all,
            scale,
        } => crop_cmd::run(file, output, crop, page, all, scale),
        cli::Commands::Split {
            ref file,
            ref output,
            anchor,
        } => split_cmd::run_anchor(file, output, anchor),
        cli::Commands::SplitFixed {
            ref file,
            ref output,
            ref preset,
            label_height,
            invoice_height,
            view_width,
        } => split_cmd::run_fixed(
            file,
            output,
            preset,
            label_height,
            invoice_height,
            view_width,
        ),
        #[cfg(feature = "ollama")]
        cli::Commands::Detect {
            ref file,
            ref image,
            page,
            split,
            ref output,
            ref ollama_host,
            ref model,
            scale,
        } => detect_cmd::run(
            file,
            image,
            page,
            split,
            output.as_deref(),
            ollama_host,
            model,
            scale,
        ),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    // RUST_LOG wins; otherwise only warnings unless -v was given.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "labelcrop=debug,labelcrop_pdf=debug"
        } else {
            "labelcrop=warn"
        })
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}
