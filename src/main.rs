use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use pdf2jpg::config::Settings;
use pdf2jpg::converter::DEFAULT_DPI;
use pdf2jpg::pdfium::PdfiumRasterizer;
use pdf2jpg::{ConvertOptions, Converter};

const INPUT_PDF: &str = "szalay_holik_nguyen_morandini_madill_GVS_methods_poster_final_printed.pdf";
const OUTPUT_JPG: &str = "szalay_holik_nguyen_morandini_madill_GVS_methods_poster_final_printed.jpg";
const PAGE_INDEX: usize = 0;

/// Render the first page of the poster PDF to a 300 dpi JPEG.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (defaults to <config dir>/pdf2jpg/config.json)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory containing the pdfium shared library
    #[arg(long, value_name = "DIR")]
    pdfium_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let settings = Settings::discover(cli.config.as_deref()).context("failed to load settings")?;
    let pdfium_dir = cli.pdfium_dir.or(settings.pdfium_library_dir);

    let rasterizer = PdfiumRasterizer::bind(pdfium_dir.as_deref())?;
    let converter = Converter::new(rasterizer);

    let options = ConvertOptions {
        dpi: DEFAULT_DPI,
        page_index: PAGE_INDEX,
        jpeg_quality: settings.jpeg_quality,
    };

    converter
        .convert(Path::new(INPUT_PDF), Path::new(OUTPUT_JPG), &options)
        .with_context(|| format!("failed to convert {} to {}", INPUT_PDF, OUTPUT_JPG))?;

    println!("Converted page {} of {} to {}", PAGE_INDEX + 1, INPUT_PDF, OUTPUT_JPG);
    Ok(())
}
