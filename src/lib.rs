//! Rasterize one page of a PDF to a JPEG file.

pub mod config;
pub mod converter;
pub mod error;
pub mod pdfium;
pub mod raster;

pub use converter::{ConvertOptions, Converter};
pub use error::ConvertError;
