//! The rendering library as the converter sees it.
//!
//! A [`Rasterizer`] opens documents; a [`RasterDocument`] answers page
//! geometry and renders a page into a bitmap. Dropping the document releases
//! the underlying handle.

use std::path::Path;

use image::DynamicImage;

use crate::error::ConvertError;

/// PDF user space unit: 1/72 inch.
pub const POINTS_PER_INCH: f32 = 72.0;

pub trait Rasterizer {
    type Document<'a>: RasterDocument
    where
        Self: 'a;

    fn open(&self, path: &Path) -> Result<Self::Document<'_>, ConvertError>;
}

pub trait RasterDocument {
    fn page_count(&self) -> usize;

    /// Page size in points. Callers check `index` against `page_count` first.
    fn page_size(&self, index: usize) -> Result<PageSize, ConvertError>;

    /// Render page `index` to exactly `width` x `height` pixels.
    fn render(&self, index: usize, width: u32, height: u32)
        -> Result<DynamicImage, ConvertError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Pixel dimensions of `page` rasterized at `dpi`.
///
/// Each side is `points * dpi / 72`, rounded, and at least one pixel. Sides
/// larger than `i32::MAX` are rejected since pdfium takes signed targets.
pub fn target_size(page: PageSize, dpi: u32, index: usize) -> Result<(u32, u32), ConvertError> {
    if dpi == 0 {
        return Err(ConvertError::render(index, "dpi must be positive"));
    }
    let scale = f64::from(dpi) / f64::from(POINTS_PER_INCH);
    let side = |points: f32| -> Result<u32, ConvertError> {
        if !points.is_finite() || points <= 0.0 {
            return Err(ConvertError::render(
                index,
                format!("invalid page dimension {points}pt"),
            ));
        }
        let px = (f64::from(points) * scale).round().max(1.0);
        if px > f64::from(i32::MAX) {
            return Err(ConvertError::render(
                index,
                format!("{px} pixels exceeds the renderer limit"),
            ));
        }
        Ok(px as u32)
    };
    Ok((side(page.width)?, side(page.height)?))
}
