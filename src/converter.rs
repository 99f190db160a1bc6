//! Page to JPEG conversion.
//!
//! open → select page → render → save → release. Each step needs the one
//! before it; the first failure ends the conversion.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;

use crate::error::ConvertError;
use crate::raster::{RasterDocument, Rasterizer, target_size};

pub const DEFAULT_DPI: u32 = 300;
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    pub dpi: u32,
    pub page_index: usize,
    /// JPEG quality, 1..=100.
    pub jpeg_quality: u8,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            page_index: 0,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

pub struct Converter<R> {
    rasterizer: R,
}

impl<R: Rasterizer> Converter<R> {
    pub fn new(rasterizer: R) -> Self {
        Self { rasterizer }
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Render one page of `input` and write it to `output` as JPEG.
    ///
    /// `output` is replaced atomically: on any error an existing file there
    /// is left as it was.
    pub fn convert(
        &self,
        input: &Path,
        output: &Path,
        options: &ConvertOptions,
    ) -> Result<(), ConvertError> {
        let index = options.page_index;
        if options.dpi == 0 {
            return Err(ConvertError::render(index, "dpi must be positive"));
        }

        let document = OpenDocument::new(self.rasterizer.open(input)?, input);

        let page_count = document.page_count();
        if index >= page_count {
            return Err(ConvertError::PageIndex { index, page_count });
        }

        let page = document.page_size(index)?;
        let (width, height) = target_size(page, options.dpi, index)?;
        log::info!(
            "page {}: {}x{} pt -> {}x{} px ({} dpi)",
            index,
            page.width,
            page.height,
            width,
            height,
            options.dpi
        );

        let bitmap = document.render(index, width, height)?;
        save_jpeg(&bitmap, output, options.jpeg_quality)?;

        log::info!("wrote {:?}", output);
        Ok(())
    }
}

/// Scoped document handle; releases the document on every exit path.
struct OpenDocument<'p, D: RasterDocument> {
    inner: D,
    path: &'p Path,
}

impl<'p, D: RasterDocument> OpenDocument<'p, D> {
    fn new(inner: D, path: &'p Path) -> Self {
        log::debug!("opened {:?}", path);
        Self { inner, path }
    }
}

impl<D: RasterDocument> std::ops::Deref for OpenDocument<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        &self.inner
    }
}

impl<D: RasterDocument> Drop for OpenDocument<'_, D> {
    fn drop(&mut self) {
        log::debug!("releasing {:?}", self.path);
    }
}

/// Encode `bitmap` as baseline JPEG and move it into place at `output`.
///
/// JPEG has no alpha channel, so the bitmap is flattened to RGB first. When
/// `output` is a symlink the file it points at is replaced and the link is
/// kept. An existing file keeps its permissions; a new one gets the default
/// mode under the process umask.
pub fn save_jpeg(bitmap: &DynamicImage, output: &Path, quality: u8) -> Result<(), ConvertError> {
    let quality = quality.clamp(1, 100);
    let rgb = DynamicImage::ImageRgb8(bitmap.to_rgb8());

    let target = resolve_output(output).map_err(|e| ConvertError::write(output, e))?;
    let prior = fs::metadata(&target).ok().filter(|meta| meta.is_file());

    let dir = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".pdf2jpg-").suffix(".jpg.part");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let staged = builder
        .tempfile_in(dir)
        .map_err(|e| ConvertError::write(output, e))?;

    {
        let mut writer = BufWriter::new(staged.as_file());
        let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
        rgb.write_with_encoder(encoder)
            .map_err(|e| ConvertError::write(output, std::io::Error::other(e)))?;
        writer.flush().map_err(|e| ConvertError::write(output, e))?;
    }

    if let Some(meta) = prior {
        staged
            .as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| ConvertError::write(output, e))?;
    }

    staged
        .as_file()
        .sync_all()
        .map_err(|e| ConvertError::write(output, e))?;

    staged
        .persist(&target)
        .map_err(|e| ConvertError::write(output, e.error))?;

    Ok(())
}

/// Follow `output` through a symlink to the path that should be replaced.
/// A dangling link resolves to its (possibly not yet existing) target.
fn resolve_output(output: &Path) -> std::io::Result<PathBuf> {
    match fs::symlink_metadata(output) {
        Ok(meta) if meta.file_type().is_symlink() => match fs::canonicalize(output) {
            Ok(target) => Ok(target),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let link = fs::read_link(output)?;
                Ok(match output.parent() {
                    Some(parent) if link.is_relative() => parent.join(link),
                    _ => link,
                })
            }
            Err(e) => Err(e),
        },
        _ => Ok(output.to_path_buf()),
    }
}
