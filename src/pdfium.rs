//! pdfium-render backed [`Rasterizer`].

use std::path::{Path, PathBuf};

use image::DynamicImage;
use pdfium_render::prelude::*;

use crate::error::{BindError, ConvertError};
use crate::raster::{PageSize, RasterDocument, Rasterizer};

/// Environment variable naming a directory that holds the pdfium library.
pub const PDFIUM_DIR_ENV: &str = "PDFIUM_DYNAMIC_LIB_PATH";

/// Directories probed for the pdfium shared library, in order.
pub fn library_search_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(dir) = explicit {
        paths.push(dir.to_path_buf());
    }

    if let Some(dir) = std::env::var_os(PDFIUM_DIR_ENV) {
        paths.push(PathBuf::from(dir));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            paths.push(exe_dir.join("libs"));
            paths.push(exe_dir.to_path_buf());
        }
    }

    paths.push(PathBuf::from("./lib"));
    paths.push(PathBuf::from("./"));

    paths
}

pub struct PdfiumRasterizer {
    pdfium: Pdfium,
}

impl PdfiumRasterizer {
    /// Bind to the first pdfium library found on the search path, falling
    /// back to the system library.
    pub fn bind(explicit_dir: Option<&Path>) -> Result<Self, BindError> {
        let searched = library_search_paths(explicit_dir);

        for dir in &searched {
            let lib_path = Pdfium::pdfium_platform_library_name_at_path(dir);
            log::debug!("trying pdfium at {:?}", lib_path);

            if let Ok(bindings) = Pdfium::bind_to_library(&lib_path) {
                log::info!("bound pdfium from {:?}", lib_path);
                return Ok(Self::new(Pdfium::new(bindings)));
            }
        }

        log::debug!("trying system pdfium library");
        match Pdfium::bind_to_system_library() {
            Ok(bindings) => {
                log::info!("bound system pdfium library");
                Ok(Self::new(Pdfium::new(bindings)))
            }
            Err(e) => Err(BindError {
                searched,
                reason: e.to_string(),
            }),
        }
    }

    pub fn new(pdfium: Pdfium) -> Self {
        Self { pdfium }
    }
}

impl Rasterizer for PdfiumRasterizer {
    type Document<'a> = PdfiumDocument<'a>;

    fn open(&self, path: &Path) -> Result<PdfiumDocument<'_>, ConvertError> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| ConvertError::DocumentOpen {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(PdfiumDocument { document })
    }
}

/// An open pdfium document. `PdfDocument`'s drop closes the handle.
pub struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl PdfiumDocument<'_> {
    fn page(&self, index: usize) -> Result<PdfPage<'_>, ConvertError> {
        let page_count = self.page_count();
        let page_index = PdfPageIndex::try_from(index)
            .map_err(|_| ConvertError::PageIndex { index, page_count })?;
        self.document
            .pages()
            .get(page_index)
            .map_err(|e| ConvertError::render(index, e))
    }
}

impl RasterDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_size(&self, index: usize) -> Result<PageSize, ConvertError> {
        let page = self.page(index)?;
        Ok(PageSize::new(page.width().value, page.height().value))
    }

    fn render(
        &self,
        index: usize,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, ConvertError> {
        let page = self.page(index)?;

        let render_config = PdfRenderConfig::new().set_target_size(width as i32, height as i32);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| ConvertError::render(index, e))?;

        Ok(bitmap.as_image())
    }
}
