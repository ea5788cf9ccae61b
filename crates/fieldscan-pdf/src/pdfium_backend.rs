//! Page rasterization through the pdfium engine.
//!
//! [`PdfiumBackend`] owns the bound pdfium library; each opened
//! [`PdfiumDocument`] borrows it and implements [`PageSource`].

use std::path::{Path, PathBuf};

use fieldscan_core::PageRaster;
use image::RgbaImage;
use pdfium_render::prelude::*;
use tracing::debug;

use crate::{BackendError, PageSource};

/// A bound pdfium library.
pub struct PdfiumBackend {
    pdfium: Pdfium,
}

impl PdfiumBackend {
    /// Bind pdfium, trying `dir` first (when given), then the working
    /// directory, then the system library path.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Bind`] if no candidate could be loaded.
    pub fn bind(dir: Option<&Path>) -> Result<Self, BackendError> {
        let explicit = match dir {
            Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
                .map_err(|e| format!("{}: {e}", dir.display())),
            None => Err(String::from("no directory given")),
        };
        let bindings = explicit
            .or_else(|first| {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                    .map_err(|_| first)
            })
            .or_else(|first| {
                Pdfium::bind_to_system_library()
                    .map_err(|e| format!("{e} (after trying: {first})"))
            })
            .map_err(BackendError::Bind)?;
        debug!("pdfium bound");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Open a document from a filesystem path.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Open`] if the file is missing or pdfium cannot
    /// parse it.
    pub fn open(&self, path: &Path) -> Result<PdfiumDocument<'_>, BackendError> {
        if !path.exists() {
            return Err(BackendError::Open {
                path: path.display().to_string(),
                message: "file not found".to_string(),
            });
        }
        let document =
            self.pdfium
                .load_pdf_from_file(path, None)
                .map_err(|e| BackendError::Open {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
        let page_count = document.pages().len() as usize;
        debug!(path = %path.display(), page_count, "opened PDF");
        Ok(PdfiumDocument {
            document,
            path: path.to_path_buf(),
            page_count,
        })
    }
}

/// An open PDF document backed by pdfium.
pub struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
    path: PathBuf,
    page_count: usize,
}

impl PdfiumDocument<'_> {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PageSource for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn render_page(&self, index: usize, zoom: f32) -> Result<PageRaster, BackendError> {
        let render_err = |message: String| BackendError::Render {
            page: index,
            message,
        };
        if index >= self.page_count {
            return Err(render_err(format!(
                "page index out of range (document has {} pages)",
                self.page_count
            )));
        }
        let page_index: u16 = index
            .try_into()
            .map_err(|_| render_err("page index exceeds pdfium range".to_string()))?;
        let page = self
            .document
            .pages()
            .get(page_index)
            .map_err(|e| render_err(e.to_string()))?;
        let bitmap = page
            .render_with_config(&PdfRenderConfig::new().scale_page_by_factor(zoom))
            .map_err(|e| render_err(e.to_string()))?;

        let width = u32::try_from(bitmap.width())
            .map_err(|_| render_err("negative bitmap width".to_string()))?;
        let height = u32::try_from(bitmap.height())
            .map_err(|_| render_err("negative bitmap height".to_string()))?;
        let rgba = RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes()).ok_or_else(|| {
            render_err(format!("bitmap buffer does not match {width}x{height}"))
        })?;
        debug!(page = index, width, height, "rendered page");
        Ok(PageRaster::from_rgba(&rgba))
    }
}
