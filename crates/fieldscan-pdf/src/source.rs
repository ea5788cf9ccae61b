//! Page source trait.
//!
//! Defines the [`PageSource`] trait that abstracts rasterization so the
//! detection pipeline can run against pdfium or against in-memory rasters.

use fieldscan_core::PageRaster;

use crate::BackendError;

/// Anything that can hand out rendered pages of one document.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Render the page at 0-based `index`, magnified by `zoom` relative to
    /// 72 DPI.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Render`] if the page is out of range or the
    /// backend fails to rasterize it.
    fn render_page(&self, index: usize, zoom: f32) -> Result<PageRaster, BackendError>;
}

impl PageSource for Vec<PageRaster> {
    fn page_count(&self) -> usize {
        self.len()
    }

    /// Pre-rendered pages ignore `zoom`.
    fn render_page(&self, index: usize, _zoom: f32) -> Result<PageRaster, BackendError> {
        self.get(index).cloned().ok_or_else(|| BackendError::Render {
            page: index,
            message: format!("page index out of range (document has {} pages)", self.len()),
        })
    }
}
