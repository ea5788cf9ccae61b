//! Document-level field detection.

use std::path::{Path, PathBuf};

use fieldscan_core::{
    DetectOptions, FieldDescriptor, PageAnalysis, PageMasks, ScanError, analyze_page, assemble,
};
use fieldscan_pdf::{PageSource, PdfiumBackend};
use tracing::{debug, info};

use crate::PageSelection;

/// Runs the detection pipeline over a whole document.
///
/// # Example
///
/// ```ignore
/// let scanner = FormScanner::new(DetectOptions::default());
/// let fields = scanner.scan_file(Path::new("form.pdf"))?;
/// println!("{} fields", fields.len());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormScanner {
    options: DetectOptions,
    /// Pages to scan; `None` means every page.
    pages: Option<PageSelection>,
    debug_dir: Option<PathBuf>,
    pdfium_dir: Option<PathBuf>,
}

impl FormScanner {
    pub fn new(options: DetectOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Restrict the scan to the given 0-based page indices. Each page is
    /// scanned once however often it is listed.
    pub fn with_pages(self, pages: impl IntoIterator<Item = usize>) -> Self {
        self.with_page_selection(pages.into_iter().collect())
    }

    /// Restrict the scan to a selection checked against the page count when
    /// the document is opened.
    pub fn with_page_selection(mut self, selection: PageSelection) -> Self {
        self.pages = Some(selection);
        self
    }

    /// Write each page's binary and grid masks as PNG files into `dir`.
    pub fn with_debug_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.debug_dir = Some(dir.into());
        self
    }

    /// Look for the pdfium library in `dir` before the default locations.
    pub fn with_pdfium_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.pdfium_dir = Some(dir.into());
        self
    }

    pub fn options(&self) -> &DetectOptions {
        &self.options
    }

    /// Open a PDF with pdfium and detect fields on the selected pages.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::DocumentOpen`] for a missing or unreadable file,
    /// [`ScanError::RendererUnavailable`] if pdfium cannot be bound, and any
    /// error raised while scanning a page.
    pub fn scan_file(&self, path: &Path) -> Result<Vec<FieldDescriptor>, ScanError> {
        self.options.validate()?;
        if !path.exists() {
            return Err(ScanError::DocumentOpen(format!(
                "{}: file not found",
                path.display()
            )));
        }
        let backend = PdfiumBackend::bind(self.pdfium_dir.as_deref())?;
        let document = backend.open(path)?;
        info!(
            path = %document.path().display(),
            pages = document.page_count(),
            "scanning document"
        );
        self.scan_source(&document)
    }

    /// Detect fields on the selected pages of any [`PageSource`].
    ///
    /// # Errors
    ///
    /// The first failing page aborts the scan; no partial result is returned.
    pub fn scan_source<S: PageSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<Vec<FieldDescriptor>, ScanError> {
        self.options.validate()?;
        let indices = self.page_indices(source.page_count())?;
        let analyses = self.analyze_pages(source, &indices)?;
        let fields = assemble(analyses, &self.options);
        info!(
            pages = indices.len(),
            fields = fields.len(),
            "field detection finished"
        );
        Ok(fields)
    }

    fn page_indices(&self, page_count: usize) -> Result<Vec<usize>, ScanError> {
        match &self.pages {
            None => Ok((0..page_count).collect()),
            Some(selection) => selection.resolve(page_count),
        }
    }

    /// Render and analyze pages strictly one after another, dropping each
    /// raster before the next page is rendered.
    #[cfg(not(feature = "parallel"))]
    fn analyze_pages<S: PageSource + ?Sized>(
        &self,
        source: &S,
        indices: &[usize],
    ) -> Result<Vec<PageAnalysis>, ScanError> {
        let keep_masks = self.debug_dir.is_some();
        let mut analyses = Vec::with_capacity(indices.len());
        for &index in indices {
            let raster = source.render_page(index, self.options.zoom)?;
            let analysis = analyze_page(&raster, index, &self.options, keep_masks)?;
            analyses.push(self.finish_page(analysis)?);
        }
        Ok(analyses)
    }

    /// Render a chunk of pages through the single backend handle, analyze
    /// that chunk on the rayon pool, then move on. At most one raster per
    /// worker thread is alive at a time. Results come back in page order.
    #[cfg(feature = "parallel")]
    fn analyze_pages<S: PageSource + ?Sized>(
        &self,
        source: &S,
        indices: &[usize],
    ) -> Result<Vec<PageAnalysis>, ScanError> {
        use rayon::prelude::*;

        let keep_masks = self.debug_dir.is_some();
        let chunk_size = rayon::current_num_threads().max(1);
        let mut analyses = Vec::with_capacity(indices.len());
        for chunk in indices.chunks(chunk_size) {
            let rasters = chunk
                .iter()
                .map(|&index| Ok((index, source.render_page(index, self.options.zoom)?)))
                .collect::<Result<Vec<_>, ScanError>>()?;
            let analyzed = rasters
                .into_par_iter()
                .map(|(index, raster)| {
                    let analysis = analyze_page(&raster, index, &self.options, keep_masks)?;
                    self.finish_page(analysis)
                })
                .collect::<Result<Vec<_>, ScanError>>()?;
            analyses.extend(analyzed);
        }
        Ok(analyses)
    }

    fn finish_page(&self, mut analysis: PageAnalysis) -> Result<PageAnalysis, ScanError> {
        debug!(
            page = analysis.page,
            width = analysis.raster_width,
            height = analysis.raster_height,
            regions = analysis.region_count,
            candidates = analysis.candidates.len(),
            "analyzed page"
        );
        if let (Some(dir), Some(masks)) = (&self.debug_dir, analysis.masks.take()) {
            write_masks(dir, analysis.page, &masks)?;
        }
        Ok(analysis)
    }
}

fn write_masks(dir: &Path, page: usize, masks: &PageMasks) -> Result<(), ScanError> {
    std::fs::create_dir_all(dir).map_err(|e| {
        ScanError::Processing(format!("cannot create {}: {e}", dir.display()))
    })?;
    for (stage, mask) in [("binary", &masks.binary), ("grid", &masks.grid)] {
        let path = dir.join(format!("page-{}-{stage}.png", page + 1));
        mask.as_image()
            .save(&path)
            .map_err(|e| ScanError::Processing(format!("cannot write {}: {e}", path.display())))?;
        debug!(path = %path.display(), "wrote debug mask");
    }
    Ok(())
}
