//! Error types for fieldscan.
//!
//! Provides [`ScanError`], the single fatal error type that every pipeline
//! stage returns. There is no partial-result recovery: any error aborts the
//! whole document run, and the boundary layer decides how to surface it.

use std::fmt;

/// Fatal error types for field detection.
///
/// These errors indicate conditions that stop processing of the whole
/// document.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanError {
    /// The document path does not exist or is not a readable PDF.
    DocumentOpen(String),
    /// A specific page could not be rasterized.
    PageRender {
        /// 0-based index of the page that failed.
        page: usize,
        /// Backend-provided description of the failure.
        message: String,
    },
    /// Failure inside the geometric pipeline (e.g. a malformed image buffer).
    Processing(String),
    /// The PDF rendering engine could not be loaded.
    RendererUnavailable(String),
    /// The supplied [`DetectOptions`](crate::DetectOptions) were rejected.
    InvalidOptions(String),
}

impl ScanError {
    /// Short machine-readable tag for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ScanError::DocumentOpen(_) => "DocumentOpenError",
            ScanError::PageRender { .. } => "PageRenderError",
            ScanError::Processing(_) => "ProcessingError",
            ScanError::RendererUnavailable(_) => "RendererUnavailable",
            ScanError::InvalidOptions(_) => "InvalidOptions",
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::DocumentOpen(msg) => write!(f, "cannot open document: {msg}"),
            ScanError::PageRender { page, message } => {
                write!(f, "cannot render page {}: {message}", page + 1)
            }
            ScanError::Processing(msg) => write!(f, "processing error: {msg}"),
            ScanError::RendererUnavailable(msg) => {
                write!(f, "PDF renderer unavailable: {msg}")
            }
            ScanError::InvalidOptions(msg) => write!(f, "invalid options: {msg}"),
        }
    }
}

impl std::error::Error for ScanError {}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        ScanError::DocumentOpen(err.to_string())
    }
}
