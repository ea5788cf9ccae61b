//! Error types for the PDF backends.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Provides [`BackendError`]
//! that wraps pdfium and lopdf failures and converts them to [`ScanError`].

use fieldscan_core::ScanError;
use thiserror::Error;

/// Error type for PDF backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The pdfium shared library could not be located or bound.
    #[error("cannot bind pdfium library: {0}")]
    Bind(String),

    /// The document could not be opened.
    #[error("{path}: {message}")]
    Open {
        /// Path as given by the caller.
        path: String,
        /// Backend-provided reason.
        message: String,
    },

    /// A page could not be rasterized.
    #[error("page {}: {message}", page + 1)]
    Render {
        /// 0-based page index.
        page: usize,
        /// Backend-provided reason.
        message: String,
    },

    /// Error from PDF object parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] ScanError),
}

impl From<BackendError> for ScanError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Bind(msg) => ScanError::RendererUnavailable(msg),
            e @ BackendError::Open { .. } => ScanError::DocumentOpen(e.to_string()),
            BackendError::Render { page, message } => ScanError::PageRender { page, message },
            BackendError::Parse(msg) => ScanError::DocumentOpen(msg),
            BackendError::Io(e) => ScanError::DocumentOpen(e.to_string()),
            BackendError::Core(e) => e,
        }
    }
}
