//! fieldscan-pdf: PDF backends for fieldscan.
//!
//! This crate connects the backend-independent pipeline in `fieldscan-core`
//! to real documents:
//!
//! - [`PdfiumBackend`] rasterizes pages with pdfium and exposes them through
//!   the [`PageSource`] trait.
//! - [`read_field_names`] walks an existing `/AcroForm` with lopdf.
//! - [`embed_fields`] writes detected fields back as AcroForm widgets.

mod acroform;
mod embed;
mod error;
mod pdfium_backend;
mod source;

pub use acroform::{read_field_names, read_field_names_from_path};
pub use embed::{EmbedOutcome, SkippedField, embed_fields};
pub use error::BackendError;
pub use pdfium_backend::{PdfiumBackend, PdfiumDocument};
pub use source::PageSource;
