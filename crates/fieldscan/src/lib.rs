//! fieldscan: Propose fillable form fields for PDFs without embedded forms.
//!
//! This is the public API facade crate. It re-exports types from
//! fieldscan-core and uses fieldscan-pdf to rasterize documents.
//!
//! # Architecture
//!
//! - **fieldscan-core**: Backend-independent types and the raster pipeline
//! - **fieldscan-pdf**: pdfium rasterization and lopdf AcroForm reading
//! - **fieldscan** (this crate): [`FormScanner`], [`apply_fields`] and
//!   [`FieldNameReport`]
//!
//! # Example
//!
//! ```ignore
//! use fieldscan::{DetectOptions, FormScanner};
//!
//! let fields = FormScanner::new(DetectOptions::default())
//!     .scan_file(std::path::Path::new("blank_form.pdf"))?;
//! for field in &fields {
//!     println!("{} on page {} at ({:.1}, {:.1})", field.name, field.page, field.x, field.y);
//! }
//! ```

mod apply;
mod report;
mod scanner;
mod selection;

pub use fieldscan_core;
pub use fieldscan_pdf;

pub use apply::apply_fields;
pub use fieldscan_core::{
    ContourMode, DetectOptions, FieldAlign, FieldDescriptor, FieldOrder, FieldType, PageRaster,
    ScanError,
};
pub use fieldscan_pdf::{BackendError, EmbedOutcome, PageSource, PdfiumBackend, SkippedField};
pub use report::FieldNameReport;
pub use scanner::FormScanner;
pub use selection::PageSelection;
