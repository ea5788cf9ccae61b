//! fieldscan-core: Backend-independent types and the raster pipeline.
//!
//! This crate turns a rendered page raster into proposed fillable-field
//! boxes: adaptive binarization, morphological line extraction, region
//! tracing, size/shape classification and normalization into an 800-unit
//! logical page width. It never touches a PDF; rendering backends live in
//! `fieldscan-pdf`.

pub mod binarize;
pub mod classify;
mod error;
pub mod field;
mod geometry;
pub mod lines;
pub mod options;
pub mod pipeline;
pub mod raster;
pub mod regions;

pub use binarize::{BinaryMask, adaptive_threshold};
pub use classify::{classify_boxes, classify_size};
pub use error::ScanError;
pub use field::{FieldAlign, FieldCandidate, FieldDescriptor, FieldKind, FieldType};
pub use geometry::PixelBox;
pub use lines::{LineMasks, Orientation, extract_lines};
pub use options::{ContourMode, DetectOptions, FieldOrder};
pub use pipeline::{PageAnalysis, PageMasks, analyze_page, assemble, detect_fields};
pub use raster::PageRaster;
pub use regions::find_regions;
