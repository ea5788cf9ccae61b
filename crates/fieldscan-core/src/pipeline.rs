//! Per-page analysis and the document-level reduction.
//!
//! [`analyze_page`] runs binarization, line extraction, region tracing and
//! classification on one raster and knows nothing about other pages.
//! [`assemble`] concatenates the per-page results in page order and assigns
//! the document-wide ids and sequential names.

use std::collections::HashSet;

use crate::ScanError;
use crate::binarize::{BinaryMask, adaptive_threshold};
use crate::classify::classify_boxes;
use crate::field::{FieldCandidate, FieldDescriptor, FieldType};
use crate::lines::extract_lines;
use crate::options::{DetectOptions, FieldOrder};
use crate::raster::PageRaster;
use crate::regions::find_regions;

/// Intermediate masks of one page, kept only when requested.
#[derive(Debug, Clone)]
pub struct PageMasks {
    /// Adaptive-threshold output.
    pub binary: BinaryMask,
    /// Merged horizontal and vertical line mask.
    pub grid: BinaryMask,
}

/// Result of analyzing a single page.
#[derive(Debug, Clone)]
pub struct PageAnalysis {
    /// 0-based page index.
    pub page: usize,
    pub raster_width: u32,
    pub raster_height: u32,
    /// Number of traced regions before filtering.
    pub region_count: usize,
    /// Admitted candidates in discovery order.
    pub candidates: Vec<FieldCandidate>,
    /// Present when `keep_masks` was set.
    pub masks: Option<PageMasks>,
}

/// Binarize, extract ruling lines, trace regions and classify them for one
/// rendered page.
///
/// # Errors
///
/// Returns [`ScanError::Processing`] if the raster cannot be binarized with
/// the configured block size.
pub fn analyze_page(
    raster: &PageRaster,
    page: usize,
    opts: &DetectOptions,
    keep_masks: bool,
) -> Result<PageAnalysis, ScanError> {
    let gray = raster.to_gray();
    let binary = adaptive_threshold(&gray, opts.block_size, opts.threshold_offset)?;
    let lines = extract_lines(&binary, opts.line_length);
    let boxes = find_regions(&lines.grid, opts.contour_mode);
    let candidates = classify_boxes(&boxes, raster.width(), page, opts);

    let masks = keep_masks.then(|| PageMasks {
        binary,
        grid: lines.grid,
    });
    Ok(PageAnalysis {
        page,
        raster_width: raster.width(),
        raster_height: raster.height(),
        region_count: boxes.len(),
        candidates,
        masks,
    })
}

/// Concatenate page results in page order and name every field.
///
/// Pages may arrive in any order; they are sorted by index first, and a page
/// index seen twice is kept once. Names run `<name_prefix>1`,
/// `<name_prefix>2`, ... across the whole document. Two boxes sharing a
/// top-left pixel get `_2`, `_3`, ... appended so ids stay unique.
pub fn assemble(mut pages: Vec<PageAnalysis>, opts: &DetectOptions) -> Vec<FieldDescriptor> {
    pages.sort_by_key(|p| p.page);
    pages.dedup_by_key(|p| p.page);
    let mut fields = Vec::new();
    let mut ids = HashSet::new();
    for mut page in pages {
        if opts.order == FieldOrder::Reading {
            page.candidates.sort_by_key(|c| (c.pixel_box.y, c.pixel_box.x));
        }
        for c in page.candidates {
            let n = fields.len() + 1;
            let base = format!(
                "{}_{}_{}_{}",
                opts.id_prefix, c.page, c.pixel_box.x, c.pixel_box.y
            );
            let mut id = base.clone();
            let mut k = 1;
            while !ids.insert(id.clone()) {
                k += 1;
                id = format!("{base}_{k}");
            }
            fields.push(FieldDescriptor {
                id,
                field_type: FieldType::Text,
                page: c.page,
                x: c.x,
                y: c.y,
                w: c.w,
                h: c.h,
                name: format!("{}{n}", opts.name_prefix),
                required: false,
                font_size: opts.font_size,
                align: opts.align,
            });
        }
    }
    fields
}

/// Analyze every raster in order and assemble the descriptors.
///
/// # Errors
///
/// The first page error aborts the run; no partial result is returned.
pub fn detect_fields(
    rasters: &[PageRaster],
    opts: &DetectOptions,
) -> Result<Vec<FieldDescriptor>, ScanError> {
    opts.validate()?;
    let pages = rasters
        .iter()
        .enumerate()
        .map(|(i, r)| analyze_page(r, i, opts, false))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(assemble(pages, opts))
}
