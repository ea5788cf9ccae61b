//! Connected-region tracing over the grid mask.

use std::collections::HashSet;

use imageproc::contours::{BorderType, Contour, find_contours};

use crate::PixelBox;
use crate::binarize::BinaryMask;
use crate::options::ContourMode;

/// Trace every region border of `grid` and return its bounding box.
///
/// With [`ContourMode::All`] both outer borders and hole borders are kept, so
/// a closed ruled rectangle yields two boxes: the outline itself and the
/// interior it encloses. Boxes come back in tracer discovery order.
///
/// A box equal to one already returned is dropped. With one-pixel strokes the
/// hole border runs over the same pixels as the outer border, so both would
/// otherwise describe the same field.
pub fn find_regions(grid: &BinaryMask, mode: ContourMode) -> Vec<PixelBox> {
    if grid.width() == 0 || grid.height() == 0 {
        return Vec::new();
    }
    let contours: Vec<Contour<u32>> = find_contours(grid.as_image());
    let mut seen = HashSet::new();
    contours
        .iter()
        .filter(|c| match mode {
            ContourMode::All => true,
            ContourMode::Outer => c.border_type == BorderType::Outer,
        })
        .filter_map(|c| {
            let points: Vec<(u32, u32)> = c.points.iter().map(|p| (p.x, p.y)).collect();
            PixelBox::enclosing(&points)
        })
        .filter(|b| seen.insert(*b))
        .collect()
}
