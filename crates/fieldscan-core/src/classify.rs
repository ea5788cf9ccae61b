//! Size filtering, shape classification and logical-coordinate normalization.
//!
//! Raster boxes are rescaled so the page spans `target_width` logical units
//! regardless of render resolution. Only boxes large enough in both
//! directions and shaped like a table cell or an underscore blank are kept.

use crate::PixelBox;
use crate::field::{FieldCandidate, FieldKind};
use crate::options::DetectOptions;

/// Classify one logically-scaled size, or `None` if the box is rejected.
pub fn classify_size(fe_w: f64, fe_h: f64, opts: &DetectOptions) -> Option<FieldKind> {
    if fe_w <= opts.min_width || fe_h <= opts.min_height {
        return None;
    }
    let kind = FieldKind {
        table_cell: fe_h > opts.cell_min_height,
        underscore: fe_h < opts.underscore_max_height && fe_w > opts.underscore_min_width,
    };
    (kind.table_cell || kind.underscore).then_some(kind)
}

/// Turn raw boxes from one page into unnamed field candidates.
///
/// Input order is preserved. `raster_width` is the pixel width of the page
/// the boxes were traced on; a zero width yields no candidates.
pub fn classify_boxes(
    boxes: &[PixelBox],
    raster_width: u32,
    page: usize,
    opts: &DetectOptions,
) -> Vec<FieldCandidate> {
    if raster_width == 0 {
        return Vec::new();
    }
    let scale = opts.target_width / f64::from(raster_width);
    boxes
        .iter()
        .filter_map(|b| {
            let fe_w = f64::from(b.width) * scale;
            let fe_h = f64::from(b.height) * scale;
            let kind = classify_size(fe_w, fe_h, opts)?;
            Some(FieldCandidate {
                page,
                pixel_box: *b,
                kind,
                x: f64::from(b.x) * scale + opts.margin,
                y: f64::from(b.y) * scale + opts.margin,
                w: fe_w - 2.0 * opts.margin,
                h: fe_h - 2.0 * opts.margin,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> DetectOptions {
        DetectOptions::default()
    }

    #[test]
    fn size_filter_is_strict() {
        let o = opts();
        assert!(classify_size(20.0, 30.0, &o).is_none());
        assert!(classify_size(60.0, 10.0, &o).is_none());
        assert!(classify_size(20.01, 30.0, &o).is_some());
    }

    #[test]
    fn tall_box_is_table_cell() {
        let kind = classify_size(30.0, 40.0, &opts()).unwrap();
        assert!(kind.table_cell);
        assert!(!kind.underscore);
    }

    #[test]
    fn wide_short_box_is_underscore() {
        let kind = classify_size(120.0, 12.0, &opts()).unwrap();
        assert!(kind.underscore);
        assert!(!kind.table_cell);
    }

    #[test]
    fn box_can_be_both() {
        let kind = classify_size(120.0, 20.0, &opts()).unwrap();
        assert!(kind.underscore && kind.table_cell);
    }

    #[test]
    fn narrow_short_box_is_rejected() {
        // Passes the size filter but is neither tall nor wide enough.
        assert!(classify_size(40.0, 14.0, &opts()).is_none());
        assert!(classify_size(50.0, 12.0, &opts()).is_none());
    }

    #[test]
    fn cell_threshold_boundary() {
        assert!(classify_size(30.0, 15.0, &opts()).is_none());
        assert!(classify_size(30.0, 15.5, &opts()).is_some());
    }

    #[test]
    fn normalizes_with_margin() {
        // 2000-pixel page: scale 0.4.
        let boxes = [PixelBox::new(100, 200, 300, 50)];
        let out = classify_boxes(&boxes, 2000, 3, &opts());
        assert_eq!(out.len(), 1);
        let c = &out[0];
        assert_eq!(c.page, 3);
        assert!((c.x - 42.0).abs() < 1e-9);
        assert!((c.y - 82.0).abs() < 1e-9);
        assert!((c.w - 116.0).abs() < 1e-9);
        assert!((c.h - 16.0).abs() < 1e-9);
        assert_eq!(c.pixel_box, boxes[0]);
    }

    #[test]
    fn keeps_input_order() {
        let boxes = [
            PixelBox::new(0, 500, 400, 100),
            PixelBox::new(10, 5, 5, 5),
            PixelBox::new(0, 0, 400, 100),
        ];
        let out = classify_boxes(&boxes, 800, 0, &opts());
        let ys: Vec<u32> = out.iter().map(|c| c.pixel_box.y).collect();
        assert_eq!(ys, vec![500, 0]);
    }

    #[test]
    fn zero_width_raster_gives_nothing() {
        let boxes = [PixelBox::new(0, 0, 100, 100)];
        assert!(classify_boxes(&boxes, 0, 0, &opts()).is_empty());
    }

    #[test]
    fn round_trip_recovers_pixel_box() {
        let o = opts();
        let width = 1530;
        let boxes = [PixelBox::new(250, 410, 380, 90)];
        let c = &classify_boxes(&boxes, width, 0, &o)[0];
        let scale = o.target_width / f64::from(width);
        let px = (c.x - o.margin) / scale;
        let py = (c.y - o.margin) / scale;
        let pw = (c.w + 2.0 * o.margin) / scale;
        let ph = (c.h + 2.0 * o.margin) / scale;
        assert!((px - 250.0).abs() < 1e-6);
        assert!((py - 410.0).abs() < 1e-6);
        assert!((pw - 380.0).abs() < 1e-6);
        assert!((ph - 90.0).abs() < 1e-6);
    }
}
