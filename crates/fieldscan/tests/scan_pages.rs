//! Document-level behavior over synthetic rendered pages.

use fieldscan::{
    BackendError, DetectOptions, FieldOrder, FormScanner, PageRaster, PageSource, ScanError,
};
use image::{Rgb, RgbImage};

/// Filled black rectangles drawn on white pages of a fixed size.
struct DrawnPages {
    width: u32,
    height: u32,
    pages: Vec<Vec<(u32, u32, u32, u32)>>,
    /// Page index whose rendering fails, if any.
    broken: Option<usize>,
}

impl DrawnPages {
    fn new(width: u32, height: u32, pages: Vec<Vec<(u32, u32, u32, u32)>>) -> Self {
        Self {
            width,
            height,
            pages,
            broken: None,
        }
    }
}

impl PageSource for DrawnPages {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn render_page(&self, index: usize, _zoom: f32) -> Result<PageRaster, BackendError> {
        if self.broken == Some(index) {
            return Err(BackendError::Render {
                page: index,
                message: "damaged content stream".to_string(),
            });
        }
        let mut img = RgbImage::from_pixel(self.width, self.height, Rgb([255, 255, 255]));
        for &(x, y, w, h) in &self.pages[index] {
            for yy in y..y + h {
                for xx in x..x + w {
                    img.put_pixel(xx, yy, Rgb([0, 0, 0]));
                }
            }
        }
        Ok(PageRaster::new(img))
    }
}

/// A 2-pixel ruled rectangle as four bars.
fn outline(x: u32, y: u32, w: u32, h: u32) -> Vec<(u32, u32, u32, u32)> {
    vec![
        (x, y, w, 2),
        (x, y + h - 2, w, 2),
        (x, y, 2, h),
        (x + w - 2, y, 2, h),
    ]
}

#[test]
fn blank_document_yields_no_fields() {
    let source = DrawnPages::new(600, 800, vec![vec![], vec![]]);
    let fields = FormScanner::default().scan_source(&source).unwrap();
    assert!(fields.is_empty());
}

#[test]
fn block_on_first_page_only() {
    // 400-pixel pages: the 50x10 block is 100x20 logical units.
    let source = DrawnPages::new(400, 500, vec![vec![(80, 120, 50, 10)], vec![]]);
    let fields = FormScanner::default().scan_source(&source).unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].page, 0);
    assert_eq!(fields[0].name, "Field_1");
}

#[test]
fn pages_stay_in_order_and_names_are_global() {
    let source = DrawnPages::new(
        1000,
        600,
        vec![
            outline(100, 100, 400, 60),
            vec![],
            [outline(50, 50, 300, 80), outline(50, 300, 300, 80)].concat(),
        ],
    );
    let fields = FormScanner::default().scan_source(&source).unwrap();
    assert!(!fields.is_empty());
    assert!(fields.windows(2).all(|w| w[0].page <= w[1].page));
    assert!(fields.iter().all(|f| f.page != 1));
    for (i, f) in fields.iter().enumerate() {
        assert_eq!(f.name, format!("Field_{}", i + 1));
    }
}

#[test]
fn ruled_rectangle_gives_tall_field() {
    let source = DrawnPages::new(1530, 1980, vec![outline(300, 400, 600, 120)]);
    let fields = FormScanner::default().scan_source(&source).unwrap();
    assert!(fields.iter().any(|f| f.h > 11.0));
}

#[test]
fn outer_only_drops_interior_duplicates() {
    let source = DrawnPages::new(1530, 1980, vec![outline(300, 400, 600, 120)]);
    let all = FormScanner::default().scan_source(&source).unwrap();
    let outer = FormScanner::new(DetectOptions {
        contour_mode: fieldscan::ContourMode::Outer,
        ..DetectOptions::default()
    })
    .scan_source(&source)
    .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(outer.len(), 1);
}

#[test]
fn repeated_scans_are_identical() {
    let source = DrawnPages::new(
        900,
        700,
        vec![[outline(40, 40, 500, 100), vec![(60, 400, 400, 3)]].concat()],
    );
    let scanner = FormScanner::default();
    assert_eq!(
        scanner.scan_source(&source).unwrap(),
        scanner.scan_source(&source).unwrap()
    );
}

#[test]
fn coordinates_map_back_into_page() {
    let (width, height) = (1200u32, 1500u32);
    let source = DrawnPages::new(
        width,
        height,
        vec![[outline(100, 200, 700, 90), outline(100, 600, 250, 250)].concat()],
    );
    let opts = DetectOptions::default();
    let fields = FormScanner::new(opts.clone()).scan_source(&source).unwrap();
    assert!(!fields.is_empty());
    let scale = opts.target_width / f64::from(width);
    for f in &fields {
        let px = (f.x - opts.margin) / scale;
        let py = (f.y - opts.margin) / scale;
        let pw = (f.w + 2.0 * opts.margin) / scale;
        let ph = (f.h + 2.0 * opts.margin) / scale;
        assert!(px >= -1e-6 && py >= -1e-6);
        assert!(px + pw <= f64::from(width) + 1e-6);
        assert!(py + ph <= f64::from(height) + 1e-6);
        assert!(pw * scale > opts.min_width);
        assert!(ph * scale > opts.min_height);
        let id_tail = format!("_{}_{}", px.round(), py.round());
        assert!(f.id.ends_with(&id_tail), "{} vs {id_tail}", f.id);
    }
}

#[test]
fn reading_order_is_top_to_bottom() {
    let source = DrawnPages::new(
        1000,
        1000,
        vec![[outline(500, 600, 300, 80), outline(100, 100, 300, 80)].concat()],
    );
    let fields = FormScanner::new(DetectOptions {
        order: FieldOrder::Reading,
        ..DetectOptions::default()
    })
    .scan_source(&source)
    .unwrap();
    assert!(fields.windows(2).all(|w| w[0].y <= w[1].y));
}

#[test]
fn failing_page_aborts_whole_scan() {
    let mut source = DrawnPages::new(400, 500, vec![vec![(80, 120, 50, 10)], vec![]]);
    source.broken = Some(1);
    let err = FormScanner::default().scan_source(&source).unwrap_err();
    assert_eq!(
        err,
        ScanError::PageRender {
            page: 1,
            message: "damaged content stream".to_string()
        }
    );
}
