//! Detection options.
//!
//! [`DetectOptions`] gathers every tunable constant of the pipeline. The
//! defaults reproduce the reference behavior; the size filter and the inward
//! margin were tuned together, so change them as a pair.

use crate::ScanError;
use crate::field::FieldAlign;

/// Which traced borders become candidate boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContourMode {
    /// Every border in the containment hierarchy, including hole borders.
    #[default]
    All,
    /// Only outer borders.
    Outer,
}

/// Order of descriptors within a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldOrder {
    /// Order in which the contour tracer discovered the regions.
    #[default]
    Discovery,
    /// Top-to-bottom, then left-to-right by raw pixel position.
    Reading,
}

/// Options controlling rasterization, binarization, line extraction and
/// classification.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectOptions {
    /// Render magnification relative to 72 DPI (default: 2.5).
    pub zoom: f32,
    /// Width of the logical coordinate space (default: 800.0).
    pub target_width: f64,
    /// Side of the Gaussian adaptive-threshold window, odd (default: 11).
    pub block_size: u32,
    /// Constant subtracted from the local mean (default: 2.0).
    pub threshold_offset: f64,
    /// Long side of the line-extraction kernels in raster pixels (default: 40).
    pub line_length: u32,
    /// Boxes must be wider than this in logical units (default: 20.0).
    pub min_width: f64,
    /// Boxes must be taller than this in logical units (default: 10.0).
    pub min_height: f64,
    /// Boxes taller than this are table cells (default: 15.0).
    pub cell_min_height: f64,
    /// Underscore blanks are shorter than this (default: 25.0).
    pub underscore_max_height: f64,
    /// Underscore blanks are wider than this (default: 50.0).
    pub underscore_min_width: f64,
    /// Inward margin applied on every side, logical units (default: 2.0).
    pub margin: f64,
    /// Font size stamped on every descriptor (default: 11).
    pub font_size: u32,
    /// Alignment stamped on every descriptor (default: left).
    pub align: FieldAlign,
    /// Prefix of the descriptor id (default: "det").
    pub id_prefix: String,
    /// Prefix of the sequential descriptor name (default: "Field_").
    pub name_prefix: String,
    /// Which contours to keep (default: all).
    pub contour_mode: ContourMode,
    /// Order of descriptors within a page (default: discovery).
    pub order: FieldOrder,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            zoom: 2.5,
            target_width: 800.0,
            block_size: 11,
            threshold_offset: 2.0,
            line_length: 40,
            min_width: 20.0,
            min_height: 10.0,
            cell_min_height: 15.0,
            underscore_max_height: 25.0,
            underscore_min_width: 50.0,
            margin: 2.0,
            font_size: 11,
            align: FieldAlign::Left,
            id_prefix: "det".to_string(),
            name_prefix: "Field_".to_string(),
            contour_mode: ContourMode::All,
            order: FieldOrder::Discovery,
        }
    }
}

impl DetectOptions {
    /// Reject option combinations the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidOptions`] describing the first offending
    /// setting.
    pub fn validate(&self) -> Result<(), ScanError> {
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return Err(ScanError::InvalidOptions(format!(
                "zoom must be a positive number, got {}",
                self.zoom
            )));
        }
        if !(self.target_width.is_finite() && self.target_width > 0.0) {
            return Err(ScanError::InvalidOptions(format!(
                "target width must be a positive number, got {}",
                self.target_width
            )));
        }
        if self.block_size < 3 || self.block_size % 2 == 0 {
            return Err(ScanError::InvalidOptions(format!(
                "threshold block size must be odd and at least 3, got {}",
                self.block_size
            )));
        }
        if !self.threshold_offset.is_finite() {
            return Err(ScanError::InvalidOptions(
                "threshold offset must be finite".to_string(),
            ));
        }
        if self.line_length == 0 {
            return Err(ScanError::InvalidOptions(
                "line kernel length must be at least 1".to_string(),
            ));
        }
        if self.margin < 0.0 || self.margin * 2.0 >= self.min_width.min(self.min_height) {
            return Err(ScanError::InvalidOptions(format!(
                "margin {} would collapse boxes admitted by the size filter",
                self.margin
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let opts = DetectOptions::default();
        assert_eq!(opts.zoom, 2.5);
        assert_eq!(opts.target_width, 800.0);
        assert_eq!(opts.block_size, 11);
        assert_eq!(opts.threshold_offset, 2.0);
        assert_eq!(opts.line_length, 40);
        assert_eq!(opts.min_width, 20.0);
        assert_eq!(opts.min_height, 10.0);
        assert_eq!(opts.margin, 2.0);
        assert_eq!(opts.font_size, 11);
        assert_eq!(opts.align, FieldAlign::Left);
        assert_eq!(opts.contour_mode, ContourMode::All);
        assert_eq!(opts.order, FieldOrder::Discovery);
    }

    #[test]
    fn defaults_validate() {
        assert!(DetectOptions::default().validate().is_ok());
    }

    #[test]
    fn rejects_even_block_size() {
        let opts = DetectOptions {
            block_size: 10,
            ..DetectOptions::default()
        };
        assert!(matches!(opts.validate(), Err(ScanError::InvalidOptions(_))));
    }

    #[test]
    fn rejects_non_positive_zoom() {
        let opts = DetectOptions {
            zoom: 0.0,
            ..DetectOptions::default()
        };
        assert!(opts.validate().is_err());
        let opts = DetectOptions {
            zoom: f32::NAN,
            ..DetectOptions::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn rejects_zero_line_length() {
        let opts = DetectOptions {
            line_length: 0,
            ..DetectOptions::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn rejects_margin_that_collapses_boxes() {
        let opts = DetectOptions {
            margin: 5.0,
            ..DetectOptions::default()
        };
        let err = opts.validate().unwrap_err();
        assert!(err.to_string().contains("margin"));
    }
}
