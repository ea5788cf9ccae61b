//! Page rasters produced by a rendering backend.
//!
//! A [`PageRaster`] is an RGB image with any alpha channel already flattened
//! onto a white background, so the binarizer never sees transparency.

use image::{GrayImage, Luma, Rgb, RgbImage, RgbaImage};

use crate::ScanError;

/// Rendered page pixels for one page, owned transiently by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRaster {
    image: RgbImage,
}

impl PageRaster {
    /// Number of color channels carried by every raster.
    pub const CHANNELS: u8 = 3;

    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    /// Build a raster from a packed RGB byte buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Processing`] if the buffer length does not match
    /// `width * height * 3`.
    pub fn from_rgb_bytes(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self, ScanError> {
        let actual = bytes.len();
        RgbImage::from_raw(width, height, bytes)
            .map(Self::new)
            .ok_or_else(|| {
                ScanError::Processing(format!(
                    "RGB buffer of {actual} bytes does not match {width}x{height} raster"
                ))
            })
    }

    /// Flatten an RGBA image onto white.
    pub fn from_rgba(rgba: &RgbaImage) -> Self {
        let mut image = RgbImage::new(rgba.width(), rgba.height());
        for (dst, src) in image.pixels_mut().zip(rgba.pixels()) {
            let alpha = u32::from(src[3]);
            let blend = |c: u8| -> u8 {
                // c * a / 255 + 255 * (255 - a) / 255, rounded
                ((u32::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8
            };
            *dst = Rgb([blend(src[0]), blend(src[1]), blend(src[2])]);
        }
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn channels(&self) -> u8 {
        Self::CHANNELS
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Single-channel BT.601 luma.
    ///
    /// Uses the 14-bit fixed-point weights common to OpenCV-style pipelines so
    /// that gray levels are reproducible bit for bit.
    pub fn to_gray(&self) -> GrayImage {
        let mut gray = GrayImage::new(self.width(), self.height());
        for (dst, src) in gray.pixels_mut().zip(self.image.pixels()) {
            let [r, g, b] = src.0;
            let y = (u32::from(r) * 4899 + u32::from(g) * 9617 + u32::from(b) * 1868 + (1 << 13))
                >> 14;
            *dst = Luma([y.min(255) as u8]);
        }
        gray
    }
}
