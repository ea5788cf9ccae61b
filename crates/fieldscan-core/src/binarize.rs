//! Gaussian adaptive thresholding.
//!
//! Each pixel is compared with a Gaussian-weighted mean of its
//! `block_size × block_size` neighborhood instead of a single global level,
//! so uneven scan shading does not swamp or erase the ruling lines. The
//! result is inverted: dark ink becomes foreground (255).

use image::{GrayImage, Luma};

use crate::ScanError;

/// Value of a foreground pixel in every mask.
pub const FOREGROUND: u8 = 255;
/// Value of a background pixel in every mask.
pub const BACKGROUND: u8 = 0;

/// A {0, 255} mask with the same dimensions as its source raster.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryMask {
    image: GrayImage,
}

impl BinaryMask {
    /// An all-background mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::new(width, height),
        }
    }

    /// Wrap a gray image, mapping every non-zero value to foreground.
    pub fn from_gray(mut image: GrayImage) -> Self {
        for p in image.pixels_mut() {
            if p[0] != BACKGROUND {
                p[0] = FOREGROUND;
            }
        }
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.image.get_pixel(x, y)[0] == FOREGROUND
    }

    pub fn set(&mut self, x: u32, y: u32, foreground: bool) {
        let v = if foreground { FOREGROUND } else { BACKGROUND };
        self.image.put_pixel(x, y, Luma([v]));
    }

    pub fn foreground_count(&self) -> usize {
        self.image.pixels().filter(|p| p[0] == FOREGROUND).count()
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    pub(crate) fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }
}

/// Normalized 1-D Gaussian weights for an odd `size`.
///
/// Sigma is derived from the window the same way OpenCV does when none is
/// given: `0.3 * ((size - 1) / 2 - 1) + 0.8`.
pub fn gaussian_kernel(size: u32) -> Vec<f64> {
    let sigma = 0.3 * ((f64::from(size) - 1.0) * 0.5 - 1.0) + 0.8;
    let half = (size / 2) as i64;
    let scale = -0.5 / (sigma * sigma);
    let raw: Vec<f64> = (-half..=half)
        .map(|i| ((i * i) as f64 * scale).exp())
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / sum).collect()
}

/// Separable Gaussian blur with replicated borders, rounded back to `u8`.
fn gaussian_mean(gray: &GrayImage, kernel: &[f64]) -> Vec<u8> {
    let (w, h) = (gray.width() as usize, gray.height() as usize);
    let src = gray.as_raw();
    let half = (kernel.len() / 2) as isize;

    let mut temp = vec![0f64; w * h];
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let sx = (x as isize + k as isize - half).clamp(0, w as isize - 1) as usize;
                acc += f64::from(row[sx]) * weight;
            }
            temp[y * w + x] = acc;
        }
    }

    let mut out = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let sy = (y as isize + k as isize - half).clamp(0, h as isize - 1) as usize;
                acc += temp[sy * w + x] * weight;
            }
            out[y * w + x] = acc.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Adaptive Gaussian threshold, inverted so ink is foreground.
///
/// A pixel is foreground iff `gray - mean <= -ceil(offset)`. Uniform regions,
/// whatever their brightness, come out as background.
///
/// # Errors
///
/// Returns [`ScanError::Processing`] for an even or too-small `block_size`.
pub fn adaptive_threshold(
    gray: &GrayImage,
    block_size: u32,
    offset: f64,
) -> Result<BinaryMask, ScanError> {
    if block_size < 3 || block_size % 2 == 0 {
        return Err(ScanError::Processing(format!(
            "adaptive threshold block size must be odd and >= 3, got {block_size}"
        )));
    }
    let (w, h) = gray.dimensions();
    if w == 0 || h == 0 {
        return Ok(BinaryMask::new(w, h));
    }

    let kernel = gaussian_kernel(block_size);
    let mean = gaussian_mean(gray, &kernel);
    let delta = offset.ceil() as i32;

    let mut mask = GrayImage::new(w, h);
    for ((dst, src), m) in mask.pixels_mut().zip(gray.pixels()).zip(mean.iter()) {
        let diff = i32::from(src[0]) - i32::from(*m);
        dst[0] = if diff <= -delta { FOREGROUND } else { BACKGROUND };
    }
    Ok(BinaryMask { image: mask })
}
