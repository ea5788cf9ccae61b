//! Ruling-line extraction by morphological opening.
//!
//! Opening a binary mask with a `len × 1` bar keeps only horizontal ink runs
//! at least `len` pixels long; a `1 × len` bar does the same vertically.
//! Glyphs are locally compact and disappear, table borders and underscores
//! survive. The two orientation masks are blended back into one grid mask.

use image::GrayImage;

use crate::binarize::{BACKGROUND, BinaryMask, FOREGROUND};

/// Orientation of a line-extraction kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Pixels of the window before and after the anchor for a kernel of `len`.
///
/// The anchor sits at `len / 2`, so a 40-pixel bar covers 20 pixels before
/// and 19 after.
fn window(len: usize) -> (usize, usize) {
    let before = len / 2;
    (before, len - 1 - before)
}

/// 1-D erosion: a pixel stays foreground iff every in-range pixel of
/// `[i - before, i + after]` is foreground. Out-of-range pixels never erode.
fn erode_run(src: &[u8], dst: &mut [u8], before: usize, after: usize) {
    let n = src.len();
    // Nearest background pixel on each side of `i`.
    let mut last_bg: Option<usize> = None;
    let mut next_bg = vec![n; n];
    let mut upcoming = n;
    for i in (0..n).rev() {
        if src[i] != FOREGROUND {
            upcoming = i;
        }
        next_bg[i] = upcoming;
    }
    for i in 0..n {
        if src[i] != FOREGROUND {
            last_bg = Some(i);
            dst[i] = BACKGROUND;
            continue;
        }
        let lo = i.saturating_sub(before);
        let hi = (i + after).min(n - 1);
        let clear_left = last_bg.is_none_or(|b| b < lo);
        let clear_right = next_bg[i] > hi;
        dst[i] = if clear_left && clear_right {
            FOREGROUND
        } else {
            BACKGROUND
        };
    }
}

/// 1-D dilation: every foreground pixel paints `[i - before, i + after]`.
///
/// Painting the erosion window back is a max over the reflected window, so
/// dilation after erosion restores every run that survived exactly.
fn dilate_run(src: &[u8], dst: &mut [u8], before: usize, after: usize) {
    let n = src.len();
    dst.fill(BACKGROUND);
    for (i, &v) in src.iter().enumerate() {
        if v != FOREGROUND {
            continue;
        }
        let lo = i.saturating_sub(before);
        let hi = (i + after).min(n - 1);
        dst[lo..=hi].fill(FOREGROUND);
    }
}

/// Morphological opening with a `len`-pixel bar in the given orientation.
pub fn open_lines(mask: &BinaryMask, len: u32, orientation: Orientation) -> BinaryMask {
    let (w, h) = (mask.width() as usize, mask.height() as usize);
    let mut out = vec![BACKGROUND; w * h];
    if w == 0 || h == 0 {
        return BinaryMask::new(mask.width(), mask.height());
    }
    let (before, after) = window(len.max(1) as usize);
    let src = mask.as_raw();

    match orientation {
        Orientation::Horizontal => {
            let mut eroded = vec![BACKGROUND; w];
            for y in 0..h {
                let row = &src[y * w..(y + 1) * w];
                erode_run(row, &mut eroded, before, after);
                dilate_run(&eroded, &mut out[y * w..(y + 1) * w], before, after);
            }
        }
        Orientation::Vertical => {
            let mut column = vec![BACKGROUND; h];
            let mut eroded = vec![BACKGROUND; h];
            let mut opened = vec![BACKGROUND; h];
            for x in 0..w {
                for y in 0..h {
                    column[y] = src[y * w + x];
                }
                erode_run(&column, &mut eroded, before, after);
                dilate_run(&eroded, &mut opened, before, after);
                for y in 0..h {
                    out[y * w + x] = opened[y];
                }
            }
        }
    }

    let image = GrayImage::from_raw(mask.width(), mask.height(), out)
        .unwrap_or_else(|| GrayImage::new(mask.width(), mask.height()));
    BinaryMask::from_gray(image)
}

/// Blend two masks as `0.5·a + 0.5·b` (rounded, saturated) and re-binarize
/// with a global `> 0` threshold.
pub fn combine(a: &BinaryMask, b: &BinaryMask) -> BinaryMask {
    let mut blended = GrayImage::new(a.width(), a.height());
    for ((dst, pa), pb) in blended
        .pixels_mut()
        .zip(a.as_image().pixels())
        .zip(b.as_image().pixels())
    {
        let v = (0.5 * f64::from(pa[0]) + 0.5 * f64::from(pb[0])).round();
        dst[0] = v.clamp(0.0, 255.0) as u8;
    }
    BinaryMask::from_gray(blended)
}

/// Horizontal, vertical and merged grid masks for one page.
#[derive(Debug, Clone)]
pub struct LineMasks {
    pub horizontal: BinaryMask,
    pub vertical: BinaryMask,
    pub grid: BinaryMask,
}

/// Isolate long horizontal and vertical ink runs and merge them.
pub fn extract_lines(mask: &BinaryMask, len: u32) -> LineMasks {
    let horizontal = open_lines(mask, len, Orientation::Horizontal);
    let vertical = open_lines(mask, len, Orientation::Vertical);
    let grid = combine(&horizontal, &vertical);
    LineMasks {
        horizontal,
        vertical,
        grid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_with(w: u32, h: u32, rects: &[(u32, u32, u32, u32)]) -> BinaryMask {
        let mut m = BinaryMask::new(w, h);
        for &(x, y, rw, rh) in rects {
            for yy in y..y + rh {
                for xx in x..x + rw {
                    m.set(xx, yy, true);
                }
            }
        }
        m
    }

    #[test]
    fn window_of_forty() {
        assert_eq!(window(40), (20, 19));
        assert_eq!(window(1), (0, 0));
        assert_eq!(window(3), (1, 1));
    }

    #[test]
    fn erode_then_dilate_restores_long_run() {
        let mut src = vec![0u8; 100];
        src[10..60].fill(255);
        let mut eroded = vec![0u8; 100];
        erode_run(&src, &mut eroded, 20, 19);
        assert!(eroded[30] == 255 && eroded[40] == 255);
        assert_eq!(eroded[29], 0);
        assert_eq!(eroded[41], 0);
        let mut opened = vec![0u8; 100];
        dilate_run(&eroded, &mut opened, 20, 19);
        assert_eq!(opened, src);
    }

    #[test]
    fn short_run_vanishes() {
        let mut src = vec![0u8; 100];
        src[10..49].fill(255);
        let mut eroded = vec![0u8; 100];
        erode_run(&src, &mut eroded, 20, 19);
        assert!(eroded.iter().all(|&v| v == 0));
    }

    #[test]
    fn run_touching_border_survives() {
        let mut src = vec![0u8; 30];
        src[..30].fill(255);
        let mut eroded = vec![0u8; 30];
        erode_run(&src, &mut eroded, 20, 19);
        assert!(eroded.iter().all(|&v| v == 255));
    }

    #[test]
    fn horizontal_opening_keeps_rules_drops_glyphs() {
        // A 120x2 rule and a 12x12 "glyph".
        let mask = mask_with(200, 60, &[(20, 10, 120, 2), (40, 30, 12, 12)]);
        let opened = open_lines(&mask, 40, Orientation::Horizontal);
        assert_eq!(opened.foreground_count(), 240);
        assert!(opened.is_foreground(20, 10));
        assert!(opened.is_foreground(139, 11));
        assert!(!opened.is_foreground(45, 35));
    }

    #[test]
    fn vertical_opening_keeps_tall_strokes() {
        let mask = mask_with(60, 100, &[(10, 5, 2, 60), (30, 5, 2, 39)]);
        let opened = open_lines(&mask, 40, Orientation::Vertical);
        assert_eq!(opened.foreground_count(), 120);
        assert!(opened.is_foreground(10, 5));
        assert!(!opened.is_foreground(30, 20));
    }

    #[test]
    fn opening_is_idempotent() {
        let mask = mask_with(
            150,
            80,
            &[(5, 5, 100, 3), (5, 5, 3, 60), (60, 40, 30, 30), (120, 2, 2, 70)],
        );
        let once = open_lines(&mask, 40, Orientation::Vertical);
        let twice = open_lines(&once, 40, Orientation::Vertical);
        assert_eq!(once, twice);
    }

    #[test]
    fn combine_is_union() {
        let a = mask_with(10, 10, &[(0, 0, 5, 1)]);
        let b = mask_with(10, 10, &[(0, 0, 1, 5)]);
        let c = combine(&a, &b);
        assert_eq!(c.foreground_count(), 9);
        assert!(c.is_foreground(4, 0));
        assert!(c.is_foreground(0, 4));
        assert!(!c.is_foreground(5, 5));
    }

    #[test]
    fn grid_of_ruled_box() {
        // 100x50 outline drawn with 2-pixel strokes.
        let mask = mask_with(
            140,
            80,
            &[
                (10, 10, 100, 2),
                (10, 58, 100, 2),
                (10, 10, 2, 50),
                (108, 10, 2, 50),
            ],
        );
        let lines = extract_lines(&mask, 40);
        assert_eq!(lines.grid, mask);
        assert_eq!(lines.horizontal.foreground_count(), 400);
        assert_eq!(lines.vertical.foreground_count(), 200);
    }
}
