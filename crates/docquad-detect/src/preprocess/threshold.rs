// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Binary edge maps that `imageproc` does not provide directly: mean-C
// adaptive thresholding and a saturated Sobel magnitude threshold.

use image::{GrayImage, Luma};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

/// Foreground value in every binary image produced by this module.
pub const FOREGROUND: u8 = 255;

/// Mean-C adaptive threshold with inverted output.
///
/// For each pixel the local mean over a `block_size` square window (clamped
/// to the image) is computed from an integral image. Pixels brighter than
/// `mean − constant` become background (0); darker ones become foreground
/// (255), so dark ink and dark page borders are what the line extractor sees.
pub fn adaptive_threshold_inverted(gray: &GrayImage, block_size: u32, constant: f64) -> GrayImage {
    let (width, height) = gray.dimensions();
    let radius = block_size / 2;
    let integral = compute_integral_image(gray);

    GrayImage::from_fn(width, height, |x, y| {
        let local_mean = region_mean(&integral, width, height, x, y, radius);
        let value = gray.get_pixel(x, y).0[0] as f64;
        if value > local_mean - constant {
            Luma([0])
        } else {
            Luma([FOREGROUND])
        }
    })
}

/// Binary Sobel edge map: `min(255,|gx|) + min(255,|gy|)` saturated at 255,
/// then foreground where the magnitude exceeds `threshold`.
pub fn sobel_threshold(gray: &GrayImage, threshold: u8) -> GrayImage {
    let gx = horizontal_sobel(gray);
    let gy = vertical_sobel(gray);
    let (width, height) = gray.dimensions();

    GrayImage::from_fn(width, height, |x, y| {
        let ax = gx.get_pixel(x, y).0[0].unsigned_abs().min(255);
        let ay = gy.get_pixel(x, y).0[0].unsigned_abs().min(255);
        let magnitude = (ax + ay).min(255) as u8;
        if magnitude > threshold {
            Luma([FOREGROUND])
        } else {
            Luma([0])
        }
    })
}

/// Number of foreground pixels in a binary image.
pub fn count_foreground(binary: &GrayImage) -> usize {
    binary.pixels().filter(|p| p.0[0] != 0).count()
}

// -- Integral image helpers ---------------------------------------------------

/// Summed-area table with a zero-padded first row and column.
///
/// `table[y * (width + 1) + x]` holds the sum of all pixels in `[0, x) × [0, y)`.
fn compute_integral_image(gray: &GrayImage) -> Vec<u64> {
    let (w, h) = gray.dimensions();
    let stride = (w + 1) as usize;
    let mut table = vec![0u64; stride * (h + 1) as usize];

    for y in 0..h {
        let mut row_sum: u64 = 0;
        for x in 0..w {
            row_sum += gray.get_pixel(x, y).0[0] as u64;
            let idx = (y + 1) as usize * stride + (x + 1) as usize;
            let above = y as usize * stride + (x + 1) as usize;
            table[idx] = row_sum + table[above];
        }
    }

    table
}

/// Mean over the square of `radius` around (cx, cy), clamped to the image.
fn region_mean(
    integral: &[u64],
    img_width: u32,
    img_height: u32,
    cx: u32,
    cy: u32,
    radius: u32,
) -> f64 {
    let stride = (img_width + 1) as usize;

    let x1 = cx.saturating_sub(radius) as usize;
    let y1 = cy.saturating_sub(radius) as usize;
    let x2 = ((cx + radius + 1) as usize).min(img_width as usize);
    let y2 = ((cy + radius + 1) as usize).min(img_height as usize);

    let area = ((x2 - x1) * (y2 - y1)) as f64;
    if area == 0.0 {
        return 128.0;
    }

    let sum = integral[y2 * stride + x2] as f64
        - integral[y1 * stride + x2] as f64
        - integral[y2 * stride + x1] as f64
        + integral[y1 * stride + x1] as f64;

    sum / area
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_image_sums() {
        let gray = GrayImage::from_pixel(4, 3, Luma([2u8]));
        let table = compute_integral_image(&gray);
        // Bottom-right entry is the sum of the whole image.
        assert_eq!(table[table.len() - 1], 2 * 4 * 3);
        assert_eq!(region_mean(&table, 4, 3, 1, 1, 1), 2.0);
    }

    #[test]
    fn uniform_image_has_no_foreground() {
        let gray = GrayImage::from_pixel(60, 40, Luma([200u8]));
        let binary = adaptive_threshold_inverted(&gray, 15, 10.0);
        assert_eq!(count_foreground(&binary), 0);
    }

    #[test]
    fn thin_dark_line_becomes_foreground() {
        let mut gray = GrayImage::from_pixel(80, 60, Luma([255u8]));
        for x in 10..70 {
            gray.put_pixel(x, 30, Luma([0]));
        }
        let binary = adaptive_threshold_inverted(&gray, 15, 10.0);
        assert_eq!(count_foreground(&binary), 60);
        assert_eq!(binary.get_pixel(40, 30).0[0], FOREGROUND);
        assert_eq!(binary.get_pixel(40, 31).0[0], 0);
    }

    #[test]
    fn sobel_marks_step_edges() {
        let mut gray = GrayImage::from_pixel(40, 40, Luma([0u8]));
        for y in 0..40 {
            for x in 20..40 {
                gray.put_pixel(x, y, Luma([255]));
            }
        }
        let binary = sobel_threshold(&gray, 40);
        assert_eq!(binary.get_pixel(19, 20).0[0], FOREGROUND);
        assert_eq!(binary.get_pixel(20, 20).0[0], FOREGROUND);
        assert_eq!(binary.get_pixel(5, 20).0[0], 0);
        assert_eq!(binary.get_pixel(35, 20).0[0], 0);
    }
}
