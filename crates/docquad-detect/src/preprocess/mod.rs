// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preprocessing: downscaling, blur, binary edge maps, and morphology that
// turn a photograph into the binary image the line extractor consumes.

pub mod threshold;

use std::borrow::Cow;

use docquad_core::EdgeMap;
use docquad_core::config::PreprocessConfig;
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{dilate, erode};
use tracing::{debug, info, instrument};

pub use threshold::{FOREGROUND, adaptive_threshold_inverted, count_foreground, sobel_threshold};

/// Scale `image` down so that neither side exceeds `max_dimension`,
/// preserving the aspect ratio. Images already within bounds are borrowed.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn resize_if_necessary(image: &DynamicImage, max_dimension: u32) -> Cow<'_, DynamicImage> {
    if image.width() <= max_dimension && image.height() <= max_dimension {
        return Cow::Borrowed(image);
    }
    let resized = image.resize(max_dimension, max_dimension, FilterType::Triangle);
    info!(
        new_w = resized.width(),
        new_h = resized.height(),
        "Downscaled working image"
    );
    Cow::Owned(resized)
}

/// Sigma OpenCV derives for a Gaussian kernel of side `kernel_size`.
pub fn kernel_sigma(kernel_size: u32) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Grayscale preprocessing chain.
///
/// Every method consumes `self` and returns a new `Preprocessor`, so the
/// caller's image is never touched: construction takes a grayscale copy.
pub struct Preprocessor {
    image: GrayImage,
}

impl Preprocessor {
    // -- Construction ---------------------------------------------------------

    /// Start from a grayscale copy of `image`.
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        Self {
            image: image.to_luma8(),
        }
    }

    /// Wrap an image that is already grayscale (or already binary).
    pub fn from_gray(image: GrayImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn as_gray(&self) -> &GrayImage {
        &self.image
    }

    pub fn into_gray(self) -> GrayImage {
        self.image
    }

    // -- Steps ----------------------------------------------------------------

    /// Gaussian blur with an OpenCV-style kernel size. Sizes of 0 or 1 are a
    /// no-op.
    pub fn blur(self, kernel_size: u32) -> Self {
        if kernel_size <= 1 {
            return self;
        }
        let sigma = kernel_sigma(kernel_size);
        debug!(kernel_size, sigma, "Gaussian blur");
        Self {
            image: gaussian_blur_f32(&self.image, sigma),
        }
    }

    /// Replace the grayscale image with a binary edge map.
    pub fn edge_map(self, edge_map: EdgeMap) -> Self {
        let image = match edge_map {
            EdgeMap::AdaptiveThreshold {
                block_size,
                constant,
            } => adaptive_threshold_inverted(&self.image, block_size, constant),
            EdgeMap::Canny { low, high } => canny(&self.image, low, high),
            EdgeMap::Sobel { threshold } => sobel_threshold(&self.image, threshold),
        };
        debug!(?edge_map, "Edge map computed");
        Self { image }
    }

    /// Dilate with a square kernel of side `size`.
    pub fn dilate(self, size: u32) -> Self {
        match square_radius(size) {
            Some(radius) => Self {
                image: dilate(&self.image, Norm::LInf, radius),
            },
            None => self,
        }
    }

    /// Erode with a square kernel of side `size`.
    pub fn erode(self, size: u32) -> Self {
        match square_radius(size) {
            Some(radius) => Self {
                image: erode(&self.image, Norm::LInf, radius),
            },
            None => self,
        }
    }

    // -- Full chain -----------------------------------------------------------

    /// Run the configured chain on an already downscaled working image:
    ///
    /// 1. grayscale copy
    /// 2. Gaussian blur
    /// 3. binary edge map
    /// 4. dilate, erode, then a final erode scaled to the major dimension
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn run(image: &DynamicImage, config: &PreprocessConfig) -> GrayImage {
        let major = image.width().max(image.height());
        let final_erode = (major as f64 * config.final_erode_ratio) as u32;

        let binary = Self::from_dynamic(image)
            .blur(config.blur_kernel)
            .edge_map(config.edge_map)
            .dilate(config.dilate_size)
            .erode(config.erode_size)
            .erode(final_erode)
            .into_gray();

        debug!(
            foreground = count_foreground(&binary),
            final_erode, "Preprocessing complete"
        );
        binary
    }
}

/// `L∞` radius for a square kernel of side `size`, or `None` when the kernel
/// would be the identity.
fn square_radius(size: u32) -> Option<u8> {
    let radius = (size / 2).min(u8::MAX as u32) as u8;
    (radius > 0).then_some(radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    #[test]
    fn small_images_are_borrowed() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 200, Rgb([1, 2, 3])));
        assert!(matches!(resize_if_necessary(&img, 1280), Cow::Borrowed(_)));
    }

    #[test]
    fn large_images_fit_the_bound() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(2000, 1000));
        let resized = resize_if_necessary(&img, 1280);
        assert_eq!(resized.width(), 1280);
        assert_eq!(resized.height(), 640);

        let tall = DynamicImage::ImageRgb8(RgbImage::new(500, 2560));
        let resized = resize_if_necessary(&tall, 1280);
        assert_eq!(resized.height(), 1280);
        assert_eq!(resized.width(), 250);
    }

    #[test]
    fn opencv_sigma_for_common_kernels() {
        assert!((kernel_sigma(3) - 0.8).abs() < 1e-6);
        assert!((kernel_sigma(9) - 1.7).abs() < 1e-6);
    }

    #[test]
    fn square_radius_skips_identity_kernels() {
        assert_eq!(square_radius(0), None);
        assert_eq!(square_radius(1), None);
        assert_eq!(square_radius(20), Some(10));
        assert_eq!(square_radius(10_000), Some(255));
    }

    #[test]
    fn dilate_then_erode_grows_and_shrinks() {
        let mut gray = GrayImage::new(41, 41);
        gray.put_pixel(20, 20, Luma([FOREGROUND]));
        let dilated = Preprocessor::from_gray(gray).dilate(5);
        // Radius 2 square around the seed.
        assert_eq!(count_foreground(dilated.as_gray()), 25);
        let eroded = dilated.erode(5);
        assert_eq!(count_foreground(eroded.as_gray()), 1);
    }

    #[test]
    fn blank_image_yields_empty_binary() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(200, 150, Luma([180u8])));
        let binary = Preprocessor::run(&img, &PreprocessConfig::default());
        assert_eq!(binary.dimensions(), (200, 150));
        assert_eq!(count_foreground(&binary), 0);
    }

    #[test]
    fn input_is_not_modified() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(64, 64, Luma([90u8])));
        let before = img.clone();
        let _ = Preprocessor::run(&img, &PreprocessConfig::default());
        assert_eq!(img, before);
    }
}
