// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification of a detected quadrilateral.
//
// The quadrilateral's corners are mapped onto an axis-aligned rectangle the
// size of its bounding box and the working image is resampled through the
// resulting homography with bicubic interpolation. A degenerate transform
// falls back to a plain crop so callers always receive a usable image.

pub mod homography;

use docquad_core::DocquadError;
use docquad_core::config::RectifyConfig;
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{info, instrument, warn};

use crate::geometry::{Point, Quadrilateral};

pub use homography::Homography;

/// Fill colour for output pixels that map outside the source image.
const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Destination rectangle for source corners ordered `[br, bl, tl, tr]`.
///
/// Landscape images map the corners onto their natural positions. Portrait
/// images, when `rotate_portrait` is set, get the assignment rotated by 180°.
pub fn destination_corners(width: u32, height: u32, rotate_portrait: bool) -> [Point; 4] {
    let (w, h) = (width as f64, height as f64);
    if rotate_portrait {
        [
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        ]
    } else {
        [
            Point::new(w, h),
            Point::new(0.0, h),
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
        ]
    }
}

/// Every RGB channel brighter than `threshold` becomes pure white.
///
/// Pushes the paper background of a photographed page towards white after
/// rectification. Alpha is left untouched.
pub fn whiten_highlights(image: &DynamicImage, threshold: u8) -> DynamicImage {
    let mut rgba = image.to_rgba8();
    for pixel in rgba.pixels_mut() {
        for channel in pixel.0.iter_mut().take(3) {
            if *channel > threshold {
                *channel = 255;
            }
        }
    }
    DynamicImage::ImageRgba8(rgba)
}

/// Flattens a quadrilateral region of an image into a rectangle.
#[derive(Debug, Clone, Default)]
pub struct Rectifier {
    config: RectifyConfig,
}

impl Rectifier {
    pub fn new(config: RectifyConfig) -> Self {
        Self { config }
    }

    /// The homography taking `quad` in an image of the given size onto its
    /// output rectangle.
    pub fn homography_for(
        &self,
        quad: &Quadrilateral,
        image_width: u32,
        image_height: u32,
    ) -> docquad_core::Result<Homography> {
        let rect = quad.bounding_rect();
        let portrait = image_height > image_width;
        let src = [quad.br, quad.bl, quad.tl, quad.tr];
        let dst = destination_corners(
            rect.width,
            rect.height,
            portrait && self.config.rotate_portrait,
        );
        Homography::from_correspondences(&src, &dst)
    }

    /// Resample `image` so that `quad` fills a `width × height` output, where
    /// the size is the quadrilateral's bounding rectangle.
    ///
    /// Never fails: a degenerate transform yields the unrectified crop of the
    /// bounding rectangle instead.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn rectify(&self, image: &DynamicImage, quad: &Quadrilateral) -> DynamicImage {
        let rect = quad.bounding_rect();
        let (width, height) = image.dimensions();

        let warped = self
            .homography_for(quad, width, height)
            .and_then(|homography| {
                Projection::from_matrix(homography.to_row_major_f32()).ok_or_else(|| {
                    DocquadError::DegenerateTransform("projection is not invertible".into())
                })
            })
            .map(|projection| {
                let source = image.to_rgba8();
                let mut output = RgbaImage::new(rect.width, rect.height);
                warp_into(&source, &projection, Interpolation::Bicubic, BACKGROUND, &mut output);
                DynamicImage::ImageRgba8(output)
            });

        let rectified = match warped {
            Ok(output) => {
                info!(
                    out_w = rect.width,
                    out_h = rect.height,
                    portrait = height > width,
                    "Perspective correction applied"
                );
                output
            }
            Err(err) => {
                warn!(%err, "Falling back to the unrectified crop");
                image.crop_imm(rect.x, rect.y, rect.width, rect.height)
            }
        };

        match self.config.whiten_threshold {
            Some(threshold) => whiten_highlights(&rectified, threshold),
            None => rectified,
        }
    }
}
