// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Diagnostic overlays: extracted segments and candidate quadrilaterals drawn
// onto a copy of the working image, one colour per item.

use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::{LineSegment, Quadrilateral};

/// Supplies one overlay colour per drawn item.
pub trait ColorSource {
    fn next_color(&mut self) -> Rgba<u8>;
}

/// Opaque colours from a seeded generator, reproducible for a given seed.
#[derive(Debug, Clone)]
pub struct RandomColors {
    rng: StdRng,
}

impl RandomColors {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ColorSource for RandomColors {
    fn next_color(&mut self) -> Rgba<u8> {
        Rgba([self.rng.random(), self.rng.random(), self.rng.random(), 255])
    }
}

/// The same colour every time.
#[derive(Debug, Clone, Copy)]
pub struct FixedColor(pub Rgba<u8>);

impl ColorSource for FixedColor {
    fn next_color(&mut self) -> Rgba<u8> {
        self.0
    }
}

/// Draw a segment `thickness` pixels wide by stacking parallel one-pixel
/// lines along its normal.
fn draw_thick_segment(canvas: &mut RgbaImage, segment: &LineSegment, thickness: u32, color: Rgba<u8>) {
    let length = segment.length();
    let (nx, ny) = if length > 0.0 {
        (-segment.dy() / length, segment.dx() / length)
    } else {
        (0.0, 0.0)
    };

    let thickness = thickness.max(1) as i64;
    let first = -(thickness - 1) / 2;
    for offset in first..first + thickness {
        let shift = offset as f64;
        let start = (
            (segment.start.x + nx * shift) as f32,
            (segment.start.y + ny * shift) as f32,
        );
        let end = (
            (segment.end.x + nx * shift) as f32,
            (segment.end.y + ny * shift) as f32,
        );
        draw_line_segment_mut(canvas, start, end, color);
    }
}

/// Copy of `image` with every segment drawn in its own colour.
pub fn draw_segments(
    image: &DynamicImage,
    segments: &[LineSegment],
    thickness: u32,
    colors: &mut dyn ColorSource,
) -> DynamicImage {
    let mut canvas = image.to_rgba8();
    for segment in segments {
        let color = colors.next_color();
        draw_thick_segment(&mut canvas, segment, thickness, color);
    }
    DynamicImage::ImageRgba8(canvas)
}

/// Copy of `image` with the four edges of every quadrilateral drawn, one
/// colour per quadrilateral.
pub fn draw_quadrilaterals(
    image: &DynamicImage,
    quads: &[Quadrilateral],
    thickness: u32,
    colors: &mut dyn ColorSource,
) -> DynamicImage {
    let mut canvas = image.to_rgba8();
    for quad in quads {
        let color = colors.next_color();
        for edge in [quad.top(), quad.right(), quad.bottom(), quad.left()] {
            draw_thick_segment(&mut canvas, &edge, thickness, color);
        }
    }
    DynamicImage::ImageRgba8(canvas)
}
