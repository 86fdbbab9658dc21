// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Progressive probabilistic Hough transform. `imageproc::hough` only offers
// the standard (polar, unbounded) transform; the document pipeline needs
// finite segments with a minimum length and a bridgeable gap.

use image::GrayImage;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::geometry::{LineSegment, Point};

/// Parameters of one probabilistic Hough run, in absolute pixel units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilisticHough {
    /// Distance resolution of the accumulator.
    pub rho: f64,
    /// Angle resolution of the accumulator, in radians.
    pub theta: f64,
    /// Votes a bin needs before a line is traced from the current pixel.
    pub threshold: u32,
    /// Segments shorter than this on both axes are discarded.
    pub min_line_length: f64,
    /// Largest run of background pixels bridged while tracing.
    pub max_line_gap: f64,
    /// Seed for the pixel visiting order.
    pub seed: u64,
}

impl ProbabilisticHough {
    /// Detect segments among the non-zero pixels of `binary`.
    ///
    /// Foreground pixels are visited in a seeded random order. Each pixel
    /// votes for every angle; once its strongest bin reaches the threshold,
    /// the line through it is traced in both directions, tolerating gaps of
    /// up to `max_line_gap`. Traced pixels are removed from further voting,
    /// and when the traced segment is long enough their votes are withdrawn.
    pub fn detect(&self, binary: &GrayImage) -> Vec<LineSegment> {
        let (width, height) = binary.dimensions();
        if width == 0 || height == 0 || !(self.rho > 0.0) || !(self.theta > 0.0) {
            return Vec::new();
        }
        let (w, h) = (width as i64, height as i64);

        let num_angle = ((std::f64::consts::PI / self.theta).round() as usize).max(1);
        let num_rho = (((w + h) as f64 * 2.0 + 1.0) / self.rho).round() as usize;
        let rho_offset = (num_rho as i64 - 1) / 2;

        let trig: Vec<(f64, f64)> = (0..num_angle)
            .map(|n| {
                let angle = n as f64 * self.theta;
                (angle.cos() / self.rho, angle.sin() / self.rho)
            })
            .collect();

        let mut mask = vec![false; (w * h) as usize];
        let mut voted = vec![false; (w * h) as usize];
        let mut points = Vec::new();
        for (x, y, pixel) in binary.enumerate_pixels() {
            if pixel.0[0] != 0 {
                mask[(y as i64 * w + x as i64) as usize] = true;
                points.push((x as i64, y as i64));
            }
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        points.shuffle(&mut rng);

        let mut accum = vec![0i32; num_angle * num_rho];
        let bin = |n: usize, x: i64, y: i64| -> usize {
            let (c, s) = trig[n];
            let r = (x as f64 * c + y as f64 * s).round() as i64 + rho_offset;
            n * num_rho + r.clamp(0, num_rho as i64 - 1) as usize
        };

        let mut segments = Vec::new();
        let max_gap = self.max_line_gap.max(0.0) as i64;

        for &(x, y) in &points {
            let idx = (y * w + x) as usize;
            if !mask[idx] {
                continue;
            }

            // Vote and find the strongest bin for this pixel.
            voted[idx] = true;
            let mut max_val = 0i32;
            let mut max_n = 0usize;
            for n in 0..num_angle {
                let b = bin(n, x, y);
                accum[b] += 1;
                if accum[b] > max_val {
                    max_val = accum[b];
                    max_n = n;
                }
            }
            if max_val < self.threshold as i32 {
                continue;
            }

            // Direction along the line: the normal is (cos, sin).
            let angle = max_n as f64 * self.theta;
            let (dir_x, dir_y) = (-angle.sin(), angle.cos());
            let (step_x, step_y) = if dir_x.abs() > dir_y.abs() {
                (dir_x.signum(), dir_y / dir_x.abs())
            } else {
                (dir_x / dir_y.abs(), dir_y.signum())
            };

            let walk = |k: usize, step: i64| -> (f64, f64) {
                let sign = if k == 0 { 1.0 } else { -1.0 };
                (
                    x as f64 + sign * step as f64 * step_x,
                    y as f64 + sign * step as f64 * step_y,
                )
            };
            let pixel_at = |px: f64, py: f64| -> Option<(i64, i64)> {
                let (ix, iy) = (px.round() as i64, py.round() as i64);
                (ix >= 0 && iy >= 0 && ix < w && iy < h).then_some((ix, iy))
            };

            // Trace both directions to find the segment ends.
            let mut line_end = [(x, y); 2];
            for (k, end) in line_end.iter_mut().enumerate() {
                let mut gap = 0i64;
                let mut step = 1i64;
                while let Some((ix, iy)) = {
                    let (px, py) = walk(k, step);
                    pixel_at(px, py)
                } {
                    if mask[(iy * w + ix) as usize] {
                        gap = 0;
                        *end = (ix, iy);
                    } else {
                        gap += 1;
                        if gap > max_gap {
                            break;
                        }
                    }
                    step += 1;
                }
            }

            let good_line = ((line_end[1].0 - line_end[0].0).abs() as f64) >= self.min_line_length
                || ((line_end[1].1 - line_end[0].1).abs() as f64) >= self.min_line_length;

            // Clear the traced pixels; withdraw their votes for accepted lines.
            let mut clear = |ix: i64, iy: i64| {
                let i = (iy * w + ix) as usize;
                if !mask[i] {
                    return;
                }
                if good_line && voted[i] {
                    for n in 0..num_angle {
                        let b = bin(n, ix, iy);
                        accum[b] -= 1;
                    }
                    voted[i] = false;
                }
                mask[i] = false;
            };
            for (k, &end) in line_end.iter().enumerate() {
                let mut step = 0i64;
                loop {
                    let (px, py) = walk(k, step);
                    let Some((ix, iy)) = pixel_at(px, py) else {
                        break;
                    };
                    clear(ix, iy);
                    if (ix, iy) == end {
                        break;
                    }
                    step += 1;
                }
            }

            if good_line {
                segments.push(LineSegment::new(
                    Point::new(line_end[0].0 as f64, line_end[0].1 as f64),
                    Point::new(line_end[1].0 as f64, line_end[1].1 as f64),
                ));
            }
        }

        segments
    }
}
