// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line extraction: probabilistic Hough transform over the binary edge map,
// optional collinear merging, and canonical segment ordering.

pub mod hough;
pub mod merge;

use docquad_core::config::{HoughConfig, MergeConfig};
use image::GrayImage;
use tracing::{debug, info, instrument};

use crate::geometry::LineSegment;

pub use hough::ProbabilisticHough;
pub use merge::merge_segments;

/// Turns a binary image into line segments, with Hough lengths scaled to the
/// image's minor dimension.
#[derive(Debug, Clone)]
pub struct LineExtractor {
    hough: HoughConfig,
    merge: MergeConfig,
}

impl LineExtractor {
    pub fn new(hough: HoughConfig, merge: MergeConfig) -> Self {
        Self { hough, merge }
    }

    /// Hough parameters for an image whose smaller side is `min_dimension`.
    pub fn hough_for(&self, min_dimension: u32) -> ProbabilisticHough {
        let dim = min_dimension as f64;
        ProbabilisticHough {
            rho: self.hough.rho,
            theta: self.hough.theta_degrees.to_radians(),
            threshold: self.hough.vote_threshold,
            min_line_length: dim * self.hough.min_length_ratio,
            max_line_gap: dim * self.hough.max_gap_ratio,
            seed: self.hough.seed,
        }
    }

    /// Extract segments from `binary`. An empty result is a valid outcome.
    #[instrument(skip_all, fields(width = binary.width(), height = binary.height()))]
    pub fn extract(&self, binary: &GrayImage) -> Vec<LineSegment> {
        let min_dimension = binary.width().min(binary.height());
        let hough = self.hough_for(min_dimension);
        debug!(
            min_line_length = hough.min_line_length,
            max_line_gap = hough.max_line_gap,
            threshold = hough.threshold,
            "Running probabilistic Hough transform"
        );

        let raw = hough.detect(binary);
        let raw_count = raw.len();

        let segments = if self.merge.enabled {
            merge_segments(raw, self.merge.angle_tolerance, self.merge.neighbour_distance)
        } else {
            raw
        };

        let segments = canonical_order(segments);
        info!(raw = raw_count, segments = segments.len(), "Line extraction complete");
        segments
    }
}

/// Give every segment a predictable direction and position in the list.
///
/// Vertical-dominant segments come first, each running top to bottom,
/// followed by horizontal-dominant segments running left to right. Detection
/// order is preserved within each group. The corner clusterer's
/// negative-determinant rule is direction-sensitive, and this order makes
/// every vertical/horizontal pair meet it.
pub fn canonical_order(segments: Vec<LineSegment>) -> Vec<LineSegment> {
    let (horizontal, vertical): (Vec<_>, Vec<_>) =
        segments.into_iter().partition(LineSegment::is_horizontal);

    let vertical = vertical.into_iter().map(|s| {
        if s.start.y > s.end.y { s.reversed() } else { s }
    });
    let horizontal = horizontal.into_iter().map(|s| {
        if s.start.x > s.end.x { s.reversed() } else { s }
    });

    vertical.chain(horizontal).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn canonical_order_puts_verticals_first() {
        let ordered = canonical_order(vec![
            LineSegment::from_coords(500.0, 100.0, 100.0, 100.0),
            LineSegment::from_coords(100.0, 400.0, 100.0, 100.0),
            LineSegment::from_coords(100.0, 400.0, 500.0, 400.0),
            LineSegment::from_coords(500.0, 100.0, 500.0, 400.0),
        ]);
        assert_eq!(
            ordered,
            vec![
                LineSegment::from_coords(100.0, 100.0, 100.0, 400.0),
                LineSegment::from_coords(500.0, 100.0, 500.0, 400.0),
                LineSegment::from_coords(100.0, 100.0, 500.0, 100.0),
                LineSegment::from_coords(100.0, 400.0, 500.0, 400.0),
            ]
        );
    }

    #[test]
    fn lengths_scale_with_the_minor_dimension() {
        let extractor = LineExtractor::new(HoughConfig::default(), MergeConfig::default());
        let hough = extractor.hough_for(500);
        assert_eq!(hough.min_line_length, 250.0);
        assert_eq!(hough.max_line_gap, 50.0);
        assert!((hough.theta - 2f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn blank_image_yields_no_lines() {
        let extractor = LineExtractor::new(HoughConfig::default(), MergeConfig::default());
        assert!(extractor.extract(&GrayImage::new(320, 240)).is_empty());
    }

    #[test]
    fn outline_yields_four_sides() {
        let mut binary = GrayImage::new(600, 500);
        for x in 100..=500 {
            binary.put_pixel(x, 100, Luma([255]));
            binary.put_pixel(x, 400, Luma([255]));
        }
        for y in 100..=400 {
            binary.put_pixel(100, y, Luma([255]));
            binary.put_pixel(500, y, Luma([255]));
        }

        let extractor = LineExtractor::new(HoughConfig::default(), MergeConfig::default());
        let segments = extractor.extract(&binary);
        assert_eq!(segments.len(), 4, "{segments:?}");
        assert!(!segments[0].is_horizontal());
        assert!(!segments[1].is_horizontal());
        assert!(segments[2].is_horizontal());
        assert!(segments[3].is_horizontal());
        for s in &segments {
            assert!(s.length() >= 250.0, "{s:?}");
        }
    }
}
