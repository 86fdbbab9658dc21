// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line segments and the cheap proximity/orientation metrics the clustering
// stages rely on.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use super::point::Point;

/// Proximity threshold (pixels) used by the reference behaviour.
pub const DEFAULT_NEIGHBOUR_DISTANCE: f64 = 5.0;

/// A straight piece of line with an ordered pair of endpoints.
///
/// Equality is order-sensitive: `(a, b)` and `(b, a)` are different segments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
}

impl LineSegment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    pub fn dx(&self) -> f64 {
        self.end.x - self.start.x
    }

    pub fn dy(&self) -> f64 {
        self.end.y - self.start.y
    }

    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    /// `|Δx| > |Δy|`. Segments at exactly 45° count as vertical-dominant.
    pub fn is_horizontal(&self) -> bool {
        self.dx().abs() > self.dy().abs()
    }

    /// `Δy/Δx`, with `π/2` standing in for the undefined slope of a vertical
    /// segment. This is a numeric placeholder, not a limit.
    pub fn slope(&self) -> f64 {
        let dx = self.dx();
        if dx == 0.0 { FRAC_PI_2 } else { self.dy() / dx }
    }

    /// Signed angle from this segment's direction to `other`'s, computed as
    /// `atan((m2 − m1) / (1 + m1·m2))` over [`slope`](Self::slope).
    ///
    /// A zero denominator (perpendicular slopes) yields `±π/2` following the
    /// sign of the numerator.
    pub fn angle_between(&self, other: &LineSegment) -> f64 {
        let m1 = self.slope();
        let m2 = other.slope();
        let numerator = m2 - m1;
        let denominator = 1.0 + m1 * m2;
        if denominator == 0.0 {
            return if numerator < 0.0 { -FRAC_PI_2 } else { FRAC_PI_2 };
        }
        (numerator / denominator).atan()
    }

    /// Approximate distance between two segments.
    ///
    /// Returns 0 when the axis-aligned bounding boxes overlap on both axes.
    /// Otherwise the smallest of the four endpoint-to-endpoint distances.
    /// This is not the exact segment-to-segment distance.
    pub fn distance_between(&self, other: &LineSegment) -> f64 {
        if self.bbox_overlaps(other) {
            return 0.0;
        }
        let from_start = self
            .start
            .distance(&other.start)
            .min(self.start.distance(&other.end));
        let from_end = self
            .end
            .distance(&other.start)
            .min(self.end.distance(&other.end));
        from_start.min(from_end)
    }

    pub fn is_neighbour(&self, other: &LineSegment, threshold: f64) -> bool {
        self.distance_between(other) <= threshold
    }

    /// `(min_x, min_y, max_x, max_y)` of the two endpoints.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        )
    }

    /// True when `point` lies inside the bounding box grown by `padding`.
    pub fn bounds_contain(&self, point: &Point, padding: f64) -> bool {
        let (min_x, min_y, max_x, max_y) = self.bounds();
        point.x >= min_x - padding
            && point.x <= max_x + padding
            && point.y >= min_y - padding
            && point.y <= max_y + padding
    }

    /// The same segment with its endpoints swapped.
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    fn bbox_overlaps(&self, other: &LineSegment) -> bool {
        let (ax0, ay0, ax1, ay1) = self.bounds();
        let (bx0, by0, bx1, by1) = other.bounds();
        ax0 <= bx1 && bx0 <= ax1 && ay0 <= by1 && by0 <= ay1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn length_is_euclidean() {
        let line = LineSegment::from_coords(0.0, 0.0, 3.0, 4.0);
        assert_eq!(line.length(), 5.0);
    }

    #[test]
    fn orientation_classification() {
        assert!(LineSegment::from_coords(0.0, 0.0, 10.0, 3.0).is_horizontal());
        assert!(!LineSegment::from_coords(0.0, 0.0, 3.0, 10.0).is_horizontal());
        assert!(!LineSegment::from_coords(0.0, 0.0, 5.0, 5.0).is_horizontal());
    }

    #[test]
    fn vertical_slope_is_half_pi() {
        let vertical = LineSegment::from_coords(1.0, 2.0, 1.0, 5.0);
        assert_eq!(vertical.slope(), FRAC_PI_2);
    }

    #[test]
    fn angle_between_vertical_and_horizontal() {
        let vertical = LineSegment::from_coords(1.0, 2.0, 1.0, 5.0);
        let horizontal = LineSegment::from_coords(1.0, 2.0, 2.0, 2.0);
        let expected = (-FRAC_PI_2).atan();
        assert!((vertical.angle_between(&horizontal) - expected).abs() < EPS);
        assert!((horizontal.angle_between(&vertical) + expected).abs() < EPS);
    }

    #[test]
    fn angle_between_two_verticals_is_zero() {
        let a = LineSegment::from_coords(0.0, 0.0, 0.0, 10.0);
        let b = LineSegment::from_coords(7.0, 3.0, 7.0, 1.0);
        let angle = a.angle_between(&b);
        assert!(angle.is_finite());
        assert!(angle.abs() < EPS);
    }

    #[test]
    fn angle_between_is_antisymmetric() {
        let pairs = [
            (
                LineSegment::from_coords(0.0, 0.0, 10.0, 5.0),
                LineSegment::from_coords(0.0, 0.0, 3.0, 9.0),
            ),
            (
                LineSegment::from_coords(2.0, 1.0, 6.0, 5.0),
                LineSegment::from_coords(3.0, 0.0, 1.0, 3.0),
            ),
            (
                LineSegment::from_coords(0.0, 0.0, 0.0, 4.0),
                LineSegment::from_coords(0.0, 0.0, 4.0, 1.0),
            ),
        ];
        for (a, b) in pairs {
            let ab = a.angle_between(&b);
            let ba = b.angle_between(&a);
            assert!((ab + ba).abs() < EPS, "{ab} vs {ba}");
        }
    }

    #[test]
    fn perpendicular_slopes_do_not_produce_nan() {
        let up = LineSegment::from_coords(0.0, 0.0, 1.0, 1.0);
        let down = LineSegment::from_coords(0.0, 0.0, 1.0, -1.0);
        assert_eq!(up.angle_between(&down), -FRAC_PI_2);
        assert_eq!(down.angle_between(&up), FRAC_PI_2);
    }

    #[test]
    fn overlapping_boxes_have_zero_distance() {
        let a = LineSegment::from_coords(2.0, 1.0, 6.0, 5.0);
        let b = LineSegment::from_coords(3.0, 0.0, 1.0, 3.0);
        assert_eq!(a.distance_between(&b), 0.0);
        assert_eq!(b.distance_between(&a), 0.0);
        assert_eq!(a.distance_between(&a), 0.0);
    }

    #[test]
    fn overlap_ignores_endpoint_order() {
        let a = LineSegment::from_coords(10.0, 10.0, 0.0, 0.0);
        let b = LineSegment::from_coords(5.0, 8.0, 6.0, 2.0);
        assert_eq!(a.distance_between(&b), 0.0);
    }

    #[test]
    fn disjoint_boxes_use_nearest_endpoints() {
        let a = LineSegment::from_coords(0.0, 0.0, 10.0, 0.0);
        let b = LineSegment::from_coords(20.0, 3.0, 30.0, 3.0);
        let expected = (100.0f64 + 9.0).sqrt();
        assert!((a.distance_between(&b) - expected).abs() < EPS);
        assert!(!a.is_neighbour(&b, DEFAULT_NEIGHBOUR_DISTANCE));
    }

    #[test]
    fn segments_sharing_an_endpoint_are_neighbours() {
        let a = LineSegment::from_coords(0.0, 0.0, 10.0, 0.0);
        let b = LineSegment::from_coords(10.0, 0.0, 10.0, 10.0);
        assert!(a.is_neighbour(&b, DEFAULT_NEIGHBOUR_DISTANCE));
        assert!(b.is_neighbour(&a, DEFAULT_NEIGHBOUR_DISTANCE));
    }

    #[test]
    fn equality_is_order_sensitive() {
        let a = LineSegment::from_coords(0.0, 0.0, 10.0, 0.0);
        assert_eq!(a, LineSegment::from_coords(0.0, 0.0, 10.0, 0.0));
        assert_ne!(a, a.reversed());
    }

    #[test]
    fn padded_bounds() {
        let a = LineSegment::from_coords(0.0, 0.0, 10.0, 0.0);
        assert!(a.bounds_contain(&Point::new(12.0, 4.0), 5.0));
        assert!(!a.bounds_contain(&Point::new(16.0, 0.0), 5.0));
    }
}
