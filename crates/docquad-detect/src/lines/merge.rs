// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Greedy merging of nearly collinear, touching segments.

use tracing::debug;

use crate::geometry::{LineSegment, Point};

/// Merge pairs of segments whose angle differs by at most `angle_tolerance`
/// and that are neighbours within `neighbour_distance`.
///
/// The first qualifying pair found in index order is replaced by one
/// spanning segment (stored at the lower index) and the scan restarts from
/// the beginning, so merges can cascade. The pass ends when a full scan finds
/// nothing to merge.
///
/// The reduction is greedy and order-sensitive: a different input order can
/// leave a different number of segments, and the result is not guaranteed to
/// be the minimum possible. Running it again on its own output changes
/// nothing.
pub fn merge_segments(
    mut segments: Vec<LineSegment>,
    angle_tolerance: f64,
    neighbour_distance: f64,
) -> Vec<LineSegment> {
    let before = segments.len();
    let mut merges = 0usize;

    'scan: loop {
        for i in 0..segments.len() {
            for j in (i + 1)..segments.len() {
                let (a, b) = (segments[i], segments[j]);
                if a.angle_between(&b).abs() <= angle_tolerance
                    && a.is_neighbour(&b, neighbour_distance)
                {
                    segments[i] = span(&a, &b);
                    segments.remove(j);
                    merges += 1;
                    continue 'scan;
                }
            }
        }
        break;
    }

    debug!(before, after = segments.len(), merges, "Segment merge pass");
    segments
}

/// One segment covering both inputs.
///
/// Horizontal-dominant pairs (judged on `a`) run from the endpoint with the
/// smallest x to the endpoint with the largest x; vertical-dominant pairs
/// from the smallest y to the largest y.
pub fn span(a: &LineSegment, b: &LineSegment) -> LineSegment {
    let endpoints = [a.start, a.end, b.start, b.end];
    let key: fn(&Point) -> (f64, f64) = if a.is_horizontal() {
        |p| (p.x, p.y)
    } else {
        |p| (p.y, p.x)
    };
    let ordered = |p: &&Point, q: &&Point| {
        let (p1, p2) = key(p);
        let (q1, q2) = key(q);
        p1.total_cmp(&q1).then_with(|| p2.total_cmp(&q2))
    };

    // Both iterators are over a non-empty array.
    let start = endpoints.iter().min_by(ordered).copied().unwrap_or(a.start);
    let end = endpoints.iter().max_by(ordered).copied().unwrap_or(a.end);
    LineSegment::new(start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const TOL: f64 = PI / 36.0;

    #[test]
    fn touching_collinear_segments_merge() {
        let segments = vec![
            LineSegment::from_coords(0.0, 0.0, 50.0, 1.0),
            LineSegment::from_coords(53.0, 1.0, 120.0, 2.0),
        ];
        let merged = merge_segments(segments, TOL, 5.0);
        assert_eq!(merged, vec![LineSegment::from_coords(0.0, 0.0, 120.0, 2.0)]);
    }

    #[test]
    fn vertical_merge_runs_top_to_bottom() {
        let segments = vec![
            LineSegment::from_coords(10.0, 90.0, 10.0, 40.0),
            LineSegment::from_coords(11.0, 38.0, 11.0, 0.0),
        ];
        let merged = merge_segments(segments, TOL, 5.0);
        assert_eq!(merged, vec![LineSegment::from_coords(11.0, 0.0, 10.0, 90.0)]);
    }

    #[test]
    fn perpendicular_neighbours_stay_apart() {
        let segments = vec![
            LineSegment::from_coords(0.0, 0.0, 10.0, 0.0),
            LineSegment::from_coords(10.0, 0.0, 10.0, 10.0),
        ];
        assert_eq!(merge_segments(segments.clone(), TOL, 5.0), segments);
    }

    #[test]
    fn distant_parallel_segments_stay_apart() {
        let segments = vec![
            LineSegment::from_coords(0.0, 0.0, 100.0, 0.0),
            LineSegment::from_coords(0.0, 40.0, 100.0, 40.0),
        ];
        assert_eq!(merge_segments(segments.clone(), TOL, 5.0), segments);
    }

    #[test]
    fn merges_cascade() {
        let segments = vec![
            LineSegment::from_coords(0.0, 0.0, 30.0, 0.0),
            LineSegment::from_coords(64.0, 0.0, 100.0, 0.0),
            LineSegment::from_coords(32.0, 0.0, 62.0, 0.0),
        ];
        let merged = merge_segments(segments, TOL, 5.0);
        assert_eq!(merged, vec![LineSegment::from_coords(0.0, 0.0, 100.0, 0.0)]);
    }

    #[test]
    fn merge_pass_is_idempotent() {
        let segments = vec![
            LineSegment::from_coords(0.0, 0.0, 40.0, 1.0),
            LineSegment::from_coords(42.0, 1.0, 90.0, 1.0),
            LineSegment::from_coords(5.0, 10.0, 6.0, 80.0),
            LineSegment::from_coords(6.0, 82.0, 7.0, 150.0),
            LineSegment::from_coords(200.0, 200.0, 260.0, 230.0),
            LineSegment::from_coords(300.0, 20.0, 300.0, 70.0),
        ];
        let once = merge_segments(segments, TOL, 5.0);
        let twice = merge_segments(once.clone(), TOL, 5.0);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 4);
    }

    #[test]
    fn empty_input_is_fine() {
        assert!(merge_segments(Vec::new(), TOL, 5.0).is_empty());
    }
}
