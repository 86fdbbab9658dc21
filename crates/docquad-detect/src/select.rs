// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quadrilateral selection: corner labelling and area ranking of the
// clustered corner groups.

use tracing::{debug, info, instrument};

use crate::cluster::CornerGroup;
use crate::geometry::{Point, Quadrilateral};

/// Groups with fewer points than this are not quadrilateral evidence.
pub const MIN_CORNER_POINTS: usize = 4;

/// Label a point cloud's extremal corners as tl, tr, br, bl.
///
/// Points above the centroid (`y < cy`) form the top half, the rest the
/// bottom half. Each half is sorted by x then y; its first and last points
/// become the left and right corners. The heuristic assumes the cloud splits
/// cleanly into upper and lower corners, so near-degenerate shapes or pages
/// rotated past 45° are labelled poorly. Returns `None` when either half is
/// empty.
pub fn sort_corners(points: &[Point]) -> Option<Quadrilateral> {
    let center = Point::centroid(points)?;

    let (mut top, mut bottom): (Vec<Point>, Vec<Point>) =
        points.iter().partition(|p| p.y < center.y);
    top.sort_by(Point::total_cmp);
    bottom.sort_by(Point::total_cmp);

    let tl = *top.first()?;
    let tr = *top.last()?;
    let bl = *bottom.first()?;
    let br = *bottom.last()?;
    Some(Quadrilateral::new(tl, tr, br, bl))
}

/// Build one quadrilateral per group with at least four points and rank them
/// by [`Quadrilateral::area`], largest first. Equal areas keep group order.
#[instrument(skip_all, fields(groups = groups.len()))]
pub fn rank_quadrilaterals(groups: &[CornerGroup]) -> Vec<Quadrilateral> {
    let mut quads: Vec<Quadrilateral> = groups
        .iter()
        .filter(|g| g.len() >= MIN_CORNER_POINTS)
        .filter_map(|g| {
            let quad = sort_corners(&g.points);
            if quad.is_none() {
                debug!(group = g.id, "Corner group could not be split into halves");
            }
            quad
        })
        .collect();

    quads.sort_by(|a, b| b.area().total_cmp(&a.area()));
    info!(candidates = quads.len(), "Quadrilaterals ranked");
    quads
}

/// The highest-ranked quadrilateral, if any group produced one.
pub fn select_best(groups: &[CornerGroup]) -> Option<Quadrilateral> {
    rank_quadrilaterals(groups).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: usize, points: &[(f64, f64)]) -> CornerGroup {
        CornerGroup {
            id,
            points: points.iter().copied().map(Point::from).collect(),
        }
    }

    #[test]
    fn corners_of_a_noisy_rectangle() {
        let points = [
            (102.0, 99.0),
            (498.0, 101.0),
            (100.0, 101.0),
            (501.0, 399.0),
            (99.0, 402.0),
            (500.0, 400.0),
        ];
        let quad = sort_corners(&points.map(Point::from)).expect("quad");
        assert_eq!(quad.tl, Point::new(100.0, 101.0));
        assert_eq!(quad.tr, Point::new(498.0, 101.0));
        assert_eq!(quad.bl, Point::new(99.0, 402.0));
        assert_eq!(quad.br, Point::new(501.0, 399.0));
    }

    #[test]
    fn flat_cloud_has_no_top_half() {
        let points = [(0.0, 5.0), (10.0, 5.0), (20.0, 5.0), (30.0, 5.0)].map(Point::from);
        assert!(sort_corners(&points).is_none());
    }

    #[test]
    fn small_groups_are_ignored() {
        let groups = [group(0, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)])];
        assert!(rank_quadrilaterals(&groups).is_empty());
        assert!(select_best(&groups).is_none());
    }

    #[test]
    fn largest_quadrilateral_wins() {
        let groups = [
            group(0, &[(10.0, 10.0), (60.0, 10.0), (60.0, 40.0), (10.0, 40.0)]),
            group(3, &[(100.0, 100.0), (500.0, 100.0), (500.0, 400.0), (100.0, 400.0)]),
            group(5, &[(0.0, 0.0), (1.0, 0.0)]),
        ];
        let ranked = rank_quadrilaterals(&groups);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].area(), 120_000.0);
        assert_eq!(ranked[1].area(), 1_500.0);
        assert_eq!(select_best(&groups), Some(ranked[0]));
    }
}
