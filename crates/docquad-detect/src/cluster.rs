// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Corner clustering: pairwise segment intersections grouped into connected
// components ("polygons") with a disjoint-set arena.

use docquad_core::IntersectionRule;
use docquad_core::config::ClusterConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::geometry::{LineSegment, Point};

/// Intersection points believed to belong to one polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CornerGroup {
    pub id: usize,
    pub points: Vec<Point>,
}

impl CornerGroup {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Intersection of the infinite lines through `first` and `second`, accepted
/// only if it lies on both segments (within `padding`).
///
/// With `x1,y1 = first.end`, `x2,y2 = first.start`, `x3,y3 = second.end`,
/// `x4,y4 = second.start`, the determinant is
/// `d = (x1−x2)(y3−y4) − (y1−y2)(x3−x4)`. Under
/// [`IntersectionRule::NegativeDeterminant`] only `d < 0` is accepted, so the
/// result depends on argument order and segment direction; swapping the two
/// segments flips the sign of `d`.
pub fn intersect(
    first: &LineSegment,
    second: &LineSegment,
    padding: f64,
    rule: IntersectionRule,
) -> Option<Point> {
    let (x1, y1, x2, y2) = (first.end.x, first.end.y, first.start.x, first.start.y);
    let (x3, y3, x4, y4) = (second.end.x, second.end.y, second.start.x, second.start.y);
    let d = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);

    let accepted = match rule {
        IntersectionRule::NegativeDeterminant => d < 0.0,
        IntersectionRule::AnySign => d != 0.0,
    };
    if !accepted {
        return None;
    }

    let a = x1 * y2 - y1 * x2;
    let b = x3 * y4 - y3 * x4;
    let point = Point::new(
        (a * (x3 - x4) - (x1 - x2) * b) / d,
        (a * (y3 - y4) - (y1 - y2) * b) / d,
    );

    if !point.x.is_finite() || !point.y.is_finite() {
        return None;
    }
    (first.bounds_contain(&point, padding) && second.bounds_contain(&point, padding))
        .then_some(point)
}

/// Disjoint-set arena over corner groups.
///
/// Each group record owns its points; merged groups are emptied and keep a
/// parent link so every segment that pointed at them follows to the survivor.
#[derive(Debug, Default)]
struct GroupArena {
    points: Vec<Vec<Point>>,
    parent: Vec<usize>,
}

impl GroupArena {
    fn create(&mut self, point: Point) -> usize {
        let id = self.points.len();
        self.points.push(vec![point]);
        self.parent.push(id);
        id
    }

    fn find(&mut self, id: usize) -> usize {
        let mut root = id;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = id;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    fn push(&mut self, id: usize, point: Point) {
        self.points[id].push(point);
    }

    /// Move every point of `from` into `into` and redirect `from` to `into`.
    fn absorb(&mut self, into: usize, from: usize) {
        let moved = std::mem::take(&mut self.points[from]);
        self.points[into].extend(moved);
        self.parent[from] = into;
    }

    fn into_groups(self) -> Vec<CornerGroup> {
        self.points
            .into_iter()
            .enumerate()
            .filter(|(_, points)| !points.is_empty())
            .map(|(id, points)| CornerGroup { id, points })
            .collect()
    }
}

/// Groups mutually intersecting segments into corner clouds.
#[derive(Debug, Clone, Default)]
pub struct CornerClusterer {
    config: ClusterConfig,
}

impl CornerClusterer {
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    /// Cluster `segments` inside a `width × height` frame.
    ///
    /// For every pair `i < j` with an accepted intersection inside the frame:
    ///
    /// - neither segment grouped: a new group holds the point;
    /// - one grouped: the point joins that group and the other segment follows;
    /// - same group: the point is appended;
    /// - different groups: `j`'s group is folded into `i`'s. The bridging
    ///   point itself is not recorded.
    ///
    /// Returns the non-empty groups in creation order. The result depends only
    /// on the segment list, so repeated runs are identical.
    #[instrument(skip_all, fields(segments = segments.len(), width, height))]
    pub fn cluster(&self, segments: &[LineSegment], width: u32, height: u32) -> Vec<CornerGroup> {
        let mut arena = GroupArena::default();
        let mut assigned: Vec<Option<usize>> = vec![None; segments.len()];
        let mut accepted = 0usize;

        for i in 0..segments.len() {
            for j in (i + 1)..segments.len() {
                let Some(point) =
                    intersect(&segments[i], &segments[j], self.config.padding, self.config.rule)
                else {
                    continue;
                };
                if !(point.x >= 0.0
                    && point.y >= 0.0
                    && point.x < width as f64
                    && point.y < height as f64)
                {
                    continue;
                }
                accepted += 1;

                let gi = assigned[i].map(|g| arena.find(g));
                let gj = assigned[j].map(|g| arena.find(g));
                let group = match (gi, gj) {
                    (None, None) => arena.create(point),
                    (Some(g), None) | (None, Some(g)) => {
                        arena.push(g, point);
                        g
                    }
                    (Some(a), Some(b)) if a == b => {
                        arena.push(a, point);
                        a
                    }
                    (Some(a), Some(b)) => {
                        arena.absorb(a, b);
                        a
                    }
                };
                assigned[i] = Some(group);
                assigned[j] = Some(group);
            }
        }

        let groups = arena.into_groups();
        debug!(accepted, "Pairwise intersections accepted");
        info!(groups = groups.len(), "Corner clustering complete");
        groups
    }
}
