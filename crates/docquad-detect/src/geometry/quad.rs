// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use serde::{Deserialize, Serialize};

use super::point::Point;
use super::segment::LineSegment;

/// Four labelled corners of a candidate document boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quadrilateral {
    pub tl: Point,
    pub tr: Point,
    pub br: Point,
    pub bl: Point,
}

/// Integer axis-aligned rectangle, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Quadrilateral {
    pub const fn new(tl: Point, tr: Point, br: Point, bl: Point) -> Self {
        Self { tl, tr, br, bl }
    }

    pub fn top(&self) -> LineSegment {
        LineSegment::new(self.tl, self.tr)
    }

    pub fn right(&self) -> LineSegment {
        LineSegment::new(self.br, self.tr)
    }

    pub fn bottom(&self) -> LineSegment {
        LineSegment::new(self.bl, self.br)
    }

    pub fn left(&self) -> LineSegment {
        LineSegment::new(self.bl, self.tl)
    }

    /// Corners in drawing order: tl, tr, br, bl.
    pub fn corners(&self) -> [Point; 4] {
        [self.tl, self.tr, self.br, self.bl]
    }

    /// Ranking score: the largest product of two adjacent edge lengths.
    ///
    /// An upper-bound estimate that equals the true area for rectangles and
    /// overestimates skewed shapes. Use [`shoelace_area`](Self::shoelace_area)
    /// for the exact polygon area.
    pub fn area(&self) -> f64 {
        let top = self.top().length();
        let right = self.right().length();
        let bottom = self.bottom().length();
        let left = self.left().length();
        [bottom * left, bottom * right, top * left, top * right]
            .into_iter()
            .fold(0.0, f64::max)
    }

    /// Exact area of the polygon tl → tr → br → bl.
    pub fn shoelace_area(&self) -> f64 {
        let corners = self.corners();
        let mut twice = 0.0;
        for i in 0..corners.len() {
            let a = corners[i];
            let b = corners[(i + 1) % corners.len()];
            twice += a.x * b.y - b.x * a.y;
        }
        twice.abs() / 2.0
    }

    /// Smallest pixel rectangle covering the four corners. Width and height
    /// are at least 1.
    pub fn bounding_rect(&self) -> BoundingRect {
        let corners = self.corners();
        let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_x = corners
            .iter()
            .map(|p| p.x)
            .fold(f64::NEG_INFINITY, f64::max);
        let max_y = corners
            .iter()
            .map(|p| p.y)
            .fold(f64::NEG_INFINITY, f64::max);

        BoundingRect {
            x: min_x.floor().max(0.0) as u32,
            y: min_y.floor().max(0.0) as u32,
            width: (max_x - min_x).round().max(1.0) as u32,
            height: (max_y - min_y).round().max(1.0) as u32,
        }
    }
}
