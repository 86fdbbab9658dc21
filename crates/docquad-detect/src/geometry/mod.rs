// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometry primitives: points, line segments, and quadrilaterals with the
// derived metrics used by clustering and ranking.

pub mod point;
pub mod quad;
pub mod segment;

pub use point::Point;
pub use quad::{BoundingRect, Quadrilateral};
pub use segment::{DEFAULT_NEIGHBOUR_DISTANCE, LineSegment};
