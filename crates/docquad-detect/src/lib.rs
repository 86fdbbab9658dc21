// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docquad-detect: Document boundary detection and perspective rectification.
//
// Finds the outline of a page in a photograph (binary edge map, probabilistic
// Hough lines, clustered segment intersections, area-ranked quadrilaterals)
// and flattens it with a four-point homography. Diagnostic modes draw the
// extracted lines or candidate quadrilaterals instead.

pub mod annotate;
pub mod cluster;
pub mod detector;
pub mod geometry;
pub mod lines;
pub mod preprocess;
pub mod rectify;
pub mod select;

// Re-export the primary types so callers can use `docquad_detect::DocumentDetector` etc.
pub use annotate::{ColorSource, FixedColor, RandomColors};
pub use cluster::{CornerClusterer, CornerGroup};
pub use detector::{Detection, DocumentDetector};
pub use geometry::{BoundingRect, LineSegment, Point, Quadrilateral};
pub use lines::LineExtractor;
pub use preprocess::Preprocessor;
pub use rectify::{Homography, Rectifier};
