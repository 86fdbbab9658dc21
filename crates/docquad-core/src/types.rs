// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain enums shared between the detector, the CLI, and reports.

use serde::{Deserialize, Serialize};

/// What `detect_and_rectify` should hand back to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Perspective-corrected crop of the detected document.
    #[default]
    Rectify,
    /// Working image annotated with every candidate quadrilateral.
    ShowQuads,
    /// Working image annotated with every extracted line segment.
    ShowLines,
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputMode::Rectify => "rectify",
            OutputMode::ShowQuads => "show-quads",
            OutputMode::ShowLines => "show-lines",
        };
        f.write_str(name)
    }
}

/// How the grayscale working image is turned into a binary edge map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgeMap {
    /// Mean-C adaptive threshold, inverted so dark structure is foreground.
    AdaptiveThreshold {
        /// Side of the square averaging window (odd, e.g. 85).
        block_size: u32,
        /// Constant subtracted from the local mean.
        constant: f64,
    },
    /// Canny edge detector with hysteresis thresholds.
    Canny { low: f32, high: f32 },
    /// Saturated |gx| + |gy| Sobel magnitude, then a binary threshold.
    Sobel { threshold: u8 },
}

impl Default for EdgeMap {
    fn default() -> Self {
        EdgeMap::AdaptiveThreshold {
            block_size: 85,
            constant: 10.0,
        }
    }
}

/// Which determinant signs the corner clusterer accepts when intersecting
/// two segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntersectionRule {
    /// Accept only a strictly negative determinant. Direction-sensitive:
    /// the same pair may be accepted or rejected depending on which segment
    /// comes first and which way each one runs.
    #[default]
    NegativeDeterminant,
    /// Accept any non-zero determinant (a plain non-parallel check).
    AnySign,
}

/// Result class of one detection run. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionOutcome {
    /// At least one quadrilateral candidate was found.
    Found,
    /// The line extractor produced no segments.
    NoLinesFound,
    /// Segments exist but no corner group produced a quadrilateral.
    NoQuadrilateralFound,
}
