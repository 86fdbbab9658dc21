// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for docquad.

use thiserror::Error;

/// Top-level error type for all docquad operations.
///
/// Only `EmptyInput` is ever returned by the detection pipeline itself.
/// Geometry-stage anomalies (rejected intersections, empty groups, missing
/// quadrilaterals) are handled locally, and `DegenerateTransform` is caught
/// by the rectifier, which falls back to an unrectified crop.
#[derive(Debug, Error)]
pub enum DocquadError {
    // -- Input errors --
    #[error("input image is empty ({width}x{height})")]
    EmptyInput { width: u32, height: u32 },

    // -- Numerical errors --
    #[error("degenerate perspective transform: {0}")]
    DegenerateTransform(String),

    // -- Image I/O --
    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocquadError>;
