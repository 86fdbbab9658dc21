// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Four-point homography estimation via the 8×8 direct linear system.

use docquad_core::{DocquadError, Result};
use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

use crate::geometry::Point;

/// Triangles with less than this doubled area count as collinear.
const COLLINEAR_EPS: f64 = 1e-6;
/// Smallest acceptable |det(H)| after normalising h33 to 1.
const SINGULAR_EPS: f64 = 1e-10;

/// A projective transform `[u, v, w]ᵀ = H · [x, y, 1]ᵀ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography {
    matrix: Matrix3<f64>,
}

impl Homography {
    /// Solve for the homography mapping each `src[i]` onto `dst[i]`, with
    /// `h33` fixed to 1.
    ///
    /// Fails with [`DocquadError::DegenerateTransform`] when three points of
    /// either quadrilateral are collinear, the linear system is singular, or
    /// the solution is not finite or not invertible.
    pub fn from_correspondences(src: &[Point; 4], dst: &[Point; 4]) -> Result<Self> {
        check_general_position(src, "source")?;
        check_general_position(dst, "destination")?;

        let mut a = SMatrix::<f64, 8, 8>::zeros();
        let mut b = SVector::<f64, 8>::zeros();
        for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
            let r = 2 * i;
            a[(r, 0)] = s.x;
            a[(r, 1)] = s.y;
            a[(r, 2)] = 1.0;
            a[(r, 6)] = -d.x * s.x;
            a[(r, 7)] = -d.x * s.y;
            b[r] = d.x;

            a[(r + 1, 3)] = s.x;
            a[(r + 1, 4)] = s.y;
            a[(r + 1, 5)] = 1.0;
            a[(r + 1, 6)] = -d.y * s.x;
            a[(r + 1, 7)] = -d.y * s.y;
            b[r + 1] = d.y;
        }

        let h = a.lu().solve(&b).ok_or_else(|| {
            DocquadError::DegenerateTransform("correspondence system is singular".into())
        })?;
        if h.iter().any(|v| !v.is_finite()) {
            return Err(DocquadError::DegenerateTransform(
                "non-finite homography coefficients".into(),
            ));
        }

        let matrix = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0);
        let det = matrix.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPS {
            return Err(DocquadError::DegenerateTransform(format!(
                "homography is not invertible (det = {det:e})"
            )));
        }
        Ok(Self { matrix })
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Row-major coefficients, as expected by `imageproc`'s `Projection`.
    pub fn to_row_major_f32(&self) -> [f32; 9] {
        let m = &self.matrix;
        [
            m[(0, 0)] as f32,
            m[(0, 1)] as f32,
            m[(0, 2)] as f32,
            m[(1, 0)] as f32,
            m[(1, 1)] as f32,
            m[(1, 2)] as f32,
            m[(2, 0)] as f32,
            m[(2, 1)] as f32,
            m[(2, 2)] as f32,
        ]
    }

    /// Map a point through the transform. `None` when it lands at infinity.
    pub fn project(&self, p: &Point) -> Option<Point> {
        let v = self.matrix * Vector3::new(p.x, p.y, 1.0);
        if v[2].abs() < f64::EPSILON {
            return None;
        }
        Some(Point::new(v[0] / v[2], v[1] / v[2]))
    }
}

/// Reject quadrilaterals where any three corners are (nearly) collinear.
fn check_general_position(points: &[Point; 4], label: &str) -> Result<()> {
    for skip in 0..4 {
        let tri: Vec<&Point> = points
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .map(|(_, p)| p)
            .collect();
        let doubled_area = (tri[1].x - tri[0].x) * (tri[2].y - tri[0].y)
            - (tri[2].x - tri[0].x) * (tri[1].y - tri[0].y);
        if doubled_area.abs() < COLLINEAR_EPS {
            return Err(DocquadError::DegenerateTransform(format!(
                "{label} corners contain a collinear triple"
            )));
        }
    }
    Ok(())
}
