//! Planar projective transforms in `f64`.
//!
//! A [`Homography`] maps image points `p` to `p' ~ H·[x, y, 1]ᵀ`. The four
//! point solve fixes `h₃₃ = 1` and solves the remaining eight unknowns from
//! an 8×8 linear system, the same parameterisation a perspective transform
//! from four correspondences uses.
use crate::geometry::Point2D;
use nalgebra::{Matrix3, SMatrix, SVector, Vector3};
use serde::{Deserialize, Serialize};

const EPS: f64 = 1e-12;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Homography(pub Matrix3<f64>);

impl Homography {
    pub fn identity() -> Self {
        Self(Matrix3::identity())
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.0
    }

    /// Row-major copy, convenient for JSON output.
    pub fn to_rows(&self) -> [[f64; 3]; 3] {
        let m = &self.0;
        [
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ]
    }

    /// Exact homography taking `src[i]` to `dst[i]`.
    ///
    /// Returns `None` when the system is singular (three collinear points or
    /// repeated corners).
    pub fn from_correspondences(src: &[Point2D; 4], dst: &[Point2D; 4]) -> Option<Self> {
        let mut a = SMatrix::<f64, 8, 8>::zeros();
        let mut b = SVector::<f64, 8>::zeros();
        for (k, (s, d)) in src.iter().zip(dst).enumerate() {
            let (r0, r1) = (2 * k, 2 * k + 1);
            a[(r0, 0)] = s.x;
            a[(r0, 1)] = s.y;
            a[(r0, 2)] = 1.0;
            a[(r0, 6)] = -s.x * d.x;
            a[(r0, 7)] = -s.y * d.x;
            b[r0] = d.x;

            a[(r1, 3)] = s.x;
            a[(r1, 4)] = s.y;
            a[(r1, 5)] = 1.0;
            a[(r1, 6)] = -s.x * d.y;
            a[(r1, 7)] = -s.y * d.y;
            b[r1] = d.y;
        }
        let h = a.lu().solve(&b)?;
        if h.iter().any(|v| !v.is_finite()) {
            return None;
        }
        let m = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0);
        if m.determinant().abs() <= EPS {
            return None;
        }
        Some(Self(m))
    }

    /// Map one point; `None` when it lands on the line at infinity.
    #[inline]
    pub fn apply(&self, p: Point2D) -> Option<Point2D> {
        let v = self.0 * Vector3::new(p.x, p.y, 1.0);
        let w = v[2];
        if !w.is_finite() || w.abs() <= EPS {
            return None;
        }
        let out = Point2D::new(v[0] / w, v[1] / w);
        out.is_finite().then_some(out)
    }

    pub fn apply_points(&self, pts: &[Point2D]) -> Option<Vec<Point2D>> {
        pts.iter().map(|&p| self.apply(p)).collect()
    }

    /// Inverse normalised so that `h₃₃ = 1` when possible.
    pub fn inverse(&self) -> Option<Self> {
        let inv = self.0.try_inverse()?;
        let s = inv[(2, 2)];
        let inv = if s.abs() > EPS { inv / s } else { inv };
        inv.iter().all(|v| v.is_finite()).then_some(Self(inv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point2D, b: Point2D, tol: f64) -> bool {
        (a.x - b.x).abs() <= tol && (a.y - b.y).abs() <= tol
    }

    fn rect(w: f64, h: f64) -> [Point2D; 4] {
        [
            Point2D::new(0.0, 0.0),
            Point2D::new(w, 0.0),
            Point2D::new(w, h),
            Point2D::new(0.0, h),
        ]
    }

    #[test]
    fn maps_corners_exactly() {
        let src = [
            Point2D::new(112.0, 87.0),
            Point2D::new(530.0, 61.0),
            Point2D::new(590.0, 410.0),
            Point2D::new(80.0, 440.0),
        ];
        let dst = rect(800.0, 600.0);
        let h = Homography::from_correspondences(&src, &dst).expect("solvable");
        for (s, d) in src.iter().zip(&dst) {
            let p = h.apply(*s).expect("finite");
            assert!(approx(p, *d, 1e-6), "{p:?} vs {d:?}");
        }
    }

    #[test]
    fn inverse_round_trips() {
        let src = [
            Point2D::new(10.0, 20.0),
            Point2D::new(300.0, 15.0),
            Point2D::new(320.0, 260.0),
            Point2D::new(5.0, 240.0),
        ];
        let h = Homography::from_correspondences(&src, &rect(400.0, 300.0)).expect("solvable");
        let inv = h.inverse().expect("invertible");
        let p = Point2D::new(150.0, 120.0);
        let back = inv.apply(h.apply(p).expect("finite")).expect("finite");
        assert!(approx(p, back, 1e-9));
    }

    #[test]
    fn collinear_points_are_singular() {
        let src = [
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(20.0, 0.0),
            Point2D::new(30.0, 0.0),
        ];
        assert!(Homography::from_correspondences(&src, &rect(10.0, 10.0)).is_none());
    }

    #[test]
    fn identity_for_identical_quads() {
        let q = rect(50.0, 30.0);
        let h = Homography::from_correspondences(&q, &q).expect("solvable");
        assert!((h.0 - Matrix3::identity()).abs().max() < 1e-12);
    }
}
