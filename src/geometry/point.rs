use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A point in image coordinates.
///
/// Equality is exact. The partial order sorts top to bottom, ties broken left
/// to right, which is the vertex order used when laying out a quadrilateral.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl PartialOrd for Point2D {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.y.partial_cmp(&other.y)? {
            Ordering::Equal => self.x.partial_cmp(&other.x),
            ord => Some(ord),
        }
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point2D {
    fn from((x, y): (i32, i32)) -> Self {
        Self {
            x: x as f64,
            y: y as f64,
        }
    }
}

impl From<[f64; 2]> for Point2D {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_by_y_then_x() {
        let a = Point2D::new(5.0, 1.0);
        let b = Point2D::new(0.0, 2.0);
        let c = Point2D::new(1.0, 2.0);
        assert!(a < b);
        assert!(b < c);
        let mut pts = vec![c, b, a];
        pts.sort_by(|p, q| p.partial_cmp(q).unwrap_or(Ordering::Equal));
        assert_eq!(pts, vec![a, b, c]);
    }

    #[test]
    fn distance_is_euclidean() {
        let d = Point2D::new(0.0, 0.0).distance(&Point2D::new(3.0, 4.0));
        assert_eq!(d, 5.0);
    }
}
