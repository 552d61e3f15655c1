//! Planar primitives: points, oriented segments and line intersection.
//!
//! Coordinates are image pixels (`x` to the right, `y` downwards) in `f64`.

mod point;
mod segment;

pub use point::Point2D;
pub use segment::{Orientation, Segment};

/// Signed area of the polygon (shoelace). Positive for clockwise vertices in
/// image coordinates.
pub fn polygon_area(points: &[Point2D]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        acc += p.x * q.y - q.x * p.y;
    }
    0.5 * acc
}

/// Cross product of `(a - o)` and `(b - o)`.
#[inline]
pub fn cross(o: Point2D, a: Point2D, b: Point2D) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Whether `p` lies inside or on the boundary of a convex polygon.
pub fn convex_contains(polygon: &[Point2D], p: Point2D) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut sign = 0.0f64;
    for (i, &a) in polygon.iter().enumerate() {
        let b = polygon[(i + 1) % polygon.len()];
        let c = cross(a, b, p);
        if c == 0.0 {
            continue;
        }
        if sign == 0.0 {
            sign = c.signum();
        } else if c.signum() != sign {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point2D> {
        vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(0.0, 10.0),
        ]
    }

    #[test]
    fn shoelace_area_of_square() {
        assert_eq!(polygon_area(&square()), 100.0);
        let mut ccw = square();
        ccw.reverse();
        assert_eq!(polygon_area(&ccw), -100.0);
    }

    #[test]
    fn convex_contains_includes_boundary() {
        let sq = square();
        assert!(convex_contains(&sq, Point2D::new(5.0, 5.0)));
        assert!(convex_contains(&sq, Point2D::new(0.0, 5.0)));
        assert!(!convex_contains(&sq, Point2D::new(10.5, 5.0)));
    }
}
