use super::{GridError, Slice};
use crate::geometry::{Point2D, Segment};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Lines per direction; `n` lines give `(n-1)²` cells and `n²` points.
    pub lines: usize,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self { lines: 5 }
    }
}

/// Evenly spaced grid over `[x0, x1] × [0, height]`.
///
/// Immutable once built; a new slice or size means a new grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub x0: f64,
    pub x1: f64,
    pub height: f64,
    pub horizontal: Vec<Segment>,
    pub vertical: Vec<Segment>,
    points: Vec<Point2D>,
}

fn spaced(from: f64, to: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 {
        (to - from) / (n - 1) as f64
    } else {
        0.0
    };
    (0..n).map(move |k| from + k as f64 * step)
}

impl Grid {
    pub fn new(x0: f64, x1: f64, height: f64, options: &GridOptions) -> Result<Self, GridError> {
        if !(x0.is_finite() && x1.is_finite() && height.is_finite()) || x1 <= x0 || height <= 0.0 {
            return Err(GridError::InvalidSpan { x0, x1, height });
        }
        let n = options.lines;
        let horizontal: Vec<Segment> = spaced(0.0, height, n)
            .map(|y| Segment::horizontal(y, x0, x1))
            .collect();
        let vertical: Vec<Segment> = spaced(x0, x1, n)
            .map(|x| Segment::vertical(x, 0.0, height))
            .collect();

        let all: Vec<&Segment> = horizontal.iter().chain(vertical.iter()).collect();
        let mut points = Vec::with_capacity(n * n);
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                if a.orientation == b.orientation {
                    continue;
                }
                if let Some(p) = a.meet(b) {
                    points.push(p);
                }
            }
        }
        log::debug!(
            "grid: {n}x{n} over x=[{x0:.1}, {x1:.1}], {} points",
            points.len()
        );

        Ok(Self {
            x0,
            x1,
            height,
            horizontal,
            vertical,
            points,
        })
    }

    pub fn for_slice(slice: &Slice, height: f64, options: &GridOptions) -> Result<Self, GridError> {
        Self::new(slice.x0, slice.x1, height, options)
    }

    /// Intersection points, row by row from the top.
    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.horizontal.iter().chain(self.vertical.iter())
    }

    /// Lattice point nearest to `click`. Ties keep the earlier point.
    pub fn resolve_selection(&self, click: Point2D) -> Result<Point2D, GridError> {
        let mut best: Option<(f64, Point2D)> = None;
        for &p in &self.points {
            let d = p.distance(&click);
            if best.map_or(true, |(bd, _)| d < bd) {
                best = Some((d, p));
            }
        }
        best.map(|(_, p)| p).ok_or(GridError::EmptyLattice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_by_five_over_unit_square() {
        let grid = Grid::new(0.0, 100.0, 100.0, &GridOptions::default()).expect("valid span");
        assert_eq!(grid.horizontal.len(), 5);
        assert_eq!(grid.vertical.len(), 5);
        let pts = grid.points();
        assert_eq!(pts.len(), 25);
        for p in pts {
            assert_eq!(p.x % 25.0, 0.0, "{p:?}");
            assert_eq!(p.y % 25.0, 0.0, "{p:?}");
            assert!((0.0..=100.0).contains(&p.x) && (0.0..=100.0).contains(&p.y));
        }
        let mut unique = pts.to_vec();
        unique.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        unique.dedup();
        assert_eq!(unique.len(), 25);
        assert_eq!(pts[0], Point2D::new(0.0, 0.0));
        assert_eq!(pts[24], Point2D::new(100.0, 100.0));
    }

    #[test]
    fn offset_slice_spans_its_columns() {
        let grid = Grid::new(200.0, 400.0, 80.0, &GridOptions::default()).expect("valid");
        let xs: Vec<f64> = grid.vertical.iter().map(|s| s.start.x).collect();
        assert_eq!(xs, vec![200.0, 250.0, 300.0, 350.0, 400.0]);
        assert_eq!(grid.horizontal[1].start.y, 20.0);
    }

    #[test]
    fn selection_snaps_to_nearest_point() {
        let grid = Grid::new(0.0, 100.0, 100.0, &GridOptions::default()).expect("valid");
        let p = grid.resolve_selection(Point2D::new(58.0, 33.0)).expect("non-empty");
        assert_eq!(p, Point2D::new(50.0, 25.0));
        let p = grid.resolve_selection(Point2D::new(-40.0, 500.0)).expect("non-empty");
        assert_eq!(p, Point2D::new(0.0, 100.0));
    }

    #[test]
    fn empty_lattice_is_an_error() {
        let grid = Grid::new(0.0, 10.0, 10.0, &GridOptions { lines: 0 }).expect("valid span");
        assert!(grid.points().is_empty());
        assert_eq!(
            grid.resolve_selection(Point2D::new(1.0, 1.0)),
            Err(GridError::EmptyLattice)
        );
    }

    #[test]
    fn inverted_span_is_rejected() {
        assert!(matches!(
            Grid::new(50.0, 10.0, 100.0, &GridOptions::default()),
            Err(GridError::InvalidSpan { .. })
        ));
    }
}
