use super::Point2D;
use serde::{Deserialize, Serialize};

const PARALLEL_EPS: f64 = 1e-12;

/// Dominant direction of a segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Directed line segment with an orientation tag.
///
/// Two segments compare equal when their endpoint sets match, whatever the
/// direction they were traced in.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point2D,
    pub end: Point2D,
    pub orientation: Orientation,
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        (self.start == other.start && self.end == other.end)
            || (self.start == other.end && self.end == other.start)
    }
}

impl Segment {
    pub fn new(start: Point2D, end: Point2D, orientation: Orientation) -> Self {
        Self {
            start,
            end,
            orientation,
        }
    }

    /// Tag the orientation from the endpoints: horizontal when `|Δx| > |Δy|`.
    pub fn from_endpoints(start: Point2D, end: Point2D) -> Self {
        let orientation = if (end.x - start.x).abs() > (end.y - start.y).abs() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        Self::new(start, end, orientation)
    }

    /// Axis-aligned horizontal segment at height `y`.
    pub fn horizontal(y: f64, x0: f64, x1: f64) -> Self {
        Self::new(
            Point2D::new(x0, y),
            Point2D::new(x1, y),
            Orientation::Horizontal,
        )
    }

    /// Axis-aligned vertical segment at abscissa `x`.
    pub fn vertical(x: f64, y0: f64, y1: f64) -> Self {
        Self::new(
            Point2D::new(x, y0),
            Point2D::new(x, y1),
            Orientation::Vertical,
        )
    }

    #[inline]
    pub fn dx(&self) -> f64 {
        self.end.x - self.start.x
    }

    #[inline]
    pub fn dy(&self) -> f64 {
        self.end.y - self.start.y
    }

    pub fn midpoint(&self) -> Point2D {
        Point2D::new(
            (self.start.x + self.end.x) * 0.5,
            (self.start.y + self.end.y) * 0.5,
        )
    }

    pub fn length(&self) -> f64 {
        self.dx().hypot(self.dy())
    }

    /// Direction angle `atan2(Δy, Δx)` in (−π, π].
    pub fn angle(&self) -> f64 {
        self.dy().atan2(self.dx())
    }

    fn is_axis_aligned(&self) -> bool {
        match self.orientation {
            Orientation::Horizontal => self.start.y == self.end.y,
            Orientation::Vertical => self.start.x == self.end.x,
        }
    }

    /// Intersection of the infinite lines through two segments of different
    /// orientation. Same-orientation pairs are parallel by model and never meet.
    ///
    /// For an exactly horizontal and an exactly vertical line the result is
    /// `(vertical.x, horizontal.y)` with no arithmetic error.
    pub fn meet(&self, other: &Segment) -> Option<Point2D> {
        if self.orientation == other.orientation {
            return None;
        }
        let (h, v) = match self.orientation {
            Orientation::Horizontal => (self, other),
            Orientation::Vertical => (other, self),
        };
        if h.is_axis_aligned() && v.is_axis_aligned() {
            return Some(Point2D::new(v.start.x, h.start.y));
        }

        let (x1, y1, x2, y2) = (h.start.x, h.start.y, h.end.x, h.end.y);
        let (x3, y3, x4, y4) = (v.start.x, v.start.y, v.end.x, v.end.y);
        let denom = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
        if denom.abs() < PARALLEL_EPS {
            return None;
        }
        let a = x1 * y2 - y1 * x2;
        let b = x3 * y4 - y3 * x4;
        let p = Point2D::new(
            (a * (x3 - x4) - (x1 - x2) * b) / denom,
            (a * (y3 - y4) - (y1 - y2) * b) / denom,
        );
        p.is_finite().then_some(p)
    }
}
