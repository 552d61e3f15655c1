use super::BorderSide;
use crate::geometry::{Point2D, Segment};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackOptions {
    /// Distance of the synthetic border lines from the frame edge.
    pub inset_px: f64,
}

impl Default for FallbackOptions {
    fn default() -> Self {
        Self { inset_px: 5.0 }
    }
}

/// Border lines synthesized from the frame edges.
///
/// Corners sit at `(inset, inset)` and `(w-1-inset, h-1-inset)`, so the
/// quadrilateral they bound lies fully inside the frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FallbackLines {
    pub top: Segment,
    pub bottom: Segment,
    pub left: Segment,
    pub right: Segment,
}

impl FallbackLines {
    pub fn frame_edges(width: usize, height: usize, options: &FallbackOptions) -> Self {
        let inset = options.inset_px.max(0.0);
        let x0 = inset.min((width as f64 - 1.0) * 0.5).max(0.0);
        let y0 = inset.min((height as f64 - 1.0) * 0.5).max(0.0);
        let x1 = (width as f64 - 1.0 - inset).max(x0);
        let y1 = (height as f64 - 1.0 - inset).max(y0);
        Self {
            top: Segment::horizontal(y0, x0, x1),
            bottom: Segment::horizontal(y1, x0, x1),
            left: Segment::vertical(x0, y0, y1),
            right: Segment::vertical(x1, y0, y1),
        }
    }

    pub fn get(&self, side: BorderSide) -> Segment {
        match side {
            BorderSide::Top => self.top,
            BorderSide::Bottom => self.bottom,
            BorderSide::Left => self.left,
            BorderSide::Right => self.right,
        }
    }

    pub fn corners(&self) -> [Point2D; 4] {
        [
            self.top.start,
            self.top.end,
            self.bottom.end,
            self.bottom.start,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Orientation;

    #[test]
    fn frame_edges_are_inset() {
        let lines = FallbackLines::frame_edges(200, 100, &FallbackOptions::default());
        assert_eq!(lines.top, Segment::horizontal(5.0, 5.0, 194.0));
        assert_eq!(lines.bottom, Segment::horizontal(94.0, 5.0, 194.0));
        assert_eq!(lines.left.orientation, Orientation::Vertical);
        assert_eq!(lines.right.start.x, 194.0);
        assert_eq!(lines.corners()[2], Point2D::new(194.0, 94.0));
    }

    #[test]
    fn tiny_frames_do_not_invert() {
        let lines = FallbackLines::frame_edges(4, 4, &FallbackOptions::default());
        assert!(lines.top.start.x <= lines.top.end.x);
        assert!(lines.left.start.y <= lines.left.end.y);
    }
}
