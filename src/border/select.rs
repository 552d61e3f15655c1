use super::{BorderSet, BorderSide, FallbackLines};
use crate::angle::{fold_horizontal, fold_vertical, mean_angle};
use crate::geometry::{Orientation, Point2D, Segment};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorOptions {
    /// Two segments within this angle are treated as parallel evidence.
    pub parallel_tol_deg: f64,
    /// Band around the mean angle used when no parallel pair exists.
    pub angle_band_deg: f64,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        Self {
            parallel_tol_deg: 30.0,
            angle_band_deg: 5.0,
        }
    }
}

/// One extended line per border.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BorderLines {
    pub top: Segment,
    pub bottom: Segment,
    pub left: Segment,
    pub right: Segment,
}

impl BorderLines {
    /// Fill sides the selector left empty with the frame-edge lines.
    /// Returns the lines and the sides that were substituted.
    pub fn with_fallback(
        selected: [Option<Segment>; 4],
        fallback: &FallbackLines,
    ) -> (Self, Vec<BorderSide>) {
        let mut substituted = Vec::new();
        let mut pick = |side: BorderSide| match selected[side.index()] {
            Some(seg) => seg,
            None => {
                substituted.push(side);
                fallback.get(side)
            }
        };
        let lines = Self {
            top: pick(BorderSide::Top),
            bottom: pick(BorderSide::Bottom),
            left: pick(BorderSide::Left),
            right: pick(BorderSide::Right),
        };
        if !substituted.is_empty() {
            log::warn!("borders: no candidates for {substituted:?}, using frame edges");
        }
        (lines, substituted)
    }

    pub fn get(&self, side: BorderSide) -> Segment {
        match side {
            BorderSide::Top => self.top,
            BorderSide::Bottom => self.bottom,
            BorderSide::Left => self.left,
            BorderSide::Right => self.right,
        }
    }
}

fn folded_angle(seg: &Segment, orientation: Orientation) -> f64 {
    match orientation {
        Orientation::Horizontal => fold_horizontal(seg.angle()),
        Orientation::Vertical => fold_vertical(seg.angle()),
    }
}

/// Pick the segment that best stands for a class, without extending it.
///
/// The first pair of segments (in input order) within the parallel tolerance
/// wins; of the two, the one closer to the class mean angle is returned.
/// Without such a pair, the first segment within the angle band around the
/// mean is returned, or the first segment when the band is empty.
pub fn select_representative(
    segments: &[Segment],
    orientation: Orientation,
    options: &SelectorOptions,
) -> Option<Segment> {
    let angles: Vec<f64> = segments
        .iter()
        .map(|s| folded_angle(s, orientation))
        .collect();
    let mean = mean_angle(&angles)?;
    let parallel_tol = options.parallel_tol_deg.to_radians();

    let pair = (0..segments.len()).find_map(|i| {
        (i + 1..segments.len())
            .find(|&j| (angles[i] - angles[j]).abs() <= parallel_tol)
            .map(|j| (i, j))
    });
    if let Some((i, j)) = pair {
        let pick = if (angles[j] - mean).abs() < (angles[i] - mean).abs() {
            j
        } else {
            i
        };
        return Some(segments[pick]);
    }

    let band = options.angle_band_deg.to_radians();
    let chosen = angles
        .iter()
        .position(|a| (a - mean).abs() <= band)
        .unwrap_or(0);
    Some(segments[chosen])
}

/// Extend a segment across the whole frame along its direction.
///
/// Horizontal lines span `x ∈ [0, width-1]`, vertical lines span
/// `y ∈ [0, height-1]`. Oblique lines are extended through their
/// slope/intercept form solved at those two coordinates.
pub fn extend_to_frame(
    seg: &Segment,
    orientation: Orientation,
    width: usize,
    height: usize,
) -> Segment {
    let (p, q) = (seg.start, seg.end);
    let x_max = width.saturating_sub(1) as f64;
    let y_max = height.saturating_sub(1) as f64;
    match orientation {
        Orientation::Horizontal => {
            if p.y == q.y {
                return Segment::horizontal(p.y, 0.0, x_max);
            }
            if p.x == q.x {
                return *seg;
            }
            let slope = (q.y - p.y) / (q.x - p.x);
            let y_at = |x: f64| p.y + slope * (x - p.x);
            Segment::new(
                Point2D::new(0.0, y_at(0.0)),
                Point2D::new(x_max, y_at(x_max)),
                Orientation::Horizontal,
            )
        }
        Orientation::Vertical => {
            if p.x == q.x {
                return Segment::vertical(p.x, 0.0, y_max);
            }
            if p.y == q.y {
                return *seg;
            }
            let inv_slope = (q.x - p.x) / (q.y - p.y);
            let x_at = |y: f64| p.x + inv_slope * (y - p.y);
            Segment::new(
                Point2D::new(x_at(0.0), 0.0),
                Point2D::new(x_at(y_max), y_max),
                Orientation::Vertical,
            )
        }
    }
}

/// Representative extended line for each class, `None` for empty classes.
/// Indexed by [`BorderSide::index`].
pub fn select_representatives(
    set: &BorderSet,
    width: usize,
    height: usize,
    options: &SelectorOptions,
) -> [Option<Segment>; 4] {
    BorderSide::ALL.map(|side| {
        let orientation = side.orientation();
        select_representative(set.get(side), orientation, options)
            .map(|seg| extend_to_frame(&seg, orientation, width, height))
    })
}
