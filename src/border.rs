//! Wall border extraction from raw line segments.
//!
//! Two stages:
//!
//! - [`classify_segments`] buckets segments into the four border classes by
//!   orientation and by the position of their midpoint relative to the frame
//!   margins. Segments in the middle band are dropped.
//! - [`select_representatives`] reduces each class to a single line and
//!   extends it across the frame.
//!
//! [`FallbackLines`] are the frame's own edges, inset by a few pixels. They are
//! computed once per frame and passed explicitly to both stages, standing in
//! for detection when it produced nothing and for any border class that ended
//! up empty.

mod classify;
mod fallback;
mod select;

pub use classify::{classify_or_fallback, classify_segments, ClassifierOptions};
pub use fallback::{FallbackLines, FallbackOptions};
pub use select::{
    extend_to_frame, select_representative, select_representatives, BorderLines, SelectorOptions,
};

use crate::geometry::{Orientation, Segment};
use serde::{Deserialize, Serialize};

/// One of the four wall borders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl BorderSide {
    pub const ALL: [BorderSide; 4] = [
        BorderSide::Top,
        BorderSide::Bottom,
        BorderSide::Left,
        BorderSide::Right,
    ];

    /// Orientation every segment of this class shares.
    pub fn orientation(self) -> Orientation {
        match self {
            BorderSide::Top | BorderSide::Bottom => Orientation::Horizontal,
            BorderSide::Left | BorderSide::Right => Orientation::Vertical,
        }
    }

    pub fn index(self) -> usize {
        match self {
            BorderSide::Top => 0,
            BorderSide::Bottom => 1,
            BorderSide::Left => 2,
            BorderSide::Right => 3,
        }
    }
}

/// Border candidates keyed by side.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BorderSet {
    pub top: Vec<Segment>,
    pub bottom: Vec<Segment>,
    pub left: Vec<Segment>,
    pub right: Vec<Segment>,
}

impl BorderSet {
    pub fn get(&self, side: BorderSide) -> &[Segment] {
        match side {
            BorderSide::Top => &self.top,
            BorderSide::Bottom => &self.bottom,
            BorderSide::Left => &self.left,
            BorderSide::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, side: BorderSide) -> &mut Vec<Segment> {
        match side {
            BorderSide::Top => &mut self.top,
            BorderSide::Bottom => &mut self.bottom,
            BorderSide::Left => &mut self.left,
            BorderSide::Right => &mut self.right,
        }
    }

    /// Candidate counts in `[top, bottom, left, right]` order.
    pub fn counts(&self) -> [usize; 4] {
        BorderSide::ALL.map(|side| self.get(side).len())
    }

    pub fn is_empty(&self) -> bool {
        BorderSide::ALL.iter().all(|&side| self.get(side).is_empty())
    }

    /// Sides with no candidates.
    pub fn missing_sides(&self) -> Vec<BorderSide> {
        BorderSide::ALL
            .into_iter()
            .filter(|&side| self.get(side).is_empty())
            .collect()
    }
}
