//! Corner Resolver.
//!
//! Intersects the four border lines, orders the corners canonically
//! (top-left, top-right, bottom-right, bottom-left) and validates the result.
//! An invalid quadrilateral is replaced by a default rectangle inset from the
//! frame, so rectification never receives a degenerate shape from detection.
//! Manually supplied corners, in any order, go through the same path.

use crate::border::BorderLines;
use crate::geometry::{cross, polygon_area, Point2D};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CornerOptions {
    /// Inset of the default rectangle from the frame edges.
    pub default_inset_px: f64,
}

impl Default for CornerOptions {
    fn default() -> Self {
        Self {
            default_inset_px: 10.0,
        }
    }
}

/// Four corners in canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quadrilateral {
    pub tl: Point2D,
    pub tr: Point2D,
    pub br: Point2D,
    pub bl: Point2D,
}

impl Quadrilateral {
    /// Order four points: split by `x` into a left and a right pair, then
    /// sort each pair by `y`.
    pub fn from_unordered(points: [Point2D; 4]) -> Self {
        let mut by_x = points;
        by_x.sort_by(|a, b| a.x.total_cmp(&b.x));
        let by_y = |a: &Point2D, b: &Point2D| a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal);
        let mut left = [by_x[0], by_x[1]];
        let mut right = [by_x[2], by_x[3]];
        left.sort_by(by_y);
        right.sort_by(by_y);
        Self {
            tl: left[0],
            tr: right[0],
            br: right[1],
            bl: left[1],
        }
    }

    /// Axis-aligned rectangle `(inset, inset)`–`(w-inset, h-inset)`.
    pub fn inset_rect(width: usize, height: usize, inset: f64) -> Self {
        let (w, h) = (width as f64, height as f64);
        Self {
            tl: Point2D::new(inset, inset),
            tr: Point2D::new(w - inset, inset),
            br: Point2D::new(w - inset, h - inset),
            bl: Point2D::new(inset, h - inset),
        }
    }

    pub fn points(&self) -> [Point2D; 4] {
        [self.tl, self.tr, self.br, self.bl]
    }

    pub fn top_len(&self) -> f64 {
        self.tl.distance(&self.tr)
    }

    pub fn bottom_len(&self) -> f64 {
        self.bl.distance(&self.br)
    }

    pub fn left_len(&self) -> f64 {
        self.tl.distance(&self.bl)
    }

    pub fn right_len(&self) -> f64 {
        self.tr.distance(&self.br)
    }

    /// Unsigned area.
    pub fn area(&self) -> f64 {
        polygon_area(&self.points()).abs()
    }

    /// Simple and convex: all four turns have the same strict sign.
    pub fn is_simple(&self) -> bool {
        let p = self.points();
        let turns: Vec<f64> = (0..4)
            .map(|i| cross(p[i], p[(i + 1) % 4], p[(i + 2) % 4]))
            .collect();
        turns.iter().all(|&c| c > 0.0) || turns.iter().all(|&c| c < 0.0)
    }

    /// Every corner lies in its own quarter of the frame, split at the
    /// integer half width and height.
    pub fn in_quadrants(&self, width: usize, height: usize) -> bool {
        let (w, h) = (width as f64, height as f64);
        let (cx, cy) = ((width / 2) as f64, (height / 2) as f64);
        let in_x = |x: f64, right: bool| if right { x >= cx && x < w } else { x >= 0.0 && x < cx };
        let in_y = |y: f64, low: bool| if low { y >= cy && y < h } else { y >= 0.0 && y < cy };
        in_x(self.tl.x, false)
            && in_y(self.tl.y, false)
            && in_x(self.tr.x, true)
            && in_y(self.tr.y, false)
            && in_x(self.br.x, true)
            && in_y(self.br.y, true)
            && in_x(self.bl.x, false)
            && in_y(self.bl.y, true)
    }
}

/// Where the resolved corners came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerSource {
    Detected,
    Manual,
    Default,
}

/// Why the default rectangle was substituted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// Fewer than four corners were available.
    MissingCorners,
    OutOfQuadrant,
    NotSimple,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CornerResolution {
    pub quad: Quadrilateral,
    pub source: CornerSource,
    pub fallback: Option<FallbackReason>,
}

/// Pairwise intersections of the horizontal and vertical border lines.
/// Parallel combinations are skipped, so at most four points come back.
pub fn intersect_borders(lines: &BorderLines) -> Vec<Point2D> {
    [
        lines.top.meet(&lines.left),
        lines.top.meet(&lines.right),
        lines.bottom.meet(&lines.right),
        lines.bottom.meet(&lines.left),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Resolve the wall quadrilateral from the four border lines.
pub fn resolve_corners(
    lines: &BorderLines,
    width: usize,
    height: usize,
    options: &CornerOptions,
) -> CornerResolution {
    let points = intersect_borders(lines);
    resolve_points(&points, CornerSource::Detected, width, height, options)
}

/// Order and validate an arbitrary point list.
pub fn resolve_points(
    points: &[Point2D],
    source: CornerSource,
    width: usize,
    height: usize,
    options: &CornerOptions,
) -> CornerResolution {
    let verdict = match <[Point2D; 4]>::try_from(points) {
        Err(_) => Err(FallbackReason::MissingCorners),
        Ok(four) => {
            let quad = Quadrilateral::from_unordered(four);
            if !quad.in_quadrants(width, height) {
                Err(FallbackReason::OutOfQuadrant)
            } else if !quad.is_simple() {
                Err(FallbackReason::NotSimple)
            } else {
                Ok(quad)
            }
        }
    };

    match verdict {
        Ok(quad) => CornerResolution {
            quad,
            source,
            fallback: None,
        },
        Err(reason) => {
            log::warn!(
                "corners: {source:?} corners rejected ({reason:?}), using default rectangle inset {}px",
                options.default_inset_px
            );
            CornerResolution {
                quad: Quadrilateral::inset_rect(width, height, options.default_inset_px),
                source: CornerSource::Default,
                fallback: Some(reason),
            }
        }
    }
}
