use crate::geometry::Segment;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceOptions {
    /// Minimum slice width as a fraction of the image width.
    pub min_width_fraction: f64,
    /// At most this many boundaries are kept.
    pub max_boundaries: usize,
    /// Segments within this angle of vertical count as boundaries.
    pub vertical_tol_deg: f64,
}

impl Default for SliceOptions {
    fn default() -> Self {
        Self {
            min_width_fraction: 0.15,
            max_boundaries: 7,
            vertical_tol_deg: 5.0,
        }
    }
}

/// Column range `[x0, x1)` of the rectified wall, numbered from 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub number: usize,
    pub x0: f64,
    pub x1: f64,
}

impl Slice {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn center_x(&self) -> f64 {
        0.5 * (self.x0 + self.x1)
    }
}

/// Sorted abscissae of near-vertical segments, thinned so consecutive
/// boundaries are at least `min_width_fraction · width` apart.
pub fn vertical_boundaries(segments: &[Segment], width: usize, options: &SliceOptions) -> Vec<f64> {
    let tol = options.vertical_tol_deg.to_radians();
    let half_pi = std::f64::consts::FRAC_PI_2;
    let mut xs: Vec<f64> = segments
        .iter()
        .filter(|s| {
            let a = s.angle().abs();
            a > half_pi - tol && a < half_pi + tol
        })
        .map(|s| s.midpoint().x.floor())
        .collect();
    xs.sort_by(f64::total_cmp);

    let min_spacing = width as f64 * options.min_width_fraction;
    let mut kept: Vec<f64> = Vec::new();
    for x in xs {
        if kept.len() >= options.max_boundaries {
            break;
        }
        match kept.last() {
            Some(&last) if x - last < min_spacing => {}
            _ => kept.push(x),
        }
    }
    kept
}

/// Split `[0, width)` at the boundaries.
///
/// Boundaries closer than the minimum width to the previous accepted one
/// (starting from 0) are skipped. The remainder after the last boundary
/// becomes the final slice. Zero or one boundary yields a single slice.
pub fn partition_slices(boundaries: &[f64], width: usize, options: &SliceOptions) -> Vec<Slice> {
    let w = width as f64;
    if boundaries.len() <= 1 {
        return vec![Slice {
            number: 1,
            x0: 0.0,
            x1: w,
        }];
    }

    let min_width = w * options.min_width_fraction;
    let mut slices = Vec::new();
    let mut last = 0.0;
    for &x in boundaries {
        if x > w {
            break;
        }
        if x - last >= min_width {
            slices.push(Slice {
                number: slices.len() + 1,
                x0: last,
                x1: x,
            });
            last = x;
        }
    }
    if last < w {
        slices.push(Slice {
            number: slices.len() + 1,
            x0: last,
            x1: w,
        });
    }
    slices
}
