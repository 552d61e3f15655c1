//! Normalized template matching.
//!
//! Scores are zero-mean normalized cross-correlation (ZNCC) in `[-1, 1]`,
//! the same measure as the classic `TM_CCOEFF_NORMED`. Each pyramid level is
//! quantized to 8 bits so window sums come from imageproc's integral images;
//! each candidate then costs one dot product with the zero-mean template.
//!
//! Search is coarse-to-fine: exhaustive at the coarsest pyramid level that
//! still holds the template, then a `±refine_radius` neighbourhood around the
//! upsampled hit on each finer level.

use crate::geometry::Point2D;
use crate::image::{Frame, ImageF32};
use crate::pyramid::{Pyramid, PyramidOptions};
use image::{GrayImage, Luma};
use imageproc::definitions::Image;
use imageproc::integral_image::{integral_image, integral_squared_image, sum_image_pixels};
use serde::{Deserialize, Serialize};

/// Templates smaller than this on a side are not searched at that level.
const MIN_TEMPLATE_PX: usize = 4;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Best scores below this are reported as no detection.
    pub min_score: f32,
    /// Pyramid levels used for the coarse search (1 = full resolution only).
    pub pyramid_levels: usize,
    /// Search radius in pixels when refining on finer levels.
    pub refine_radius: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            min_score: 0.4,
            pyramid_levels: 3,
            refine_radius: 2,
        }
    }
}

/// Best template placement in a frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub top_left: Point2D,
    pub width: usize,
    pub height: usize,
    pub score: f32,
}

impl Match {
    /// Centre of the matched bounding box.
    pub fn center(&self) -> Point2D {
        Point2D::new(
            self.top_left.x + self.width as f64 * 0.5,
            self.top_left.y + self.height as f64 * 0.5,
        )
    }
}

/// Pyramid level quantized back to 8 bits, with its summed-area tables.
struct Level {
    gray: GrayImage,
    sum: Image<Luma<u64>>,
    sq: Image<Luma<u64>>,
}

impl Level {
    fn new(img: &ImageF32) -> Self {
        let gray = GrayImage::from_fn(img.w as u32, img.h as u32, |x, y| {
            Luma([(img.get(x as usize, y as usize) * 255.0).round().clamp(0.0, 255.0) as u8])
        });
        Self::from_gray(gray)
    }

    fn from_gray(gray: GrayImage) -> Self {
        let sum = integral_image::<_, u64>(&gray);
        let sq = integral_squared_image::<_, u64>(&gray);
        Self { gray, sum, sq }
    }

    fn width(&self) -> usize {
        self.gray.width() as usize
    }

    fn height(&self) -> usize {
        self.gray.height() as usize
    }

    fn row(&self, y: usize, x: usize, len: usize) -> &[u8] {
        let start = y * self.width() + x;
        &self.gray.as_raw()[start..start + len]
    }

    /// `(Σ I, Σ I²)` over the `w×h` window at `(x, y)`.
    fn window(&self, x: usize, y: usize, w: usize, h: usize) -> (f64, f64) {
        let (l, t) = (x as u32, y as u32);
        let (r, b) = ((x + w - 1) as u32, (y + h - 1) as u32);
        let [s] = sum_image_pixels(&self.sum, l, t, r, b);
        let [q] = sum_image_pixels(&self.sq, l, t, r, b);
        (s as f64, q as f64)
    }
}

struct PreparedTemplate {
    w: usize,
    h: usize,
    zero_mean: Vec<f64>,
    norm: f64,
}

impl PreparedTemplate {
    fn new(gray: &GrayImage) -> Self {
        let (w, h) = (gray.width() as usize, gray.height() as usize);
        let n = (w * h).max(1) as f64;
        let mean = gray.as_raw().iter().map(|&v| v as f64).sum::<f64>() / n;
        let zero_mean: Vec<f64> = gray.as_raw().iter().map(|&v| v as f64 - mean).collect();
        let norm = zero_mean.iter().map(|v| v * v).sum::<f64>().sqrt();
        Self {
            w,
            h,
            zero_mean,
            norm,
        }
    }
}

fn zncc_at(level: &Level, t: &PreparedTemplate, x: usize, y: usize) -> f64 {
    let n = (t.w * t.h) as f64;
    let (s, s2) = level.window(x, y, t.w, t.h);
    let var = s2 - s * s / n;
    if var <= 1e-9 || t.norm <= 1e-9 {
        return 0.0;
    }
    let mut acc = 0.0;
    for ty in 0..t.h {
        let row = level.row(y + ty, x, t.w);
        let trow = &t.zero_mean[ty * t.w..(ty + 1) * t.w];
        acc += row
            .iter()
            .zip(trow)
            .map(|(&v, &tv)| v as f64 * tv)
            .sum::<f64>();
    }
    acc / (t.norm * var.sqrt())
}

/// Best `(x, y, score)` over a rectangular range of top-left positions.
fn search(
    level: &Level,
    t: &PreparedTemplate,
    xs: std::ops::RangeInclusive<usize>,
    ys: std::ops::RangeInclusive<usize>,
) -> Option<(usize, usize, f64)> {
    let best_in_row = |y: usize| {
        xs.clone()
            .map(|x| (x, y, zncc_at(level, t, x, y)))
            .fold(None, |best: Option<(usize, usize, f64)>, cand| match best {
                Some(b) if b.2 >= cand.2 => Some(b),
                _ => Some(cand),
            })
    };

    #[cfg(feature = "parallel")]
    let rows: Vec<Option<(usize, usize, f64)>> = {
        use rayon::prelude::*;
        ys.into_par_iter().map(best_in_row).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let rows: Vec<Option<(usize, usize, f64)>> = ys.map(best_in_row).collect();

    rows.into_iter()
        .flatten()
        .fold(None, |best, cand| match best {
            Some(b) if b.2 >= cand.2 => Some(b),
            _ => Some(cand),
        })
}

/// Reusable matcher for one reference crop.
pub struct TemplateMatcher {
    templates: Vec<PreparedTemplate>,
    options: MatchOptions,
}

impl TemplateMatcher {
    /// Prepare a template. Returns `None` for an empty image.
    pub fn new(template: &Frame, options: MatchOptions) -> Option<Self> {
        if template.is_empty() {
            return None;
        }
        let pyr = Pyramid::build(
            template.to_gray_f32(),
            PyramidOptions::new(options.pyramid_levels.max(1)),
        );
        let templates: Vec<PreparedTemplate> = pyr
            .levels
            .iter()
            .enumerate()
            .take_while(|(i, lvl)| *i == 0 || (lvl.w >= MIN_TEMPLATE_PX && lvl.h >= MIN_TEMPLATE_PX))
            .map(|(_, lvl)| PreparedTemplate::new(&Level::new(lvl).gray))
            .collect();
        Some(Self { templates, options })
    }

    pub fn template_size(&self) -> (usize, usize) {
        self.templates.first().map_or((0, 0), |t| (t.w, t.h))
    }

    /// Locate the template in a frame. `None` when the frame is smaller than
    /// the template, the template is flat, or the best score is below
    /// `min_score`.
    pub fn locate(&self, frame: &Frame) -> Option<Match> {
        self.locate_gray(&frame.to_gray_f32())
    }

    pub fn locate_gray(&self, gray: &ImageF32) -> Option<Match> {
        let base = self.templates.first()?;
        if gray.w < base.w || gray.h < base.h || base.norm <= 1e-9 {
            return None;
        }
        let pyr = Pyramid::build(gray.clone(), PyramidOptions::new(self.templates.len()));
        let levels: Vec<Level> = pyr
            .levels
            .iter()
            .zip(&self.templates)
            .take_while(|(img, t)| img.w >= t.w && img.h >= t.h)
            .map(|(img, _)| Level::new(img))
            .collect();
        let top = levels.len().checked_sub(1)?;

        let (level, t) = (&levels[top], &self.templates[top]);
        let (mut bx, mut by, mut score) = search(
            level,
            t,
            0..=level.width() - t.w,
            0..=level.height() - t.h,
        )?;

        let r = self.options.refine_radius;
        for lvl in (0..top).rev() {
            let (level, t) = (&levels[lvl], &self.templates[lvl]);
            let (max_x, max_y) = (level.width() - t.w, level.height() - t.h);
            let (cx, cy) = ((bx * 2).min(max_x), (by * 2).min(max_y));
            let xs = cx.saturating_sub(r)..=(cx + r + 1).min(max_x);
            let ys = cy.saturating_sub(r)..=(cy + r + 1).min(max_y);
            (bx, by, score) = search(level, t, xs, ys)?;
        }

        if (score as f32) < self.options.min_score {
            log::debug!("match: best score {score:.3} below threshold");
            return None;
        }
        Some(Match {
            top_left: Point2D::new(bx as f64, by as f64),
            width: base.w,
            height: base.h,
            score: score as f32,
        })
    }
}
