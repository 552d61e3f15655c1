//! Grayscale float pyramid with separable blur and 2× decimation.
//!
//! Level 0 is the input image untouched. Each further level blurs the
//! previous one with the configured separable filter (5-tap Gaussian by
//! default) for the first `blur_levels` steps and keeps every other pixel.
//! Borders clamp (replicate).
//!
//! The template matcher searches the coarsest level exhaustively and refines
//! the hit level by level; the line detector only uses [`filters::blur`].
pub mod filters;

pub use filters::{blur, SeparableFilter, StaticSeparableFilter, GAUSSIAN_5TAP};

use crate::image::{ImageF32, ImageView, ImageViewMut};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug)]
pub struct Pyramid {
    pub levels: Vec<ImageF32>,
}

/// Options controlling pyramid construction.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PyramidOptions {
    /// Number of pyramid levels (>= 1).
    pub levels: usize,
    /// Number of initial downscale steps that blur before decimating.
    pub blur_levels: usize,
}

impl Default for PyramidOptions {
    fn default() -> Self {
        Self {
            levels: 3,
            blur_levels: usize::MAX,
        }
    }
}

impl PyramidOptions {
    pub fn new(levels: usize) -> Self {
        Self {
            levels,
            ..Default::default()
        }
    }
}

impl Pyramid {
    /// Build a pyramid from a float image. Levels stop early once the previous
    /// level is narrower than 4 pixels on either side.
    pub fn build(base: ImageF32, options: PyramidOptions) -> Self {
        let wanted = options.levels.max(1);
        let mut levels = Vec::with_capacity(wanted);
        levels.push(base);

        for lvl in 1..wanted {
            let Some(prev) = levels.last() else { break };
            if prev.w < 4 || prev.h < 4 {
                break;
            }
            let filtered = (lvl <= options.blur_levels).then(|| blur(&GAUSSIAN_5TAP, prev));
            let src = filtered.as_ref().unwrap_or(prev);

            let (nw, nh) = (prev.w.div_ceil(2), prev.h.div_ceil(2));
            let mut down = ImageF32::new(nw, nh);
            for y in 0..nh {
                let src_row = src.row((y * 2).min(src.h - 1));
                for (x, dst) in down.row_mut(y).iter_mut().enumerate() {
                    *dst = src_row[(x * 2).min(src.w - 1)];
                }
            }
            levels.push(down);
        }

        Self { levels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_halve_dimensions() {
        let pyr = Pyramid::build(ImageF32::new(64, 48), PyramidOptions::new(3));
        let dims: Vec<(usize, usize)> = pyr.levels.iter().map(|l| (l.w, l.h)).collect();
        assert_eq!(dims, vec![(64, 48), (32, 24), (16, 12)]);
    }

    #[test]
    fn tiny_images_stop_early() {
        let pyr = Pyramid::build(ImageF32::new(5, 3), PyramidOptions::new(4));
        assert_eq!(pyr.levels.len(), 1);
    }

    #[test]
    fn constant_image_stays_constant() {
        let mut img = ImageF32::new(16, 16);
        img.data.iter_mut().for_each(|v| *v = 0.5);
        let pyr = Pyramid::build(img, PyramidOptions::new(3));
        for lvl in &pyr.levels {
            assert!(lvl.data.iter().all(|v| (v - 0.5).abs() < 1e-6));
        }
    }
}
