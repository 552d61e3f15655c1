//! Region-growing line-segment detector.
//!
//! Produces the raw [`Segment`]s that the border classifier consumes:
//!
//! - Optional 5-tap Gaussian pre-blur to suppress texture on the wall.
//! - Sobel gradients (`edges::sobel_gradients`).
//! - Region growing from seed pixels: 8-connected neighbours whose gradient
//!   orientation (modulo π) stays within `angle_tolerance_deg` of the seed and
//!   whose magnitude exceeds `magnitude_threshold` join the region.
//! - PCA fit over the region pixels. The principal eigenvector of the 2×2
//!   coordinate covariance is the segment tangent; projecting the pixels onto
//!   it gives the endpoints.
//! - Significance: minimum region size, minimum length and a minimum fraction
//!   of pixels aligned with the seed orientation.
//!
//! Each pixel is visited at most once, so a pass is O(W·H).
//!
//! Thresholds are in the pixel scale of the image passed in, with intensities
//! in `[0, 1]`.

mod extractor;
mod region;

use crate::geometry::Segment;
use crate::image::{Frame, ImageF32};
use crate::pyramid::{blur, GAUSSIAN_5TAP};
use serde::{Deserialize, Serialize};

/// Detector thresholds.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LineDetectOptions {
    /// Minimum Sobel magnitude for a pixel to seed or join a region.
    pub magnitude_threshold: f32,
    /// Orientation tolerance around the seed normal, in degrees.
    pub angle_tolerance_deg: f32,
    /// Minimum accepted segment length in pixels.
    pub min_length_px: f32,
    /// Regions with fewer pixels are discarded before fitting.
    pub min_region_px: usize,
    pub min_aligned_fraction: f32,
    /// Blur with the 5-tap Gaussian before taking gradients.
    pub pre_blur: bool,
}

impl Default for LineDetectOptions {
    fn default() -> Self {
        Self {
            magnitude_threshold: 0.25,
            angle_tolerance_deg: 22.5,
            min_length_px: 20.0,
            min_region_px: 12,
            min_aligned_fraction: 0.6,
            pre_blur: true,
        }
    }
}

/// Detect line segments on a float grayscale image.
pub fn detect_line_segments(gray: &ImageF32, options: &LineDetectOptions) -> Vec<Segment> {
    if gray.w < 3 || gray.h < 3 {
        return Vec::new();
    }
    let blurred;
    let src = if options.pre_blur {
        blurred = blur(&GAUSSIAN_5TAP, gray);
        &blurred
    } else {
        gray
    };
    let segments = extractor::Extractor::new(src, options).extract();
    log::debug!(
        "lines: {} segments on {}x{} image",
        segments.len(),
        gray.w,
        gray.h
    );
    segments
}

/// Convenience wrapper: convert a frame to gray and detect.
pub fn detect_frame_segments(frame: &Frame, options: &LineDetectOptions) -> Vec<Segment> {
    detect_line_segments(&frame.to_gray_f32(), options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Orientation;

    fn step_image(width: usize, height: usize, split_x: usize) -> ImageF32 {
        let mut img = ImageF32::new(width, height);
        for y in 0..height {
            for x in split_x..width {
                img.set(x, y, 1.0);
            }
        }
        img
    }

    fn filled_rect(w: usize, h: usize, x0: usize, y0: usize, x1: usize, y1: usize) -> ImageF32 {
        let mut img = ImageF32::new(w, h);
        for y in y0..y1 {
            for x in x0..x1 {
                img.set(x, y, 1.0);
            }
        }
        img
    }

    #[test]
    fn finds_vertical_segment_on_step_edge() {
        let img = step_image(48, 48, 24);
        let segs = detect_line_segments(&img, &LineDetectOptions::default());
        let longest = segs
            .iter()
            .max_by(|a, b| a.length().total_cmp(&b.length()))
            .expect("a segment on a vertical edge");
        assert_eq!(longest.orientation, Orientation::Vertical);
        assert!(longest.length() >= 30.0, "len={}", longest.length());
        assert!((longest.midpoint().x - 23.5).abs() < 1.5);
    }

    #[test]
    fn flat_image_has_no_segments() {
        let img = ImageF32::new(32, 32);
        assert!(detect_line_segments(&img, &LineDetectOptions::default()).is_empty());
    }

    #[test]
    fn rectangle_yields_both_orientations() {
        let img = filled_rect(120, 100, 20, 15, 100, 85);
        let segs = detect_line_segments(&img, &LineDetectOptions::default());
        let horizontal = segs
            .iter()
            .filter(|s| s.orientation == Orientation::Horizontal)
            .count();
        let vertical = segs.len() - horizontal;
        assert!(horizontal >= 2, "segments: {segs:?}");
        assert!(vertical >= 2, "segments: {segs:?}");
    }

    #[test]
    fn short_edges_are_rejected() {
        let img = filled_rect(64, 64, 28, 28, 36, 36);
        let segs = detect_line_segments(&img, &LineDetectOptions::default());
        assert!(segs.iter().all(|s| s.length() >= 20.0));
    }
}
