//! Rectifier: homography from the wall quadrilateral to a frontal rectangle.
//!
//! The output rectangle is `output_width` pixels wide; its height follows the
//! quadrilateral's average aspect ratio (mean of the left and right edge
//! lengths over the mean of the top and bottom edge lengths). The destination
//! corners are `[0,0]`, `[W,0]`, `[W,H]`, `[0,H]`.
//!
//! A [`Rectification`] is computed once per quadrilateral and then reused for
//! every frame. Warping samples bilinearly through the inverse map; samples
//! falling outside the source are black.

mod warp;

pub use warp::warp_frame;

use crate::corners::Quadrilateral;
use crate::geometry::{convex_contains, Point2D};
use crate::homography::Homography;
use crate::image::Frame;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RectifyError {
    #[error("quadrilateral is degenerate (area {area:.3} px²)")]
    DegenerateQuad { area: f64 },
    #[error("homography estimation failed")]
    SingularHomography,
    #[error("homography not invertible")]
    NonInvertible,
    #[error("rectified output would be empty ({width}x{height})")]
    EmptyOutput { width: usize, height: usize },
    #[error("channel mismatch: rectified image has {rectified}, original has {original}")]
    ChannelMismatch { rectified: usize, original: usize },
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RectifyOptions {
    /// Width of the rectified image in pixels.
    pub output_width: usize,
    /// Quadrilaterals with a smaller area are rejected as degenerate.
    pub min_area_px: f64,
}

impl Default for RectifyOptions {
    fn default() -> Self {
        Self {
            output_width: 800,
            min_area_px: 1.0,
        }
    }
}

/// Homography pair and output size for one wall quadrilateral.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rectification {
    pub quad: Quadrilateral,
    /// Original image → rectified plane.
    pub forward: Homography,
    /// Rectified plane → original image.
    pub inverse: Homography,
    pub width: usize,
    pub height: usize,
}

impl Rectification {
    pub fn output_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn to_rectified(&self, p: Point2D) -> Option<Point2D> {
        self.forward.apply(p)
    }

    pub fn to_original(&self, p: Point2D) -> Option<Point2D> {
        self.inverse.apply(p)
    }
}

/// Solve the rectifying homography for an ordered quadrilateral.
pub fn compute_homography(
    quad: &Quadrilateral,
    options: &RectifyOptions,
) -> Result<Rectification, RectifyError> {
    let area = quad.area();
    if !area.is_finite() || area < options.min_area_px {
        return Err(RectifyError::DegenerateQuad { area });
    }

    let quad_w = 0.5 * (quad.top_len() + quad.bottom_len());
    let quad_h = 0.5 * (quad.left_len() + quad.right_len());
    let width = options.output_width;
    let height = if quad_w > 0.0 {
        (width as f64 * quad_h / quad_w).floor() as usize
    } else {
        0
    };
    if width == 0 || height == 0 {
        return Err(RectifyError::EmptyOutput { width, height });
    }

    let (w, h) = (width as f64, height as f64);
    let dst = [
        Point2D::new(0.0, 0.0),
        Point2D::new(w, 0.0),
        Point2D::new(w, h),
        Point2D::new(0.0, h),
    ];
    let forward = Homography::from_correspondences(&quad.points(), &dst)
        .ok_or(RectifyError::SingularHomography)?;
    let inverse = forward.inverse().ok_or(RectifyError::NonInvertible)?;
    log::debug!("rectify: {width}x{height} output, quad area {area:.1}");

    Ok(Rectification {
        quad: *quad,
        forward,
        inverse,
        width,
        height,
    })
}

/// Warp a frame into the rectified plane.
pub fn rectify(frame: &Frame, rect: &Rectification) -> Frame {
    warp_frame(frame, &rect.forward, rect.width, rect.height)
}

/// Warp a rectified image back onto the original frame.
///
/// Only pixels inside the quadrilateral are replaced; every pixel outside it
/// keeps its original value exactly.
pub fn unrectify(
    rectified: &Frame,
    rect: &Rectification,
    original: &Frame,
) -> Result<Frame, RectifyError> {
    if rectified.channels() != original.channels() {
        return Err(RectifyError::ChannelMismatch {
            rectified: rectified.channels(),
            original: original.channels(),
        });
    }
    let back = warp_frame(rectified, &rect.inverse, original.width(), original.height());
    let polygon = rect.quad.points();
    let mut out = original.clone();
    for y in 0..original.height() {
        for x in 0..original.width() {
            if convex_contains(&polygon, Point2D::new(x as f64, y as f64)) {
                out.pixel_mut(x, y).copy_from_slice(back.pixel(x, y));
            }
        }
    }
    Ok(out)
}
