//! Angle utilities shared by the line detector and the border selector.
//!
//! Gradient orientations inside the detector are π-periodic and handled in
//! `f32`. Border lines work in `f64` and are folded into a range that depends
//! on the border class, so that the direction a segment was traced in never
//! changes a parallelism decision.

use std::f64::consts::{FRAC_PI_2, PI};

/// Normalizes an angle into the range [0, π).
#[inline]
pub fn normalize_half_pi(angle: f32) -> f32 {
    let norm = angle.rem_euclid(std::f32::consts::PI);
    if norm >= std::f32::consts::PI - 1e-6 {
        0.0
    } else {
        norm
    }
}

/// Smallest unsigned difference between two π-periodic orientations, in [0, π/2].
#[inline]
pub fn angular_difference(a: f32, b: f32) -> f32 {
    let diff = (a - b).abs().rem_euclid(std::f32::consts::PI);
    if diff > std::f32::consts::FRAC_PI_2 {
        std::f32::consts::PI - diff
    } else {
        diff
    }
}

/// Folds a line angle into (-π/2, π/2]. Near-horizontal lines land near 0
/// whichever way they were traced.
#[inline]
pub fn fold_horizontal(angle: f64) -> f64 {
    let mut a = angle.rem_euclid(PI);
    if a > FRAC_PI_2 {
        a -= PI;
    }
    a
}

/// Folds a line angle into [0, π). Near-vertical lines land near π/2.
#[inline]
pub fn fold_vertical(angle: f64) -> f64 {
    let a = angle.rem_euclid(PI);
    if a >= PI {
        0.0
    } else {
        a
    }
}

/// Arithmetic mean of already folded angles. Returns `None` for an empty slice.
pub fn mean_angle(angles: &[f64]) -> Option<f64> {
    if angles.is_empty() {
        return None;
    }
    Some(angles.iter().sum::<f64>() / angles.len() as f64)
}
