//! Image gradients feeding the line-segment detector.
//!
//! Only the Sobel operator is needed: the detector grows regions over pixels
//! whose gradient orientation agrees with a seed, so it needs `gx`, `gy` and
//! the magnitude, nothing more.

pub mod grad;

pub use grad::{sobel_gradients, Grad};
