//! Image containers used throughout the crate.
//!
//! - [`ImageU8`]: borrowed 8-bit grayscale view with stride.
//! - [`ImageF32`]: owned single-channel float image, `[0, 1]` intensity.
//! - [`Frame`]: owned interleaved 8-bit raster (gray or RGB) used for wall
//!   photos, live frames and rendered artifacts.
pub mod f32;
pub mod frame;
pub mod io;
pub mod traits;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::frame::Frame;
pub use self::traits::{ImageView, ImageViewMut};
pub use self::u8::ImageU8;
