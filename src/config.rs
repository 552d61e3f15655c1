//! JSON runtime configuration for the binaries.

pub mod align;
pub mod wall;
