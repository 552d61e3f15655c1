//! Grid/hang-point engine.
//!
//! The rectified wall is partitioned into vertical slices ([`slices`]); a
//! uniform N×N grid of axis-aligned lines is laid over one slice and its
//! horizontal×vertical intersections form the lattice of candidate hang
//! points ([`lattice`]).

pub mod lattice;
pub mod slices;

pub use lattice::{Grid, GridOptions};
pub use slices::{partition_slices, vertical_boundaries, Slice, SliceOptions};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("grid lattice is empty")]
    EmptyLattice,
    #[error("slice {index} out of range ({count} slices)")]
    SliceOutOfRange { index: usize, count: usize },
    #[error("invalid grid span x=[{x0}, {x1}], height {height}")]
    InvalidSpan { x0: f64, x1: f64, height: f64 },
}
