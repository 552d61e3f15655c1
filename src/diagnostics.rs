//! Serializable report of one wall analysis.
//!
//! [`WallReport`] records what each stage saw and which fallbacks it had to
//! take, so a plan can be audited after the fact without re-running it.

pub mod timing;

pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};

use crate::border::BorderSide;
use crate::corners::{CornerSource, FallbackReason};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
}

/// Border classification counts, in top/bottom/left/right order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderStage {
    pub segments_detected: usize,
    pub class_counts: [usize; 4],
    /// Detection was empty and the frame edges were classified instead.
    pub frame_edges_used: bool,
    /// Classes that ended up empty and were replaced by their frame edge.
    pub substituted: Vec<BorderSide>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerStage {
    pub source: CornerSource,
    pub fallback: Option<FallbackReason>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceStage {
    pub boundaries: Vec<f64>,
    pub slice_count: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallReport {
    pub input: InputDescriptor,
    /// `None` when corners were supplied by hand and detection was skipped.
    pub borders: Option<BorderStage>,
    pub corners: CornerStage,
    pub output_size: [usize; 2],
    pub slices: SliceStage,
    pub timings: TimingBreakdown,
}

impl WallReport {
    /// True when any stage substituted a default for missing evidence.
    pub fn used_fallback(&self) -> bool {
        self.corners.fallback.is_some()
            || self
                .borders
                .as_ref()
                .is_some_and(|b| b.frame_edges_used || !b.substituted.is_empty())
    }
}
