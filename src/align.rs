//! Alignment control loop.
//!
//! Per frame: rectify with the stored homography, locate the held picture by
//! template matching, compare its centre with the target point and turn the
//! displacement into guidance for the operator. The loop ends when the
//! picture is within tolerance, when the operator cancels, or when a finite
//! frame source runs dry.
//!
//! - [`controller`]: the SEARCHING → GUIDING → ALIGNED state machine.
//! - [`capture`]: frame sources; the stream releases its resource on drop.
//! - [`sink`]: where guidance goes (log, stdout, a vector for tests).
//! - [`runner`]: the loop driver and the cooperative cancel token.

pub mod capture;
pub mod controller;
pub mod runner;
pub mod sink;

pub use capture::{CaptureDevice, FrameRead, FrameStream, ImageSequenceDevice};
pub use controller::{AlignState, AlignmentController, StepOutcome};
pub use runner::{AlignmentLoop, CancelToken, LoopOutcome};
pub use sink::{GuidanceSink, LogSink, PrintSink, VecSink};

use crate::rectify::RectifyError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(thiserror::Error, Debug)]
pub enum AlignError {
    #[error("capture source unavailable: {0}")]
    CaptureUnavailable(String),
    #[error(transparent)]
    Rectify(#[from] RectifyError),
    #[error("template image is empty")]
    EmptyTemplate,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignOptions {
    /// Alignment is reached when both |dx| and |dy| are below this, in
    /// rectified pixels.
    pub tolerance_px: f64,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self { tolerance_px: 1.0 }
    }
}

/// Discrete guidance signal for the operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Guidance {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Aligned,
}

impl Guidance {
    pub fn phrase(self) -> &'static str {
        match self {
            Guidance::MoveLeft => "move left",
            Guidance::MoveRight => "move right",
            Guidance::MoveUp => "move up",
            Guidance::MoveDown => "move down",
            Guidance::Aligned => "You've come to the right location!",
        }
    }
}

impl fmt::Display for Guidance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phrase())
    }
}
