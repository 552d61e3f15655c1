use super::{AlignOptions, Guidance};
use crate::geometry::Point2D;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignState {
    Searching,
    Guiding,
    Aligned,
}

/// Result of feeding one frame's detection to the controller.
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    pub state: AlignState,
    /// `detected − target`, when there was a detection.
    pub displacement: Option<(f64, f64)>,
    pub signals: Vec<Guidance>,
}

/// Turns detected picture centres into guidance.
///
/// While guiding, every step emits one horizontal and one vertical symbol,
/// even when one axis is already within tolerance. Reaching alignment emits
/// a single [`Guidance::Aligned`]; after that the controller is inert.
#[derive(Clone, Debug)]
pub struct AlignmentController {
    target: Point2D,
    tolerance: f64,
    state: AlignState,
}

impl AlignmentController {
    pub fn new(target: Point2D, options: &AlignOptions) -> Self {
        Self {
            target,
            tolerance: options.tolerance_px,
            state: AlignState::Searching,
        }
    }

    pub fn state(&self) -> AlignState {
        self.state
    }

    pub fn target(&self) -> Point2D {
        self.target
    }

    pub fn step(&mut self, detected: Option<Point2D>) -> StepOutcome {
        if self.state == AlignState::Aligned {
            return StepOutcome {
                state: self.state,
                displacement: None,
                signals: Vec::new(),
            };
        }

        let Some(center) = detected else {
            log::debug!("align: no detection, retrying");
            self.state = AlignState::Searching;
            return StepOutcome {
                state: self.state,
                displacement: None,
                signals: Vec::new(),
            };
        };

        let dx = center.x - self.target.x;
        let dy = center.y - self.target.y;
        let signals = if dx.abs() < self.tolerance && dy.abs() < self.tolerance {
            self.state = AlignState::Aligned;
            vec![Guidance::Aligned]
        } else {
            self.state = AlignState::Guiding;
            let horizontal = if dx > 0.0 {
                Guidance::MoveLeft
            } else {
                Guidance::MoveRight
            };
            let vertical = if dy > 0.0 {
                Guidance::MoveUp
            } else {
                Guidance::MoveDown
            };
            vec![horizontal, vertical]
        };
        log::debug!("align: d=({dx:.2}, {dy:.2}) -> {:?}", self.state);

        StepOutcome {
            state: self.state,
            displacement: Some((dx, dy)),
            signals,
        }
    }
}
