#![doc = include_str!("../README.md")]

// Pipeline stages
pub mod align;
pub mod border;
pub mod corners;
pub mod grid;
pub mod rectify;
pub mod session;

// Supporting modules
pub mod angle;
pub mod config;
pub mod diagnostics;
pub mod edges;
pub mod geometry;
pub mod homography;
pub mod image;
pub mod lines;
pub mod matching;
pub mod pyramid;
pub mod render;

// --- High-level re-exports -------------------------------------------------

pub use crate::align::{AlignError, AlignmentLoop, Guidance, LoopOutcome};
pub use crate::diagnostics::WallReport;
pub use crate::geometry::{Point2D, Segment};
pub use crate::homography::Homography;
pub use crate::rectify::{Rectification, RectifyError};
pub use crate::session::{AnalyzerParams, HangPlan, WallAnalyzer, WallPlan};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use hang_guide::prelude::*;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let photo = Frame::new(640, 480, 3);
/// let analyzer = WallAnalyzer::new(AnalyzerParams::default());
/// let plan = analyzer.analyze(&photo, None)?;
/// let grid = plan.grid_for_slice(1)?;
/// let target = grid.resolve_selection(Point2D::new(100.0, 80.0))?;
/// println!("hang at ({:.1}, {:.1})", target.x, target.y);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::align::{AlignOptions, AlignmentLoop, CancelToken, Guidance, GuidanceSink};
    pub use crate::geometry::Point2D;
    pub use crate::image::Frame;
    pub use crate::{AnalyzerParams, WallAnalyzer, WallPlan};
}
