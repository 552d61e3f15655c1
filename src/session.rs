//! End-to-end wall analysis.
//!
//! [`WallAnalyzer`] runs the static half of the pipeline on one wall photo:
//!
//! 1. Line detection on the raw frame (skipped when corners are given).
//! 2. Border classification and representative selection, with frame-edge
//!    fallbacks for empty classes.
//! 3. Corner resolution and validation, with the default rectangle as the
//!    last resort.
//! 4. Rectification to a frontal view of fixed width.
//! 5. Slice partitioning of the rectified wall.
//!
//! The resulting [`WallPlan`] hands out grids per slice. Its serializable
//! part, [`HangPlan`], is what the alignment loop later needs.
use crate::border::{
    classify_or_fallback, select_representatives, BorderLines, ClassifierOptions, FallbackLines,
    FallbackOptions, SelectorOptions,
};
use crate::corners::{resolve_corners, resolve_points, CornerOptions, CornerResolution, CornerSource};
use crate::diagnostics::{
    BorderStage, CornerStage, InputDescriptor, SliceStage, TimingBreakdown, WallReport,
};
use crate::geometry::Point2D;
use crate::grid::{
    partition_slices, vertical_boundaries, Grid, GridError, GridOptions, Slice, SliceOptions,
};
use crate::image::Frame;
use crate::lines::{detect_frame_segments, LineDetectOptions};
use crate::rectify::{compute_homography, rectify, Rectification, RectifyError, RectifyOptions};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Every tunable of the wall pipeline.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerParams {
    pub lines: LineDetectOptions,
    pub fallback: FallbackOptions,
    pub classifier: ClassifierOptions,
    pub selector: SelectorOptions,
    pub corners: CornerOptions,
    pub rectify: RectifyOptions,
    pub slices: SliceOptions,
    pub grid: GridOptions,
}

pub struct WallAnalyzer {
    params: AnalyzerParams,
}

/// Output of one analysis.
#[derive(Clone, Debug)]
pub struct WallPlan {
    pub corners: CornerResolution,
    /// Border lines used for the corners; `None` for manual corners.
    pub border_lines: Option<BorderLines>,
    pub rectification: Rectification,
    pub rectified: Frame,
    pub slices: Vec<Slice>,
    pub report: WallReport,
    grid_options: GridOptions,
}

impl WallAnalyzer {
    pub fn new(params: AnalyzerParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &AnalyzerParams {
        &self.params
    }

    /// Analyze a wall photo. `manual_corners`, when given, replace detection
    /// and go through the same ordering and validation.
    ///
    /// Only a quadrilateral that cannot be rectified is an error; every other
    /// shortfall is absorbed by a fallback and noted in the report.
    pub fn analyze(
        &self,
        frame: &Frame,
        manual_corners: Option<&[Point2D]>,
    ) -> Result<WallPlan, RectifyError> {
        let p = &self.params;
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();
        let (w, h) = (frame.width(), frame.height());

        let (corners, border_lines, borders) = match manual_corners {
            Some(points) => {
                let start = Instant::now();
                let corners = resolve_points(points, CornerSource::Manual, w, h, &p.corners);
                timings.record_since("corners", start);
                (corners, None, None)
            }
            None => {
                let start = Instant::now();
                let segments = detect_frame_segments(frame, &p.lines);
                timings.record_since("lines", start);

                let start = Instant::now();
                let fallback = FallbackLines::frame_edges(w, h, &p.fallback);
                let (set, frame_edges_used) =
                    classify_or_fallback(&segments, w, h, &p.classifier, &fallback);
                let selected = select_representatives(&set, w, h, &p.selector);
                let (lines, substituted) = BorderLines::with_fallback(selected, &fallback);
                timings.record_since("borders", start);

                let start = Instant::now();
                let corners = resolve_corners(&lines, w, h, &p.corners);
                timings.record_since("corners", start);

                let stage = BorderStage {
                    segments_detected: segments.len(),
                    class_counts: set.counts(),
                    frame_edges_used,
                    substituted,
                };
                (corners, Some(lines), Some(stage))
            }
        };

        let start = Instant::now();
        let rectification = compute_homography(&corners.quad, &p.rectify)?;
        let rectified = rectify(frame, &rectification);
        timings.record_since("rectify", start);

        let start = Instant::now();
        let vertical = detect_frame_segments(&rectified, &p.lines);
        let boundaries = vertical_boundaries(&vertical, rectification.width, &p.slices);
        let slices = partition_slices(&boundaries, rectification.width, &p.slices);
        timings.record_since("slices", start);

        timings.total_ms = crate::diagnostics::elapsed_ms(total_start);
        log::info!(
            "wall: corners {:?}, {}x{} rectified, {} slices in {:.2} ms",
            corners.source,
            rectification.width,
            rectification.height,
            slices.len(),
            timings.total_ms
        );

        let report = WallReport {
            input: InputDescriptor {
                width: w,
                height: h,
                channels: frame.channels(),
            },
            borders,
            corners: CornerStage {
                source: corners.source,
                fallback: corners.fallback,
            },
            output_size: [rectification.width, rectification.height],
            slices: SliceStage {
                slice_count: slices.len(),
                boundaries,
            },
            timings,
        };

        Ok(WallPlan {
            corners,
            border_lines,
            rectification,
            rectified,
            slices,
            report,
            grid_options: p.grid,
        })
    }
}

impl WallPlan {
    /// Grid over the slice numbered `number` (numbering starts at 1).
    pub fn grid_for_slice(&self, number: usize) -> Result<Grid, GridError> {
        let slice = number
            .checked_sub(1)
            .and_then(|i| self.slices.get(i))
            .ok_or(GridError::SliceOutOfRange {
                index: number,
                count: self.slices.len(),
            })?;
        Grid::for_slice(
            slice,
            self.rectification.height as f64,
            &self.grid_options,
        )
    }

    /// Serializable plan for the alignment stage.
    pub fn to_hang_plan(&self, grid: Option<Grid>, target: Option<Point2D>) -> HangPlan {
        HangPlan {
            rectification: self.rectification.clone(),
            slices: self.slices.clone(),
            grid,
            target,
            report: Some(self.report.clone()),
        }
    }
}

/// Persisted result of the wall analysis: the homography pair, the slices
/// and, once the operator picked one, the grid and target point.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HangPlan {
    pub rectification: Rectification,
    pub slices: Vec<Slice>,
    #[serde(default)]
    pub grid: Option<Grid>,
    #[serde(default)]
    pub target: Option<Point2D>,
    #[serde(default)]
    pub report: Option<WallReport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corners::FallbackReason;

    fn wall_photo() -> Frame {
        // Bright wall on a dark background, edges well inside the margins.
        let (w, h) = (320, 240);
        let mut f = Frame::new(w, h, 1);
        for y in 20..220 {
            for x in 24..296 {
                f.pixel_mut(x, y)[0] = 200;
            }
        }
        f
    }

    #[test]
    fn detected_wall_is_rectified() {
        let analyzer = WallAnalyzer::new(AnalyzerParams {
            rectify: RectifyOptions {
                output_width: 200,
                ..Default::default()
            },
            ..Default::default()
        });
        let plan = analyzer.analyze(&wall_photo(), None).expect("rectifiable");
        assert_eq!(plan.corners.source, CornerSource::Detected);
        let q = plan.corners.quad;
        for (p, (ex, ey)) in q
            .points()
            .iter()
            .zip([(24.0, 20.0), (296.0, 20.0), (296.0, 220.0), (24.0, 220.0)])
        {
            assert!((p.x - ex).abs() < 3.0 && (p.y - ey).abs() < 3.0, "{p:?}");
        }
        assert_eq!(plan.rectified.width(), 200);
        assert!(plan.report.borders.is_some());
        assert!(!plan.slices.is_empty());
    }

    #[test]
    fn blank_photo_falls_back_to_default_rectangle() {
        let frame = Frame::new(160, 120, 3);
        let plan = WallAnalyzer::new(AnalyzerParams::default())
            .analyze(&frame, None)
            .expect("default rectangle is rectifiable");
        let borders = plan.report.borders.as_ref().expect("detection ran");
        assert!(borders.frame_edges_used);
        assert!(plan.report.used_fallback());
        assert_eq!(plan.corners.quad.tl, Point2D::new(5.0, 5.0));
        assert_eq!(plan.slices.len(), 1);
    }

    #[test]
    fn manual_corners_skip_detection() {
        let corners = [
            Point2D::new(300.0, 230.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(10.0, 230.0),
            Point2D::new(300.0, 10.0),
        ];
        let plan = WallAnalyzer::new(AnalyzerParams::default())
            .analyze(&wall_photo(), Some(&corners))
            .expect("rectifiable");
        assert_eq!(plan.corners.source, CornerSource::Manual);
        assert_eq!(plan.corners.quad.tl, Point2D::new(10.0, 10.0));
        assert!(plan.border_lines.is_none());
        assert!(plan.report.borders.is_none());
    }

    #[test]
    fn bad_manual_corners_use_default_rectangle() {
        let corners = [Point2D::new(1.0, 1.0), Point2D::new(2.0, 2.0)];
        let plan = WallAnalyzer::new(AnalyzerParams::default())
            .analyze(&wall_photo(), Some(&corners))
            .expect("default rectangle is rectifiable");
        assert_eq!(plan.corners.source, CornerSource::Default);
        assert_eq!(plan.corners.fallback, Some(FallbackReason::MissingCorners));
        assert_eq!(plan.corners.quad.tl, Point2D::new(10.0, 10.0));
    }

    #[test]
    fn slice_numbers_are_one_based() {
        let plan = WallAnalyzer::new(AnalyzerParams::default())
            .analyze(&wall_photo(), None)
            .expect("rectifiable");
        assert!(plan.grid_for_slice(1).is_ok());
        assert!(matches!(
            plan.grid_for_slice(0),
            Err(GridError::SliceOutOfRange { index: 0, .. })
        ));
        let past = plan.slices.len() + 1;
        assert!(plan.grid_for_slice(past).is_err());
    }
}
