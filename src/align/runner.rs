use super::{
    AlignError, AlignOptions, AlignState, AlignmentController, CaptureDevice, FrameRead,
    FrameStream, GuidanceSink,
};
use crate::corners::Quadrilateral;
use crate::geometry::Point2D;
use crate::image::Frame;
use crate::matching::{MatchOptions, TemplateMatcher};
use crate::rectify::{compute_homography, rectify, Rectification, RectifyOptions};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative stop flag, checked once per loop iteration.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoopOutcome {
    Aligned { frames: usize },
    Cancelled { frames: usize },
    /// A finite source ran out of frames before alignment.
    SourceClosed { frames: usize },
}

/// Frame-at-a-time guidance loop over a fixed rectification and target.
pub struct AlignmentLoop {
    rectification: Rectification,
    matcher: TemplateMatcher,
    controller: AlignmentController,
}

impl AlignmentLoop {
    pub fn new(
        rectification: Rectification,
        template: &Frame,
        target: Point2D,
        options: &AlignOptions,
        matching: MatchOptions,
    ) -> Result<Self, AlignError> {
        let matcher = TemplateMatcher::new(template, matching).ok_or(AlignError::EmptyTemplate)?;
        Ok(Self {
            rectification,
            matcher,
            controller: AlignmentController::new(target, options),
        })
    }

    /// Build the loop from a stored quadrilateral, recomputing its homography.
    pub fn for_quad(
        quad: &Quadrilateral,
        rectify_options: &RectifyOptions,
        template: &Frame,
        target: Point2D,
        options: &AlignOptions,
        matching: MatchOptions,
    ) -> Result<Self, AlignError> {
        let rectification = compute_homography(quad, rectify_options)?;
        Self::new(rectification, template, target, options, matching)
    }

    pub fn state(&self) -> AlignState {
        self.controller.state()
    }

    pub fn rectification(&self) -> &Rectification {
        &self.rectification
    }

    /// Process one captured frame and forward the guidance to `sink`.
    pub fn process_frame<S: GuidanceSink>(&mut self, frame: &Frame, sink: &mut S) -> AlignState {
        let rectified = rectify(frame, &self.rectification);
        let detection = self.matcher.locate(&rectified);
        sink.on_frame(&rectified, detection.as_ref());
        let outcome = self.controller.step(detection.map(|m| m.center()));
        if detection.is_none() {
            sink.no_detection();
        }
        for signal in outcome.signals {
            sink.emit(signal);
        }
        outcome.state
    }

    /// Run until aligned, cancelled, or the source closes.
    ///
    /// Opening the device is the only fatal step. The stream is owned by this
    /// call and released on every exit path.
    pub fn run<D: CaptureDevice, S: GuidanceSink>(
        &mut self,
        device: &mut D,
        sink: &mut S,
        cancel: &CancelToken,
    ) -> Result<LoopOutcome, AlignError> {
        let mut stream = device.open()?;
        let mut frames = 0usize;
        loop {
            if cancel.is_cancelled() {
                log::info!("align: cancelled after {frames} frames");
                return Ok(LoopOutcome::Cancelled { frames });
            }
            match stream.read() {
                FrameRead::Frame(frame) => {
                    frames += 1;
                    if self.process_frame(&frame, sink) == AlignState::Aligned {
                        log::info!("align: aligned after {frames} frames");
                        return Ok(LoopOutcome::Aligned { frames });
                    }
                }
                FrameRead::Dropped => continue,
                FrameRead::Closed => {
                    log::info!("align: source closed after {frames} frames");
                    return Ok(LoopOutcome::SourceClosed { frames });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::{Guidance, VecSink};
    use std::collections::VecDeque;

    struct ScriptedDevice {
        frames: Vec<Frame>,
        released: Arc<AtomicBool>,
        fail: bool,
    }

    struct ScriptedStream {
        frames: VecDeque<FrameRead>,
        released: Arc<AtomicBool>,
    }

    impl FrameStream for ScriptedStream {
        fn read(&mut self) -> FrameRead {
            self.frames.pop_front().unwrap_or(FrameRead::Closed)
        }
    }

    impl Drop for ScriptedStream {
        fn drop(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    impl CaptureDevice for ScriptedDevice {
        type Stream = ScriptedStream;

        fn open(&mut self) -> Result<ScriptedStream, AlignError> {
            if self.fail {
                return Err(AlignError::CaptureUnavailable("scripted".into()));
            }
            let mut frames: VecDeque<FrameRead> =
                self.frames.drain(..).map(FrameRead::Frame).collect();
            frames.push_front(FrameRead::Dropped);
            Ok(ScriptedStream {
                frames,
                released: Arc::clone(&self.released),
            })
        }
    }

    fn picture() -> Frame {
        let mut f = Frame::new(24, 24, 1);
        for y in 0..24 {
            for x in 0..24 {
                let v = if x < 12 { 230 } else if y < 12 { 20 } else { 120 };
                f.pixel_mut(x, y)[0] = v;
            }
        }
        f
    }

    fn frame_with_picture_at(x0: usize, y0: usize) -> Frame {
        let tpl = picture();
        let mut f = Frame::new(120, 100, 1);
        for y in 0..24 {
            for x in 0..24 {
                f.pixel_mut(x0 + x, y0 + y)[0] = tpl.pixel(x, y)[0];
            }
        }
        f
    }

    fn identity_rectification() -> Rectification {
        let quad = Quadrilateral::inset_rect(120, 100, 0.0);
        let opts = RectifyOptions {
            output_width: 120,
            ..Default::default()
        };
        compute_homography(&quad, &opts).expect("valid")
    }

    fn make_loop(target: Point2D) -> AlignmentLoop {
        AlignmentLoop::new(
            identity_rectification(),
            &picture(),
            target,
            &AlignOptions::default(),
            MatchOptions {
                pyramid_levels: 1,
                ..Default::default()
            },
        )
        .expect("non-empty template")
    }

    #[test]
    fn runs_to_alignment_and_releases_stream() {
        // Centre of a 24px picture at (x0, y0) is (x0 + 12, y0 + 12): the
        // first frame sits at (70, 45), right of and above the target.
        let released = Arc::new(AtomicBool::new(false));
        let mut device = ScriptedDevice {
            frames: vec![
                frame_with_picture_at(58, 33),
                frame_with_picture_at(50, 40),
                frame_with_picture_at(60, 60),
            ],
            released: Arc::clone(&released),
            fail: false,
        };
        let mut sink = VecSink::default();
        let mut lp = make_loop(Point2D::new(62.0, 52.0));
        let outcome = lp
            .run(&mut device, &mut sink, &CancelToken::new())
            .expect("device opens");
        assert_eq!(outcome, LoopOutcome::Aligned { frames: 2 });
        assert_eq!(
            sink.signals,
            vec![Guidance::MoveLeft, Guidance::MoveDown, Guidance::Aligned]
        );
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn cancel_stops_before_reading() {
        let released = Arc::new(AtomicBool::new(false));
        let mut device = ScriptedDevice {
            frames: vec![frame_with_picture_at(10, 10)],
            released: Arc::clone(&released),
            fail: false,
        };
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut sink = VecSink::default();
        let outcome = make_loop(Point2D::new(0.0, 0.0))
            .run(&mut device, &mut sink, &cancel)
            .expect("device opens");
        assert_eq!(outcome, LoopOutcome::Cancelled { frames: 0 });
        assert!(sink.signals.is_empty());
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn unavailable_device_is_fatal() {
        let mut device = ScriptedDevice {
            frames: Vec::new(),
            released: Arc::new(AtomicBool::new(false)),
            fail: true,
        };
        let result = make_loop(Point2D::new(0.0, 0.0)).run(
            &mut device,
            &mut VecSink::default(),
            &CancelToken::new(),
        );
        assert!(matches!(result, Err(AlignError::CaptureUnavailable(_))));
    }

    #[test]
    fn blank_frames_count_as_misses_until_source_closes() {
        let mut device = ScriptedDevice {
            frames: vec![Frame::new(120, 100, 1), Frame::new(120, 100, 1)],
            released: Arc::new(AtomicBool::new(false)),
            fail: false,
        };
        let mut sink = VecSink::default();
        let outcome = make_loop(Point2D::new(10.0, 10.0))
            .run(&mut device, &mut sink, &CancelToken::new())
            .expect("device opens");
        assert_eq!(outcome, LoopOutcome::SourceClosed { frames: 2 });
        assert_eq!(sink.misses, 2);
        assert!(sink.signals.is_empty());
    }

    #[test]
    fn empty_template_is_rejected() {
        let result = AlignmentLoop::new(
            identity_rectification(),
            &Frame::new(0, 0, 1),
            Point2D::new(0.0, 0.0),
            &AlignOptions::default(),
            MatchOptions::default(),
        );
        assert!(matches!(result, Err(AlignError::EmptyTemplate)));
    }
}
