mod common;

use common::synthetic_wall::{paste, picture, textured_wall};
use hang_guide::align::{
    AlignError, AlignOptions, AlignmentLoop, CancelToken, Guidance, GuidanceSink,
    ImageSequenceDevice, LoopOutcome, VecSink,
};
use hang_guide::corners::Quadrilateral;
use hang_guide::geometry::Point2D;
use hang_guide::image::io::save_frame;
use hang_guide::image::Frame;
use hang_guide::matching::MatchOptions;
use hang_guide::rectify::{RectifyError, RectifyOptions};
use std::fs;
use std::path::PathBuf;

const W: usize = 400;
const H: usize = 300;
const TARGET: Point2D = Point2D::new(200.0, 150.0);

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hang_guide_it_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

/// Live frame with the 48x36 picture held at `top_left`.
fn live_frame(top_left: (usize, usize)) -> Frame {
    let mut frame = textured_wall(W, H);
    paste(&mut frame, &picture(48, 36), top_left.0, top_left.1);
    frame
}

fn write_frames(dir: &PathBuf, frames: &[Frame]) {
    for (i, frame) in frames.iter().enumerate() {
        save_frame(frame, &dir.join(format!("frame_{i:03}.png"))).expect("write frame");
    }
}

/// Whole-frame quad with an output as wide as the frame: the rectified view
/// matches the live frame away from its last row and column.
fn make_loop() -> AlignmentLoop {
    AlignmentLoop::for_quad(
        &Quadrilateral::inset_rect(W, H, 0.0),
        &RectifyOptions {
            output_width: W,
            ..Default::default()
        },
        &picture(48, 36),
        TARGET,
        &AlignOptions::default(),
        MatchOptions::default(),
    )
    .expect("valid loop")
}

#[test]
fn replayed_frames_guide_to_alignment() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = scratch_dir("replay");
    let grey = Frame::from_raw(W, H, 3, vec![128; W * H * 3]).expect("valid");
    write_frames(
        &dir,
        &[
            live_frame((200, 100)), // centre (224, 118)
            grey,
            live_frame((170, 140)), // centre (194, 158)
            live_frame((176, 132)), // centre (200, 150)
            live_frame((10, 10)),
        ],
    );

    let mut sink = VecSink::default();
    let outcome = make_loop()
        .run(
            &mut ImageSequenceDevice::new(&dir),
            &mut sink,
            &CancelToken::new(),
        )
        .expect("directory opens");

    assert_eq!(outcome, LoopOutcome::Aligned { frames: 4 });
    assert_eq!(
        sink.signals,
        vec![
            Guidance::MoveLeft,
            Guidance::MoveDown,
            Guidance::MoveRight,
            Guidance::MoveUp,
            Guidance::Aligned,
        ]
    );
    assert_eq!(sink.misses, 1);
    let _ = fs::remove_dir_all(&dir);
}

/// Cancels the loop as soon as the first guidance arrives.
struct CancellingSink {
    token: CancelToken,
    inner: VecSink,
}

impl GuidanceSink for CancellingSink {
    fn emit(&mut self, guidance: Guidance) {
        self.inner.emit(guidance);
        self.token.cancel();
    }
}

#[test]
fn cancel_is_honoured_between_frames() {
    let dir = scratch_dir("cancel");
    write_frames(&dir, &[live_frame((40, 40)), live_frame((176, 132))]);

    let token = CancelToken::new();
    let mut sink = CancellingSink {
        token: token.clone(),
        inner: VecSink::default(),
    };
    let outcome = make_loop()
        .run(&mut ImageSequenceDevice::new(&dir), &mut sink, &token)
        .expect("directory opens");

    assert_eq!(outcome, LoopOutcome::Cancelled { frames: 1 });
    assert_eq!(
        sink.inner.signals,
        vec![Guidance::MoveRight, Guidance::MoveDown]
    );
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn exhausted_source_without_alignment() {
    let dir = scratch_dir("exhausted");
    write_frames(&dir, &[live_frame((40, 40))]);
    let mut sink = VecSink::default();
    let outcome = make_loop()
        .run(
            &mut ImageSequenceDevice::new(&dir),
            &mut sink,
            &CancelToken::new(),
        )
        .expect("directory opens");
    assert_eq!(outcome, LoopOutcome::SourceClosed { frames: 1 });
    assert_eq!(sink.signals.len(), 2);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn empty_directory_is_fatal() {
    let dir = scratch_dir("empty");
    let result = make_loop().run(
        &mut ImageSequenceDevice::new(&dir),
        &mut VecSink::default(),
        &CancelToken::new(),
    );
    assert!(matches!(result, Err(AlignError::CaptureUnavailable(_))));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn degenerate_quad_cannot_start_a_loop() {
    let collapsed = Quadrilateral::from_unordered([Point2D::new(10.0, 10.0); 4]);
    let result = AlignmentLoop::for_quad(
        &collapsed,
        &RectifyOptions::default(),
        &picture(48, 36),
        TARGET,
        &AlignOptions::default(),
        MatchOptions::default(),
    );
    assert!(matches!(
        result,
        Err(AlignError::Rectify(RectifyError::DegenerateQuad { .. }))
    ));
}
