use hang_guide::align::{
    AlignmentLoop, CancelToken, Guidance, GuidanceSink, ImageSequenceDevice, LoopOutcome,
    PrintSink,
};
use hang_guide::config::align::load_config;
use hang_guide::geometry::Point2D;
use hang_guide::image::io::{load_grayscale_frame, read_json_file, save_frame};
use hang_guide::image::Frame;
use hang_guide::matching::Match;
use hang_guide::render::draw_target_frame;
use hang_guide::session::HangPlan;
use std::env;
use std::path::{Path, PathBuf};

fn usage() -> String {
    "Usage: align_replay <config.json>".to_string()
}

/// Prints guidance and optionally saves every annotated rectified frame.
struct ReplaySink {
    print: PrintSink,
    target: Point2D,
    crop_size: (usize, usize),
    annotated_dir: Option<PathBuf>,
    frame_index: usize,
}

impl GuidanceSink for ReplaySink {
    fn emit(&mut self, guidance: Guidance) {
        self.print.emit(guidance);
    }

    fn no_detection(&mut self) {
        self.print.no_detection();
    }

    fn on_frame(&mut self, rectified: &Frame, detection: Option<&Match>) {
        self.frame_index += 1;
        let Some(dir) = &self.annotated_dir else {
            return;
        };
        let annotated = draw_target_frame(rectified, self.target, self.crop_size, detection);
        let path = dir.join(format!("frame_{:05}.png", self.frame_index));
        if let Err(err) = save_frame(&annotated, &path) {
            log::warn!("{err}");
        }
    }
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let plan: HangPlan = read_json_file(&config.plan)?;
    let target = plan
        .target
        .ok_or_else(|| format!("Plan {} has no target point", config.plan.display()))?;
    let template = load_grayscale_frame(&config.template)?;
    let crop_size = match &config.external_crop {
        Some(path) => {
            let outer = load_grayscale_frame(path)?;
            (outer.width(), outer.height())
        }
        None => (template.width(), template.height()),
    };

    let mut sink = ReplaySink {
        print: PrintSink,
        target,
        crop_size,
        annotated_dir: config.annotated_dir.clone(),
        frame_index: 0,
    };
    let mut lp = AlignmentLoop::new(
        plan.rectification,
        &template,
        target,
        &config.align,
        config.matching,
    )
    .map_err(|e| e.to_string())?;
    let mut device = ImageSequenceDevice::new(&config.frames);

    let outcome = lp
        .run(&mut device, &mut sink, &CancelToken::new())
        .map_err(|e| e.to_string())?;
    match outcome {
        LoopOutcome::Aligned { frames } => println!("Aligned after {frames} frames"),
        LoopOutcome::Cancelled { frames } => println!("Cancelled after {frames} frames"),
        LoopOutcome::SourceClosed { frames } => {
            println!("Frames exhausted after {frames} frames without alignment")
        }
    }
    Ok(())
}
