use super::Guidance;
use crate::image::Frame;
use crate::matching::Match;

/// Consumer of the loop's output: guidance phrases for the operator plus
/// optional per-frame hooks.
pub trait GuidanceSink {
    fn emit(&mut self, guidance: Guidance);

    /// Called when a frame produced no usable detection.
    fn no_detection(&mut self) {}

    /// Called with every rectified frame and its detection, if any.
    fn on_frame(&mut self, _rectified: &Frame, _detection: Option<&Match>) {}
}

impl<S: GuidanceSink + ?Sized> GuidanceSink for &mut S {
    fn emit(&mut self, guidance: Guidance) {
        (**self).emit(guidance)
    }

    fn no_detection(&mut self) {
        (**self).no_detection()
    }

    fn on_frame(&mut self, rectified: &Frame, detection: Option<&Match>) {
        (**self).on_frame(rectified, detection)
    }
}

/// Routes guidance to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl GuidanceSink for LogSink {
    fn emit(&mut self, guidance: Guidance) {
        log::info!("{guidance}");
    }

    fn no_detection(&mut self) {
        log::info!("No template detected. Retrying...");
    }
}

/// Prints one phrase per line on stdout.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrintSink;

impl GuidanceSink for PrintSink {
    fn emit(&mut self, guidance: Guidance) {
        println!("{guidance}");
    }

    fn no_detection(&mut self) {
        println!("No template detected. Retrying...");
    }
}

/// Collects guidance for later inspection.
#[derive(Clone, Debug, Default)]
pub struct VecSink {
    pub signals: Vec<Guidance>,
    pub misses: usize,
}

impl GuidanceSink for VecSink {
    fn emit(&mut self, guidance: Guidance) {
        self.signals.push(guidance);
    }

    fn no_detection(&mut self) {
        self.misses += 1;
    }
}
