use super::{BorderSet, FallbackLines};
use crate::geometry::{Orientation, Segment};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierOptions {
    /// Fraction of the frame size, measured from each edge, in which a
    /// segment midpoint must lie to count as a border candidate.
    pub margin_fraction: f64,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            margin_fraction: 0.2,
        }
    }
}

/// Bucket segments into border classes.
///
/// A horizontal segment (`|Δx| > |Δy|`) is TOP when its midpoint lies above
/// the frame centre and within the top margin, BOTTOM when it lies within the
/// bottom margin. Vertical segments follow the same rule against LEFT/RIGHT.
/// Everything else is dropped.
pub fn classify_segments(
    segments: &[Segment],
    width: usize,
    height: usize,
    options: &ClassifierOptions,
) -> BorderSet {
    let (w, h) = (width as f64, height as f64);
    let center_x = (width / 2) as f64;
    let center_y = (height / 2) as f64;
    let margin = options.margin_fraction;
    let (upper, lower) = (h * margin, h * (1.0 - margin));
    let (left_limit, right_limit) = (w * margin, w * (1.0 - margin));

    let mut set = BorderSet::default();
    for seg in segments {
        let seg = Segment::from_endpoints(seg.start, seg.end);
        let mid = seg.midpoint();
        match seg.orientation {
            Orientation::Horizontal => {
                if mid.y < center_y && mid.y <= upper {
                    set.top.push(seg);
                } else if mid.y >= lower {
                    set.bottom.push(seg);
                }
            }
            Orientation::Vertical => {
                if mid.x < center_x && mid.x <= left_limit {
                    set.left.push(seg);
                } else if mid.x >= right_limit {
                    set.right.push(seg);
                }
            }
        }
    }
    log::debug!(
        "classify: {} segments -> top {} bottom {} left {} right {}",
        segments.len(),
        set.top.len(),
        set.bottom.len(),
        set.left.len(),
        set.right.len()
    );
    set
}

/// Classify, substituting the frame-edge lines when detection found nothing.
pub fn classify_or_fallback(
    segments: &[Segment],
    width: usize,
    height: usize,
    options: &ClassifierOptions,
    fallback: &FallbackLines,
) -> (BorderSet, bool) {
    if segments.is_empty() {
        log::debug!("classify: no detected segments, using frame edges");
        let set = BorderSet {
            top: vec![fallback.top],
            bottom: vec![fallback.bottom],
            left: vec![fallback.left],
            right: vec![fallback.right],
        };
        return (set, true);
    }
    (
        classify_segments(segments, width, height, options),
        false,
    )
}
