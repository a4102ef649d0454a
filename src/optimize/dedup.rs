use crate::frame::buffer::FrameRgb;

/// Similarity threshold used by [`FrameSequence::save`](crate::FrameSequence::save).
pub const DEFAULT_DEDUP_THRESHOLD: f64 = 0.98;

/// Which frame a candidate is compared against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupBaseline {
    /// Compare against the last frame that was kept. Accumulated drift is bounded: a frame is
    /// kept once it has moved far enough from the last kept one.
    #[default]
    LastKept,
    /// Compare against the immediately preceding input frame, kept or not. Slow drift can
    /// collapse into one frame.
    Previous,
}

/// Normalized similarity `1 - mean(|a - b|) / 255` over every channel of every pixel.
///
/// Frames of different size are never similar (score `0.0`).
pub fn similarity(a: &FrameRgb, b: &FrameRgb) -> f64 {
    if a.width != b.width || a.height != b.height || a.data.len() != b.data.len() {
        return 0.0;
    }
    if a.data.is_empty() {
        return 1.0;
    }
    let total: u64 = a
        .data
        .iter()
        .zip(&b.data)
        .map(|(&x, &y)| u64::from(x.abs_diff(y)))
        .sum();
    let mean = total as f64 / a.data.len() as f64;
    1.0 - mean / 255.0
}

/// Drop frames whose similarity to the baseline is `>= threshold`.
///
/// The first frame is always kept. Returns the surviving frames (in order) and how many were
/// removed.
pub fn deduplicate(
    frames: Vec<FrameRgb>,
    threshold: f64,
    baseline: DedupBaseline,
) -> (Vec<FrameRgb>, usize) {
    if frames.len() < 2 {
        return (frames, 0);
    }

    let mut kept: Vec<FrameRgb> = Vec::with_capacity(frames.len());
    let mut previous: Option<FrameRgb> = None;
    let mut removed = 0usize;

    for frame in frames {
        let Some(last_kept) = kept.last() else {
            kept.push(frame);
            continue;
        };
        let reference = match baseline {
            DedupBaseline::LastKept => last_kept,
            DedupBaseline::Previous => previous.as_ref().unwrap_or(last_kept),
        };

        let redundant = similarity(reference, &frame) >= threshold;
        match baseline {
            DedupBaseline::LastKept => {
                if redundant {
                    removed += 1;
                } else {
                    kept.push(frame);
                }
            }
            DedupBaseline::Previous => {
                if redundant {
                    removed += 1;
                    previous = Some(frame);
                } else {
                    kept.push(frame);
                    previous = None;
                }
            }
        }
    }

    (kept, removed)
}

#[cfg(test)]
#[path = "../../tests/unit/optimize/dedup.rs"]
mod tests;
