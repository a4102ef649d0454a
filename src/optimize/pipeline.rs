use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::encode::gif::{GifEncodeOpts, encode_gif};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{GifwrightError, GifwrightResult};
use crate::frame::buffer::FrameRgb;
use crate::frame::sequence::FrameSequence;
use crate::optimize::dedup::{DEFAULT_DEDUP_THRESHOLD, DedupBaseline, deduplicate};
use crate::optimize::profile::{
    OptimizationProfile, Profile, check_size, optimization_suggestions, validate_dimensions,
};
use crate::optimize::quantize::{Dither, MAX_PALETTE_COLORS, QuantizedSequence, quantize};

/// Caller-tunable knobs for [`FrameSequence::save`].
///
/// Missing JSON fields take their [`Default`] values, so a config file only needs the keys it
/// changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SaveOpts {
    /// Requested palette size (`2..=256`); the emoji profile caps it further.
    pub colors: u16,
    /// Upload target.
    pub profile: Profile,
    /// Run the similarity deduplicator first.
    pub remove_duplicates: bool,
    /// Similarity at or above which a frame is dropped.
    pub dedup_threshold: f64,
    /// What a candidate frame is compared against.
    pub dedup_baseline: DedupBaseline,
    /// Remap strategy.
    pub dither: Dither,
    /// Share one palette across frames.
    pub global_palette: bool,
}

impl Default for SaveOpts {
    fn default() -> Self {
        Self {
            colors: 128,
            profile: Profile::Message,
            remove_duplicates: true,
            dedup_threshold: DEFAULT_DEDUP_THRESHOLD,
            dedup_baseline: DedupBaseline::LastKept,
            dither: Dither::FloydSteinberg,
            global_palette: true,
        }
    }
}

impl SaveOpts {
    /// Defaults with the emoji profile selected.
    pub fn emoji() -> Self {
        Self {
            profile: Profile::Emoji,
            ..Self::default()
        }
    }

    /// Reject out-of-range knobs.
    pub fn validate(&self) -> GifwrightResult<()> {
        if !(2..=MAX_PALETTE_COLORS).contains(&usize::from(self.colors)) {
            return Err(GifwrightError::validation(format!(
                "colors must be in 2..={MAX_PALETTE_COLORS}, got {}",
                self.colors
            )));
        }
        if !(0.0..=1.0).contains(&self.dedup_threshold) {
            return Err(GifwrightError::validation(format!(
                "dedup_threshold must be in [0, 1], got {}",
                self.dedup_threshold
            )));
        }
        Ok(())
    }
}

/// Final metrics for one optimizer run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GifReport {
    /// Destination, when the artifact was written to disk.
    pub path: Option<PathBuf>,
    /// Artifact size in bytes.
    pub size_bytes: u64,
    /// Size in KiB.
    pub size_kb: f64,
    /// Size in MiB.
    pub size_mb: f64,
    /// Output width.
    pub width: u32,
    /// Output height.
    pub height: u32,
    /// Frames written.
    pub frame_count: usize,
    /// Frames before deduplication and subsampling.
    pub original_frame_count: usize,
    /// Frames dropped by the deduplicator.
    pub removed_duplicates: usize,
    /// Playback rate.
    pub fps: f64,
    /// `frame_count / fps`.
    pub duration_secs: f64,
    /// Distinct colours present in the encoded frames.
    pub colors: usize,
    /// Entries in the largest colour table.
    pub palette_len: usize,
    /// Profile the artifact was optimized for.
    pub profile: Profile,
    /// Byte budget of that profile.
    pub limit_bytes: u64,
    /// `size_bytes <= limit_bytes`.
    pub passes: bool,
    /// Advisory messages (over budget, odd dimensions).
    pub warnings: Vec<String>,
    /// Remedies to try when the artifact misses its targets.
    pub suggestions: Vec<String>,
}

impl GifReport {
    /// Attach the destination path.
    pub fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.to_path_buf());
        self
    }
}

/// Encoded bytes plus the report describing them.
#[derive(Clone, Debug)]
pub struct EncodedArtifact {
    /// Complete GIF stream.
    pub bytes: Vec<u8>,
    /// Metrics for `bytes`.
    pub report: GifReport,
}

#[derive(Clone, Copy, Debug, Default)]
struct StageTally {
    original_frames: usize,
    removed_duplicates: usize,
}

/// Frames as authored, before any reduction.
#[derive(Debug)]
pub struct RawStage {
    seq: FrameSequence,
    tally: StageTally,
}

impl RawStage {
    /// Take ownership of `seq`. Fails when it holds no frames.
    pub fn new(seq: FrameSequence) -> GifwrightResult<Self> {
        if seq.is_empty() {
            return Err(GifwrightError::empty("no frames to optimize"));
        }
        let tally = StageTally {
            original_frames: seq.len(),
            removed_duplicates: 0,
        };
        Ok(Self { seq, tally })
    }

    /// Drop near-duplicate frames.
    #[tracing::instrument(skip(self), fields(frames = self.seq.len()))]
    pub fn deduplicate(self, threshold: f64, baseline: DedupBaseline) -> DedupedStage {
        let Self { seq, mut tally } = self;
        let (canvas, fps, frames) = seq.into_parts();
        let (frames, removed) = deduplicate(frames, threshold, baseline);
        if removed > 0 {
            tracing::debug!(removed, kept = frames.len(), "removed duplicate frames");
        }
        tally.removed_duplicates = removed;
        DedupedStage {
            seq: FrameSequence::from_parts(canvas, fps, frames),
            tally,
        }
    }

    /// Move on without deduplicating.
    pub fn skip_deduplicate(self) -> DedupedStage {
        DedupedStage {
            seq: self.seq,
            tally: self.tally,
        }
    }
}

/// Frames after deduplication.
#[derive(Debug)]
pub struct DedupedStage {
    seq: FrameSequence,
    tally: StageTally,
}

impl DedupedStage {
    /// Frames surviving deduplication.
    pub fn sequence(&self) -> &FrameSequence {
        &self.seq
    }

    /// Apply the profile's geometry, frame and colour caps.
    ///
    /// Consumes the stage: frames larger than the profile target are resampled (Lanczos3)
    /// and the frame count is reduced by keeping every `ceil(n / max_frames)`-th frame.
    #[tracing::instrument(skip(self), fields(frames = self.seq.len(), canvas = %self.seq.canvas()))]
    pub fn fit_profile(
        self,
        profile: &OptimizationProfile,
        requested_colors: u16,
    ) -> GifwrightResult<FittedStage> {
        let Self { seq, tally } = self;
        let (canvas, fps, frames) = seq.into_parts();

        let fitted = profile.fitted_canvas(canvas);
        let frames = if fitted != canvas {
            tracing::debug!(from = %canvas, to = %fitted, "resampling frames for profile");
            frames
                .par_iter()
                .map(|f| f.resized(fitted.width, fitted.height))
                .collect::<GifwrightResult<Vec<_>>>()?
        } else {
            frames
        };

        let stride = profile.frame_stride(frames.len());
        let frames: Vec<FrameRgb> = if stride > 1 {
            let before = frames.len();
            let kept: Vec<FrameRgb> = frames.into_iter().step_by(stride).collect();
            tracing::debug!(before, after = kept.len(), stride, "subsampled frames");
            kept
        } else {
            frames
        };

        let colors = profile.capped_colors(requested_colors);
        Ok(FittedStage {
            seq: FrameSequence::from_parts(fitted, fps, frames),
            tally,
            profile: *profile,
            colors,
        })
    }
}

/// Frames sized and counted for the target profile.
#[derive(Debug)]
pub struct FittedStage {
    seq: FrameSequence,
    tally: StageTally,
    profile: OptimizationProfile,
    colors: u16,
}

impl FittedStage {
    /// Frames after fitting.
    pub fn sequence(&self) -> &FrameSequence {
        &self.seq
    }

    /// Colour count the quantizer will be asked for.
    pub fn colors(&self) -> u16 {
        self.colors
    }

    /// Palette-reduce every frame.
    pub fn quantize(self, dither: Dither, global: bool) -> GifwrightResult<QuantizedStage> {
        let quantized = quantize(self.seq.frames(), usize::from(self.colors), dither, global)?;
        Ok(QuantizedStage {
            seq: self.seq,
            tally: self.tally,
            profile: self.profile,
            colors: self.colors,
            quantized,
        })
    }
}

/// Frames mapped onto palettes, ready to serialize.
#[derive(Debug)]
pub struct QuantizedStage {
    seq: FrameSequence,
    tally: StageTally,
    profile: OptimizationProfile,
    colors: u16,
    quantized: QuantizedSequence,
}

impl QuantizedStage {
    /// Indexed frames and palettes.
    pub fn quantized(&self) -> &QuantizedSequence {
        &self.quantized
    }

    /// Serialize and measure.
    ///
    /// Returns the fitted (unquantized) sequence alongside the artifact. An artifact over the
    /// byte budget is still returned; the overage is logged and recorded in the report.
    pub fn encode(self) -> GifwrightResult<(FrameSequence, EncodedArtifact)> {
        let fps = self.seq.fps();
        let bytes = encode_gif(&self.quantized, &GifEncodeOpts::for_fps(fps))?;
        let canvas = self.seq.canvas();
        let report = build_report(
            bytes.len() as u64,
            canvas,
            fps,
            &self.quantized,
            self.tally,
            &self.profile,
        );
        tracing::debug!(requested_colors = self.colors, used = report.colors, "encoded");
        Ok((self.seq, EncodedArtifact { bytes, report }))
    }
}

fn build_report(
    size_bytes: u64,
    canvas: Canvas,
    fps: Fps,
    quantized: &QuantizedSequence,
    tally: StageTally,
    profile: &OptimizationProfile,
) -> GifReport {
    let size = check_size(size_bytes, profile);
    let dims = validate_dimensions(canvas, profile.profile);
    let frame_count = quantized.len();

    let mut warnings = Vec::new();
    if !size.passes {
        tracing::warn!(
            size_kb = size.size_kb(),
            limit_kb = size.limit_kb(),
            overage_kb = size.overage_bytes as f64 / 1024.0,
            overage_percent = size.overage_percent,
            profile = profile.profile.name(),
            "gif exceeds size budget"
        );
        warnings.push(format!(
            "file size {:.1} KB exceeds {} limit of {:.1} KB by {:.1} KB ({:.1}%)",
            size.size_kb(),
            profile.profile.name(),
            size.limit_kb(),
            size.overage_bytes as f64 / 1024.0,
            size.overage_percent
        ));
    }
    if !dims.passes() {
        tracing::warn!(canvas = %canvas, profile = profile.profile.name(), "unsuitable dimensions");
        warnings.push(format!(
            "dimensions {canvas} are unsuitable for the {} profile",
            profile.profile.name()
        ));
    }

    GifReport {
        path: None,
        size_bytes,
        size_kb: size.size_kb(),
        size_mb: size_bytes as f64 / (1024.0 * 1024.0),
        width: canvas.width,
        height: canvas.height,
        frame_count,
        original_frame_count: tally.original_frames,
        removed_duplicates: tally.removed_duplicates,
        fps: fps.as_f64(),
        duration_secs: fps.frames_to_secs(frame_count as u64),
        colors: quantized.colors_used(),
        palette_len: quantized.palette_len(),
        profile: profile.profile,
        limit_bytes: size.limit_bytes,
        passes: size.passes,
        warnings,
        suggestions: optimization_suggestions(&size, &dims),
    }
}

/// Run every stage: deduplicate, fit to the profile, quantize, encode.
///
/// Consumes `seq` and hands back the reduced sequence next to the artifact.
#[tracing::instrument(skip(seq, opts), fields(frames = seq.len(), profile = opts.profile.name()))]
pub fn optimize(
    seq: FrameSequence,
    opts: &SaveOpts,
) -> GifwrightResult<(FrameSequence, EncodedArtifact)> {
    opts.validate()?;
    let profile = OptimizationProfile::from(opts.profile);
    let raw = RawStage::new(seq)?;
    let deduped = if opts.remove_duplicates {
        raw.deduplicate(opts.dedup_threshold, opts.dedup_baseline)
    } else {
        raw.skip_deduplicate()
    };
    deduped
        .fit_profile(&profile, opts.colors)?
        .quantize(opts.dither, opts.global_palette)?
        .encode()
}

#[cfg(test)]
#[path = "../../tests/unit/optimize/pipeline.rs"]
mod tests;
