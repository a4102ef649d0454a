use std::path::Path;

use crate::encode::write_artifact;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{GifwrightError, GifwrightResult};
use crate::frame::buffer::FrameRgb;
use crate::optimize::pipeline::{EncodedArtifact, GifReport, SaveOpts, optimize};

/// Ordered frames at a fixed canvas size and frame rate.
///
/// Every stored frame matches [`FrameSequence::canvas`]; mismatched input is resampled on
/// insertion. Saving runs the optimization pipeline, which consumes a snapshot of the frames
/// and writes the resized/subsampled result back (see [`FrameSequence::save`]).
#[derive(Clone, Debug)]
pub struct FrameSequence {
    canvas: Canvas,
    fps: Fps,
    frames: Vec<FrameRgb>,
}

impl FrameSequence {
    /// Create an empty sequence.
    pub fn new(width: u32, height: u32, fps: Fps) -> GifwrightResult<Self> {
        Ok(Self {
            canvas: Canvas::new(width, height)?,
            fps,
            frames: Vec::new(),
        })
    }

    pub(crate) fn from_parts(canvas: Canvas, fps: Fps, frames: Vec<FrameRgb>) -> Self {
        Self {
            canvas,
            fps,
            frames,
        }
    }

    pub(crate) fn into_parts(self) -> (Canvas, Fps, Vec<FrameRgb>) {
        (self.canvas, self.fps, self.frames)
    }

    /// Append one frame, resampling it to the sequence canvas when the size differs.
    pub fn add_frame(&mut self, frame: impl Into<FrameRgb>) -> GifwrightResult<()> {
        let frame = frame.into();
        let frame = if frame.width != self.canvas.width || frame.height != self.canvas.height {
            tracing::debug!(
                from_w = frame.width,
                from_h = frame.height,
                to = %self.canvas,
                "resampling frame on insertion"
            );
            frame.resized(self.canvas.width, self.canvas.height)?
        } else {
            frame
        };
        self.frames.push(frame);
        Ok(())
    }

    /// Append frames in order.
    pub fn add_frames<I>(&mut self, frames: I) -> GifwrightResult<()>
    where
        I: IntoIterator,
        I::Item: Into<FrameRgb>,
    {
        for f in frames {
            self.add_frame(f)?;
        }
        Ok(())
    }

    /// Drop all frames, keeping canvas and fps.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Number of stored frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Return `true` when no frames are stored.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Borrow the stored frames.
    pub fn frames(&self) -> &[FrameRgb] {
        &self.frames
    }

    /// Current canvas size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Clone the sequence so the caller keeps the authored frames across a destructive save.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// Run the optimizer and write the GIF to `path`.
    ///
    /// The sequence is left in its post-optimization state: duplicate frames removed and, for
    /// the emoji profile, resized to 128x128 and subsampled. Call [`FrameSequence::snapshot`]
    /// first to keep the original.
    pub fn save(&mut self, path: impl AsRef<Path>, opts: &SaveOpts) -> GifwrightResult<GifReport> {
        let path = path.as_ref();
        let (after, artifact) = self.run_optimizer(opts)?;
        write_artifact(path, &artifact.bytes)?;
        *self = after;
        let report = artifact.report.with_path(path);
        tracing::info!(
            path = %path.display(),
            size_bytes = report.size_bytes,
            frames = report.frame_count,
            colors = report.colors,
            "gif written"
        );
        Ok(report)
    }

    /// Same pipeline as [`FrameSequence::save`], returning the bytes instead of writing a file.
    pub fn encode(&mut self, opts: &SaveOpts) -> GifwrightResult<EncodedArtifact> {
        let (after, artifact) = self.run_optimizer(opts)?;
        *self = after;
        Ok(artifact)
    }

    // Works on a clone so a failed run or write leaves the authored frames untouched.
    fn run_optimizer(&self, opts: &SaveOpts) -> GifwrightResult<(Self, EncodedArtifact)> {
        if self.frames.is_empty() {
            return Err(GifwrightError::empty(
                "no frames to save; add frames with add_frame() first",
            ));
        }
        opts.validate()?;
        if self.canvas.width > u32::from(u16::MAX) || self.canvas.height > u32::from(u16::MAX) {
            return Err(GifwrightError::validation(format!(
                "canvas {} exceeds the 65535px gif limit",
                self.canvas
            )));
        }
        optimize(self.clone(), opts)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/sequence.rs"]
mod tests;
