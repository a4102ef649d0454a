use std::io::Cursor;
use std::path::Path;

use anyhow::Context as _;
use image::{AnimationDecoder, ImageDecoder, codecs::gif::GifDecoder};

use crate::foundation::core::Canvas;
use crate::foundation::error::{GifwrightError, GifwrightResult};
use crate::frame::buffer::FrameRgb;
use crate::optimize::profile::{
    DimensionCheck, OptimizationProfile, SizeCheck, check_size, optimization_suggestions,
    validate_dimensions,
};

/// Facts read back from an encoded GIF.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GifProbe {
    /// Logical screen width.
    pub width: u32,
    /// Logical screen height.
    pub height: u32,
    /// Number of frames.
    pub frame_count: usize,
    /// Per-frame delay in milliseconds.
    pub delays_ms: Vec<f64>,
    /// Sum of all delays in seconds.
    pub duration_secs: f64,
    /// Effective playback rate, `None` when every delay is zero.
    pub fps: Option<f64>,
    /// Whether the stream carries an infinite-loop NETSCAPE2.0 extension.
    pub loops_forever: bool,
    /// File size in bytes.
    pub size_bytes: u64,
}

/// Decode `bytes` and summarize it.
pub fn probe_gif_bytes(bytes: &[u8]) -> GifwrightResult<GifProbe> {
    probe_and_decode(bytes, false).map(|(p, _)| p)
}

/// Decode `bytes` into composited full-canvas frames alongside the summary.
pub fn decode_gif_frames(bytes: &[u8]) -> GifwrightResult<(GifProbe, Vec<FrameRgb>)> {
    probe_and_decode(bytes, true)
}

/// Read and summarize the GIF at `path`.
pub fn probe_gif(path: impl AsRef<Path>) -> GifwrightResult<GifProbe> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read gif '{}'", path.display()))?;
    probe_gif_bytes(&bytes)
}

fn probe_and_decode(bytes: &[u8], keep_frames: bool) -> GifwrightResult<(GifProbe, Vec<FrameRgb>)> {
    let decoder = GifDecoder::new(Cursor::new(bytes))
        .map_err(|e| GifwrightError::encode(format!("failed to read gif: {e}")))?;
    let (width, height) = decoder.dimensions();
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| GifwrightError::encode(format!("failed to decode gif frames: {e}")))?;

    let delays_ms: Vec<f64> = frames
        .iter()
        .map(|f| {
            let (num, den) = f.delay().numer_denom_ms();
            f64::from(num) / f64::from(den.max(1))
        })
        .collect();
    let total_ms: f64 = delays_ms.iter().sum();
    let duration_secs = total_ms / 1000.0;
    let fps = (duration_secs > 0.0).then(|| frames.len() as f64 / duration_secs);

    let decoded = if keep_frames {
        frames
            .into_iter()
            .map(|f| FrameRgb::from(f.into_buffer()))
            .collect()
    } else {
        Vec::new()
    };

    let probe = GifProbe {
        width,
        height,
        frame_count: delays_ms.len(),
        delays_ms,
        duration_secs,
        fps,
        loops_forever: has_infinite_loop(bytes),
        size_bytes: bytes.len() as u64,
    };
    Ok((probe, decoded))
}

fn has_infinite_loop(bytes: &[u8]) -> bool {
    // Application extension payload: id, sub-block of 3 bytes, sub-id 1, loop count 0 (LE).
    const NETSCAPE_FOREVER: &[u8] = b"NETSCAPE2.0\x03\x01\x00\x00";
    bytes
        .windows(NETSCAPE_FOREVER.len())
        .any(|w| w == NETSCAPE_FOREVER)
}

/// Result of checking an existing GIF against a profile.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValidationReport {
    /// Decoded summary.
    pub probe: GifProbe,
    /// Byte budget verdict.
    pub size: SizeCheck,
    /// Dimension verdict.
    pub dimensions: DimensionCheck,
    /// Both size and dimensions pass.
    pub passes: bool,
    /// Remedies when something failed.
    pub suggestions: Vec<String>,
}

/// Check a GIF on disk against `profile`.
pub fn validate_gif(
    path: impl AsRef<Path>,
    profile: &OptimizationProfile,
) -> GifwrightResult<ValidationReport> {
    let probe = probe_gif(path)?;
    Ok(validate_probe(probe, profile))
}

/// Check an already probed GIF against `profile`.
pub fn validate_probe(probe: GifProbe, profile: &OptimizationProfile) -> ValidationReport {
    let size = check_size(probe.size_bytes, profile);
    let canvas = Canvas {
        width: probe.width,
        height: probe.height,
    };
    let dimensions = validate_dimensions(canvas, profile.profile);
    let passes = size.passes && dimensions.passes();
    let suggestions = if passes {
        Vec::new()
    } else {
        optimization_suggestions(&size, &dimensions)
    };
    ValidationReport {
        probe,
        size,
        dimensions,
        passes,
        suggestions,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/probe.rs"]
mod tests;
