use std::borrow::Cow;

use crate::foundation::core::{Fps, Rgb8};
use crate::foundation::error::{GifwrightError, GifwrightResult};
use crate::optimize::quantize::QuantizedSequence;

/// Options for [`encode_gif`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GifEncodeOpts {
    /// Playback rate; per-frame delays follow this timeline (see [`delay_centis`]).
    pub fps: Fps,
    /// Loop forever (`true`) or play once.
    pub loop_forever: bool,
    /// Only store the rectangle that changed since the previous frame.
    pub crop_unchanged: bool,
}

impl GifEncodeOpts {
    /// Infinite loop at `fps`.
    pub fn for_fps(fps: Fps) -> Self {
        Self {
            fps,
            loop_forever: true,
            crop_unchanged: true,
        }
    }
}

/// GIF delay of frame `index` at `fps`, in 1/100 s, at least 1.
///
/// Delays are the differences of the rounded ideal timeline, so the rounding error never
/// builds up: 15 fps gives 7, 6, 7, 7, 6, 7, ... and, up to 100 fps, `n` frames last
/// `round(n * 100 / fps)` centiseconds.
pub fn delay_centis(fps: Fps, index: usize) -> u16 {
    let i = index as u64;
    let d = timeline_centis(fps, i + 1).saturating_sub(timeline_centis(fps, i));
    d.clamp(1, u64::from(u16::MAX)) as u16
}

// round(frames * 100 * den / num), half up.
fn timeline_centis(fps: Fps, frames: u64) -> u64 {
    let num = u64::from(fps.num);
    let scaled = frames
        .saturating_mul(100)
        .saturating_mul(u64::from(fps.den));
    scaled.saturating_mul(2).saturating_add(num) / (2 * num)
}

/// Serialize a quantized sequence as an animated GIF.
///
/// A global colour table is written when the sequence has a shared palette, otherwise each
/// frame carries its own local table. Frames after the first are cropped to the changed
/// region (disposal "keep") when `crop_unchanged` is set.
#[tracing::instrument(skip(seq), fields(frames = seq.len(), w = seq.width, h = seq.height))]
pub fn encode_gif(seq: &QuantizedSequence, opts: &GifEncodeOpts) -> GifwrightResult<Vec<u8>> {
    if seq.is_empty() {
        return Err(GifwrightError::empty("no frames to encode"));
    }
    let width = gif_dim(seq.width, "width")?;
    let height = gif_dim(seq.height, "height")?;
    let pixel_count = (seq.width as usize) * (seq.height as usize);
    if let Some(bad) = seq.frames.iter().position(|f| f.indices.len() != pixel_count) {
        return Err(GifwrightError::encode(format!(
            "frame {bad} has {} indices, expected {pixel_count}",
            seq.frames[bad].indices.len()
        )));
    }

    let global = seq
        .global_palette
        .as_ref()
        .map(|p| p.to_rgb_bytes())
        .unwrap_or_default();

    let mut out = Vec::new();
    let mut enc = gif::Encoder::new(&mut out, width, height, &global).map_err(encode_err)?;
    if opts.loop_forever {
        enc.set_repeat(gif::Repeat::Infinite).map_err(encode_err)?;
    }

    let mut previous: Option<Vec<Rgb8>> = None;
    for i in 0..seq.len() {
        let palette = seq.palette_for(i)?;
        let indexed = &seq.frames[i];
        let colors = resolve_colors(&indexed.indices, palette.colors())?;

        let rect = match previous.as_deref() {
            Some(prev) if opts.crop_unchanged => changed_rect(prev, &colors, seq.width),
            _ => FrameRect::full(seq.width, seq.height),
        };
        let buffer = crop_indices(&indexed.indices, seq.width, rect);

        let frame = gif::Frame {
            delay: delay_centis(opts.fps, i),
            dispose: gif::DisposalMethod::Keep,
            left: rect.left as u16,
            top: rect.top as u16,
            width: rect.width as u16,
            height: rect.height as u16,
            palette: indexed.palette.as_ref().map(|p| p.to_rgb_bytes()),
            buffer: Cow::Owned(buffer),
            ..gif::Frame::default()
        };
        enc.write_frame(&frame).map_err(encode_err)?;
        previous = Some(colors);
    }

    enc.into_inner()
        .map_err(|e| GifwrightError::encode(format!("failed to finish gif stream: {e}")))?;
    Ok(out)
}

fn encode_err(e: gif::EncodingError) -> GifwrightError {
    GifwrightError::encode(e.to_string())
}

fn gif_dim(v: u32, what: &str) -> GifwrightResult<u16> {
    u16::try_from(v)
        .map_err(|_| GifwrightError::encode(format!("gif {what} {v} exceeds 65535")))
}

fn resolve_colors(indices: &[u8], palette: &[Rgb8]) -> GifwrightResult<Vec<Rgb8>> {
    indices
        .iter()
        .map(|&i| {
            palette.get(usize::from(i)).copied().ok_or_else(|| {
                GifwrightError::encode(format!(
                    "index {i} outside palette of {} colours",
                    palette.len()
                ))
            })
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FrameRect {
    pub(crate) left: u32,
    pub(crate) top: u32,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl FrameRect {
    fn full(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            width,
            height,
        }
    }
}

/// Bounding box of pixels that differ between two equally sized frames.
///
/// Identical frames yield a 1x1 rectangle at the origin (a GIF frame cannot be empty).
pub(crate) fn changed_rect(prev: &[Rgb8], cur: &[Rgb8], width: u32) -> FrameRect {
    let w = width as usize;
    let mut min_x = usize::MAX;
    let mut min_y = usize::MAX;
    let mut max_x = 0usize;
    let mut max_y = 0usize;
    for (i, (a, b)) in prev.iter().zip(cur).enumerate() {
        if a != b {
            let (x, y) = (i % w, i / w);
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }
    if min_x == usize::MAX {
        return FrameRect {
            left: 0,
            top: 0,
            width: 1,
            height: 1,
        };
    }
    FrameRect {
        left: min_x as u32,
        top: min_y as u32,
        width: (max_x - min_x + 1) as u32,
        height: (max_y - min_y + 1) as u32,
    }
}

pub(crate) fn crop_indices(indices: &[u8], width: u32, rect: FrameRect) -> Vec<u8> {
    let w = width as usize;
    let mut out = Vec::with_capacity((rect.width as usize) * (rect.height as usize));
    for y in rect.top..rect.top + rect.height {
        let start = (y as usize) * w + rect.left as usize;
        out.extend_from_slice(&indices[start..start + rect.width as usize]);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
