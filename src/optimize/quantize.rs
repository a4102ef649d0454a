use std::collections::HashSet;

use image::{Rgb, RgbImage, imageops::ColorMap};
use rayon::prelude::*;

use crate::foundation::core::Rgb8;
use crate::foundation::error::{GifwrightError, GifwrightResult};
use crate::frame::buffer::FrameRgb;

/// Largest palette a GIF colour table can hold.
pub const MAX_PALETTE_COLORS: usize = 256;

/// Frames sampled across the sequence when building a shared palette.
pub const GLOBAL_SAMPLE_FRAMES: usize = 5;

/// Side cap of the synthetic sample image fed to the quantizer.
pub const SAMPLE_IMAGE_MAX_SIDE: u32 = 512;

// NeuQuant sampling factor; 10 matches the gif encoder's default speed.
const NEUQUANT_SAMPLEFAC: i32 = 10;

/// How full-colour pixels are mapped onto a reduced palette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dither {
    /// Nearest palette colour per pixel.
    None,
    /// Floyd-Steinberg error diffusion.
    #[default]
    FloydSteinberg,
}

/// An ordered set of at most 256 unique colours with nearest-colour lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb8>,
}

impl Palette {
    /// Build a palette, dropping repeated colours while keeping first-seen order.
    pub fn new(colors: impl IntoIterator<Item = Rgb8>) -> GifwrightResult<Self> {
        let mut seen = HashSet::new();
        let colors: Vec<Rgb8> = colors.into_iter().filter(|c| seen.insert(*c)).collect();
        if colors.is_empty() {
            return Err(GifwrightError::quantize("palette must contain at least one colour"));
        }
        if colors.len() > MAX_PALETTE_COLORS {
            return Err(GifwrightError::quantize(format!(
                "palette has {} colours, gif allows at most {MAX_PALETTE_COLORS}",
                colors.len()
            )));
        }
        Ok(Self { colors })
    }

    /// Derive a palette of at most `max_colors` entries from packed RGB8 pixels.
    ///
    /// When the input already has few enough distinct colours they are used verbatim;
    /// otherwise the pixels are reduced with NeuQuant.
    pub fn from_pixels(rgb: &[u8], max_colors: usize) -> GifwrightResult<Self> {
        if rgb.is_empty() || !rgb.len().is_multiple_of(3) {
            return Err(GifwrightError::quantize(format!(
                "cannot build a palette from {} bytes of rgb8",
                rgb.len()
            )));
        }
        let max_colors = max_colors.clamp(2, MAX_PALETTE_COLORS);

        if let Some(exact) = distinct_colors(rgb, max_colors) {
            return Self::new(exact);
        }

        let mut rgba = Vec::with_capacity(rgb.len() / 3 * 4);
        for px in rgb.chunks_exact(3) {
            rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        let nq = color_quant::NeuQuant::new(NEUQUANT_SAMPLEFAC, max_colors, &rgba);
        let map = nq.color_map_rgb();
        Self::new(map.chunks_exact(3).map(|c| Rgb8::new(c[0], c[1], c[2])))
    }

    /// Palette for a whole sequence, built from an evenly spaced sample of its frames.
    pub fn from_frames_sample(frames: &[FrameRgb], max_colors: usize) -> GifwrightResult<Self> {
        let sample = synthetic_sample_image(frames)?;
        Self::from_pixels(sample.as_raw(), max_colors)
    }

    /// Colours in table order.
    pub fn colors(&self) -> &[Rgb8] {
        &self.colors
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false` for a constructed palette; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Packed `r,g,b,r,g,b,...` table as written into a GIF colour table.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.colors.iter().flat_map(|c| c.to_array()).collect()
    }

    /// Colour at `index`.
    pub fn get(&self, index: u8) -> Option<Rgb8> {
        self.colors.get(usize::from(index)).copied()
    }

    /// Index of the closest entry by squared RGB distance; ties go to the lower index.
    pub fn nearest_index(&self, c: [u8; 3]) -> u8 {
        let mut best = 0usize;
        let mut best_d = u32::MAX;
        for (i, p) in self.colors.iter().enumerate() {
            let dr = i32::from(p.r) - i32::from(c[0]);
            let dg = i32::from(p.g) - i32::from(c[1]);
            let db = i32::from(p.b) - i32::from(c[2]);
            let d = (dr * dr + dg * dg + db * db) as u32;
            if d < best_d {
                best_d = d;
                best = i;
                if d == 0 {
                    break;
                }
            }
        }
        best as u8
    }

    /// Map every pixel of `frame` to a palette index.
    pub fn remap(&self, frame: &FrameRgb, dither: Dither) -> GifwrightResult<Vec<u8>> {
        match dither {
            Dither::None => Ok(frame
                .data
                .chunks_exact(3)
                .map(|px| self.nearest_index([px[0], px[1], px[2]]))
                .collect()),
            Dither::FloydSteinberg => {
                let mut img: RgbImage = frame.to_image()?;
                image::imageops::dither(&mut img, self);
                Ok(image::imageops::index_colors(&img, self).into_raw())
            }
        }
    }
}

impl ColorMap for Palette {
    type Color = Rgb<u8>;

    fn index_of(&self, color: &Rgb<u8>) -> usize {
        usize::from(self.nearest_index(color.0))
    }

    fn lookup(&self, index: usize) -> Option<Rgb<u8>> {
        self.colors.get(index).map(|c| Rgb(c.to_array()))
    }

    fn has_lookup(&self) -> bool {
        true
    }

    fn map_color(&self, color: &mut Rgb<u8>) {
        let i = self.nearest_index(color.0);
        color.0 = self.colors[usize::from(i)].to_array();
    }
}

/// Return the distinct colours of `rgb` in first-seen order, or `None` once there are more
/// than `limit` of them.
fn distinct_colors(rgb: &[u8], limit: usize) -> Option<Vec<Rgb8>> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for px in rgb.chunks_exact(3) {
        let c = Rgb8::new(px[0], px[1], px[2]);
        if seen.insert(c) {
            if out.len() == limit {
                return None;
            }
            out.push(c);
        }
    }
    Some(out)
}

/// One palette-indexed frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedFrame {
    /// One palette index per pixel, row-major.
    pub indices: Vec<u8>,
    /// Frame-local palette; `None` when the sequence's global palette applies.
    pub palette: Option<Palette>,
}

/// Output of quantization: every frame mapped onto a palette.
#[derive(Clone, Debug)]
pub struct QuantizedSequence {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames in input order.
    pub frames: Vec<IndexedFrame>,
    /// Shared palette when quantized globally.
    pub global_palette: Option<Palette>,
}

impl QuantizedSequence {
    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Return `true` when there are no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Palette that applies to frame `i`.
    pub fn palette_for(&self, i: usize) -> GifwrightResult<&Palette> {
        self.frames
            .get(i)
            .and_then(|f| f.palette.as_ref())
            .or(self.global_palette.as_ref())
            .ok_or_else(|| GifwrightError::quantize(format!("frame {i} has no palette")))
    }

    /// Largest palette size in use (the global palette, or the biggest local one).
    pub fn palette_len(&self) -> usize {
        match &self.global_palette {
            Some(p) => p.len(),
            None => self
                .frames
                .iter()
                .filter_map(|f| f.palette.as_ref().map(Palette::len))
                .max()
                .unwrap_or(0),
        }
    }

    /// Number of distinct colours actually present across all frames.
    pub fn colors_used(&self) -> usize {
        let mut seen = HashSet::new();
        for (i, f) in self.frames.iter().enumerate() {
            let Ok(p) = self.palette_for(i) else {
                continue;
            };
            for &idx in &f.indices {
                if let Some(c) = p.get(idx) {
                    seen.insert(c);
                }
            }
        }
        seen.len()
    }

    /// Expand back to RGB frames.
    pub fn to_rgb_frames(&self) -> GifwrightResult<Vec<FrameRgb>> {
        let mut out = Vec::with_capacity(self.frames.len());
        for (i, f) in self.frames.iter().enumerate() {
            let p = self.palette_for(i)?;
            let mut data = Vec::with_capacity(f.indices.len() * 3);
            for &idx in &f.indices {
                let c = p
                    .get(idx)
                    .ok_or_else(|| GifwrightError::quantize("palette index out of range"))?;
                data.extend_from_slice(&c.to_array());
            }
            out.push(FrameRgb::new(self.width, self.height, data)?);
        }
        Ok(out)
    }
}

/// Indices of up to [`GLOBAL_SAMPLE_FRAMES`] frames spread evenly over `len` frames.
pub fn sample_indices(len: usize) -> Vec<usize> {
    let n = GLOBAL_SAMPLE_FRAMES.min(len);
    (0..n).map(|i| i * len / n).collect()
}

/// Pack the sampled frames' pixels into a roughly square image, zero-padding the tail.
pub fn synthetic_sample_image(frames: &[FrameRgb]) -> GifwrightResult<RgbImage> {
    let mut pixels: Vec<u8> = Vec::new();
    for i in sample_indices(frames.len()) {
        pixels.extend_from_slice(&frames[i].data);
    }
    let total = pixels.len() / 3;
    if total == 0 {
        return Err(GifwrightError::quantize("no pixels to sample"));
    }

    let width = ((total as f64).sqrt() as u32).clamp(1, SAMPLE_IMAGE_MAX_SIDE);
    let height = total.div_ceil(width as usize) as u32;
    pixels.resize((width as usize) * (height as usize) * 3, 0);

    RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| GifwrightError::quantize("sample image size mismatch"))
}

/// Build one palette from a sample of `frames` and map every frame onto it.
#[tracing::instrument(skip(frames), fields(frames = frames.len()))]
pub fn quantize_global(
    frames: &[FrameRgb],
    max_colors: usize,
    dither: Dither,
) -> GifwrightResult<QuantizedSequence> {
    let (width, height) = uniform_size(frames)?;
    let palette = Palette::from_frames_sample(frames, max_colors)?;
    tracing::debug!(palette = palette.len(), "global palette built");

    let frames = frames
        .par_iter()
        .map(|f| {
            Ok(IndexedFrame {
                indices: palette.remap(f, dither)?,
                palette: None,
            })
        })
        .collect::<GifwrightResult<Vec<_>>>()?;

    Ok(QuantizedSequence {
        width,
        height,
        frames,
        global_palette: Some(palette),
    })
}

/// Quantize each frame against its own palette.
#[tracing::instrument(skip(frames), fields(frames = frames.len()))]
pub fn quantize_per_frame(
    frames: &[FrameRgb],
    max_colors: usize,
    dither: Dither,
) -> GifwrightResult<QuantizedSequence> {
    let (width, height) = uniform_size(frames)?;
    let frames = frames
        .par_iter()
        .map(|f| {
            let palette = Palette::from_pixels(&f.data, max_colors)?;
            Ok(IndexedFrame {
                indices: palette.remap(f, dither)?,
                palette: Some(palette),
            })
        })
        .collect::<GifwrightResult<Vec<_>>>()?;

    Ok(QuantizedSequence {
        width,
        height,
        frames,
        global_palette: None,
    })
}

/// Quantize with a shared palette when `global` is set and there is more than one frame,
/// falling back to per-frame palettes if global synthesis fails.
pub fn quantize(
    frames: &[FrameRgb],
    max_colors: usize,
    dither: Dither,
    global: bool,
) -> GifwrightResult<QuantizedSequence> {
    quantize_with_fallback(frames, max_colors, dither, global, quantize_global)
}

// `global_stage` is a parameter so the fallback can be driven by a failing stage; with
// `quantize_global` it only fails on input `quantize_per_frame` rejects as well.
pub(crate) fn quantize_with_fallback<G>(
    frames: &[FrameRgb],
    max_colors: usize,
    dither: Dither,
    global: bool,
    global_stage: G,
) -> GifwrightResult<QuantizedSequence>
where
    G: FnOnce(&[FrameRgb], usize, Dither) -> GifwrightResult<QuantizedSequence>,
{
    if global && frames.len() > 1 {
        match global_stage(frames, max_colors, dither) {
            Ok(q) => return Ok(q),
            Err(e) => {
                tracing::warn!(error = %e, "global palette failed, quantizing per frame");
            }
        }
    }
    quantize_per_frame(frames, max_colors, dither)
}

fn uniform_size(frames: &[FrameRgb]) -> GifwrightResult<(u32, u32)> {
    let first = frames
        .first()
        .ok_or_else(|| GifwrightError::empty("no frames to quantize"))?;
    if frames
        .iter()
        .any(|f| f.width != first.width || f.height != first.height)
    {
        return Err(GifwrightError::validation(
            "all frames must share one size before quantization",
        ));
    }
    Ok((first.width, first.height))
}

#[cfg(test)]
#[path = "../../tests/unit/optimize/quantize.rs"]
mod tests;
