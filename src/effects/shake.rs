use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::foundation::core::Rgb8;
use crate::frame::buffer::FrameRgb;

/// Deterministic generator for the shake of one frame.
///
/// The same `(seed, frame_index)` always yields the same offset, without touching any
/// process-wide random state.
pub fn shake_rng(seed: u64, frame_index: u64) -> StdRng {
    StdRng::seed_from_u64(seed ^ frame_index.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Offset with each axis uniform in `-intensity ..= intensity`.
pub fn screen_shake_offset<R: Rng + ?Sized>(rng: &mut R, intensity: u32) -> (i32, i32) {
    let i = i32::try_from(intensity).unwrap_or(i32::MAX);
    (rng.gen_range(-i..=i), rng.gen_range(-i..=i))
}

/// Copy of `frame` translated by `(dx, dy)`; uncovered pixels become `fill`.
pub fn shift_frame(frame: &FrameRgb, dx: i32, dy: i32, fill: Rgb8) -> FrameRgb {
    let mut out = FrameRgb::filled(frame.width, frame.height, fill);
    let (w, h) = (i64::from(frame.width), i64::from(frame.height));
    for y in 0..h {
        let sy = y - i64::from(dy);
        if !(0..h).contains(&sy) {
            continue;
        }
        // Horizontal overlap of the source row with the destination row.
        let x0 = i64::from(dx).max(0);
        let x1 = (w + i64::from(dx)).min(w);
        if x0 >= x1 {
            continue;
        }
        let src = ((sy * w + x0 - i64::from(dx)) * 3) as usize;
        let dst = ((y * w + x0) * 3) as usize;
        let len = ((x1 - x0) * 3) as usize;
        out.data[dst..dst + len].copy_from_slice(&frame.data[src..src + len]);
    }
    out
}

/// Translate `frame` by a random offset of at most `intensity` pixels per axis over black.
pub fn apply_screen_shake<R: Rng + ?Sized>(frame: &FrameRgb, rng: &mut R, intensity: u32) -> FrameRgb {
    let (dx, dy) = screen_shake_offset(rng, intensity);
    shift_frame(frame, dx, dy, Rgb8::BLACK)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/shake.rs"]
mod tests;
