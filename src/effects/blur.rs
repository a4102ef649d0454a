use crate::foundation::error::{GifwrightError, GifwrightResult};
use crate::foundation::math::lerp_u8;
use crate::frame::buffer::FrameRgb;

/// Blend `frame` toward `prev` by `amount` (clamped to `[0, 1]`).
///
/// `prev == None` (the first frame of a clip) returns `frame` unchanged.
pub fn motion_blur(
    frame: &FrameRgb,
    prev: Option<&FrameRgb>,
    amount: f64,
) -> GifwrightResult<FrameRgb> {
    let Some(prev) = prev else {
        return Ok(frame.clone());
    };
    if prev.width != frame.width || prev.height != frame.height {
        return Err(GifwrightError::validation(format!(
            "motion blur needs equal sizes, got {}x{} and {}x{}",
            frame.width, frame.height, prev.width, prev.height
        )));
    }
    let t = amount.clamp(0.0, 1.0) as f32;
    let data = frame
        .data
        .iter()
        .zip(&prev.data)
        .map(|(&cur, &old)| lerp_u8(cur, old, t))
        .collect();
    FrameRgb::new(frame.width, frame.height, data)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
