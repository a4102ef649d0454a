pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Composite one premultiplied RGBA8 source pixel over an opaque RGB8 destination.
pub(crate) fn over_premul_rgb(dst: &mut [u8], src_premul: &[u8]) {
    let a = u16::from(src_premul[3]);
    if a == 0 {
        return;
    }
    if a == 255 {
        dst.copy_from_slice(&src_premul[..3]);
        return;
    }
    let inv = 255 - a;
    for c in 0..3 {
        let v = u16::from(src_premul[c]) + mul_div255_u16(u16::from(dst[c]), inv);
        dst[c] = v.min(255) as u8;
    }
}

/// Linear blend `a * (1 - t) + b * t`, clamped and truncated to u8.
pub(crate) fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let v = f32::from(a) * (1.0 - t) + f32::from(b) * t;
    v.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
