use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(255, 127), 127);
    assert_eq!(mul_div255_u16(100, 128), 50);
}

#[test]
fn over_premul_transparent_keeps_destination() {
    let mut dst = [10u8, 20, 30];
    over_premul_rgb(&mut dst, &[0, 0, 0, 0]);
    assert_eq!(dst, [10, 20, 30]);
}

#[test]
fn over_premul_opaque_replaces_destination() {
    let mut dst = [10u8, 20, 30];
    over_premul_rgb(&mut dst, &[200, 100, 50, 255]);
    assert_eq!(dst, [200, 100, 50]);
}

#[test]
fn over_premul_half_alpha_mixes() {
    // Premultiplied white @ ~50% over black.
    let mut dst = [0u8, 0, 0];
    over_premul_rgb(&mut dst, &[128, 128, 128, 128]);
    assert_eq!(dst, [128, 128, 128]);
}

#[test]
fn lerp_endpoints() {
    assert_eq!(lerp_u8(10, 200, 0.0), 10);
    assert_eq!(lerp_u8(10, 200, 1.0), 200);
    assert_eq!(lerp_u8(0, 200, 0.5), 100);
}
