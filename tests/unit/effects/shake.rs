use super::*;

fn numbered(w: u32, h: u32) -> FrameRgb {
    let data = (0..w * h).flat_map(|i| [i as u8, 0, 0]).collect();
    FrameRgb::new(w, h, data).unwrap()
}

#[test]
fn offsets_stay_within_intensity() {
    let mut rng = shake_rng(1, 0);
    for _ in 0..500 {
        let (x, y) = screen_shake_offset(&mut rng, 3);
        assert!((-3..=3).contains(&x) && (-3..=3).contains(&y));
    }
}

#[test]
fn zero_intensity_never_moves() {
    let mut rng = shake_rng(9, 9);
    assert_eq!(screen_shake_offset(&mut rng, 0), (0, 0));
}

#[test]
fn per_frame_rng_is_reproducible() {
    let a = screen_shake_offset(&mut shake_rng(5, 12), 8);
    let b = screen_shake_offset(&mut shake_rng(5, 12), 8);
    assert_eq!(a, b);
}

#[test]
fn shift_moves_pixels_and_fills_edges() {
    let f = numbered(4, 3);
    let s = shift_frame(&f, 1, 1, Rgb8::new(9, 9, 9));
    assert_eq!(s.pixel(0, 0), Some(Rgb8::new(9, 9, 9)));
    assert_eq!(s.pixel(3, 0), Some(Rgb8::new(9, 9, 9)));
    assert_eq!(s.pixel(0, 1), Some(Rgb8::new(9, 9, 9)));
    assert_eq!(s.pixel(1, 1), f.pixel(0, 0));
    assert_eq!(s.pixel(3, 2), f.pixel(2, 1));

    let back = shift_frame(&f, -2, 0, Rgb8::BLACK);
    assert_eq!(back.pixel(0, 0), f.pixel(2, 0));
    assert_eq!(back.pixel(2, 0), Some(Rgb8::BLACK));
}

#[test]
fn shift_past_the_edge_is_all_fill() {
    let f = numbered(4, 4);
    assert_eq!(
        shift_frame(&f, 10, 0, Rgb8::WHITE),
        FrameRgb::filled(4, 4, Rgb8::WHITE)
    );
}

#[test]
fn shake_preserves_dimensions() {
    let f = numbered(6, 5);
    let out = apply_screen_shake(&f, &mut shake_rng(0, 3), 2);
    assert_eq!((out.width, out.height), (6, 5));
}
