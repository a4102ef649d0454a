use super::*;

fn gradient(w: u32, h: u32, shift: u8) -> FrameRgb {
    let mut data = Vec::with_capacity((w * h * 3) as usize);
    for y in 0..h {
        for x in 0..w {
            data.push(((x * 255) / w.max(1)) as u8 ^ shift);
            data.push(((y * 255) / h.max(1)) as u8);
            data.push(shift.wrapping_add((x + y) as u8));
        }
    }
    FrameRgb::new(w, h, data).unwrap()
}

fn assert_every_pixel_in_palette(q: &QuantizedSequence) {
    for (i, f) in q.frames.iter().enumerate() {
        let p = q.palette_for(i).unwrap();
        assert_eq!(f.indices.len(), (q.width * q.height) as usize);
        for &idx in &f.indices {
            assert!((idx as usize) < p.len(), "index {idx} outside palette of {}", p.len());
        }
    }
    for (frame, rgb) in q.to_rgb_frames().unwrap().iter().enumerate() {
        let p = q.palette_for(frame).unwrap();
        for px in rgb.data.chunks_exact(3) {
            assert!(p.colors().contains(&Rgb8::new(px[0], px[1], px[2])));
        }
    }
}

#[test]
fn palette_drops_repeated_colours() {
    let p = Palette::new([Rgb8::WHITE, Rgb8::BLACK, Rgb8::WHITE]).unwrap();
    assert_eq!(p.colors(), &[Rgb8::WHITE, Rgb8::BLACK]);
    assert!(Palette::new(Vec::new()).is_err());
}

#[test]
fn nearest_index_prefers_exact_then_lowest() {
    let p = Palette::new([Rgb8::new(0, 0, 0), Rgb8::new(10, 10, 10), Rgb8::new(20, 20, 20)])
        .unwrap();
    assert_eq!(p.nearest_index([10, 10, 10]), 1);
    assert_eq!(p.nearest_index([14, 14, 14]), 1);
    // Equidistant between 0 and 10: lower index wins.
    assert_eq!(p.nearest_index([5, 5, 5]), 0);
    assert_eq!(p.nearest_index([255, 255, 255]), 2);
}

#[test]
fn few_colours_are_kept_verbatim() {
    let f = FrameRgb::filled(4, 4, Rgb8::new(3, 4, 5));
    let p = Palette::from_pixels(&f.data, 48).unwrap();
    assert_eq!(p.colors(), &[Rgb8::new(3, 4, 5)]);
}

#[test]
fn many_colours_are_reduced_to_the_request() {
    let f = gradient(64, 64, 0);
    let p = Palette::from_pixels(&f.data, 16).unwrap();
    assert!(p.len() <= 16);
    assert!(p.len() >= 2);
}

#[test]
fn empty_pixels_fail_to_build_a_palette() {
    assert!(matches!(
        Palette::from_pixels(&[], 16),
        Err(GifwrightError::Quantize(_))
    ));
}

#[test]
fn sample_indices_spread_evenly() {
    assert_eq!(sample_indices(0), Vec::<usize>::new());
    assert_eq!(sample_indices(3), vec![0, 1, 2]);
    assert_eq!(sample_indices(10), vec![0, 2, 4, 6, 8]);
    assert_eq!(sample_indices(12), vec![0, 2, 4, 7, 9]);
}

#[test]
fn synthetic_sample_is_padded_rectangle() {
    let frames = vec![FrameRgb::filled(10, 10, Rgb8::WHITE); 3];
    let img = synthetic_sample_image(&frames).unwrap();
    // 300 pixels -> width floor(sqrt(300)) = 17, height ceil(300/17) = 18.
    assert_eq!(img.dimensions(), (17, 18));
    let raw = img.as_raw();
    assert_eq!(&raw[..3], &[255, 255, 255]);
    assert_eq!(&raw[raw.len() - 3..], &[0, 0, 0]);
}

#[test]
fn synthetic_sample_width_is_capped() {
    let frames = vec![FrameRgb::filled(600, 600, Rgb8::WHITE); 2];
    let img = synthetic_sample_image(&frames).unwrap();
    assert_eq!(img.width(), SAMPLE_IMAGE_MAX_SIDE);
    assert_eq!(img.height(), (600u32 * 600 * 2).div_ceil(SAMPLE_IMAGE_MAX_SIDE));
}

#[test]
fn global_quantization_preserves_frame_count_and_palette_membership() {
    let frames: Vec<_> = (0..7u8).map(|i| gradient(32, 24, i * 30)).collect();
    let q = quantize_global(&frames, 32, Dither::FloydSteinberg).unwrap();

    assert_eq!(q.len(), 7);
    assert_eq!((q.width, q.height), (32, 24));
    let palette = q.global_palette.as_ref().unwrap();
    assert!(palette.len() <= 32);
    assert!(q.frames.iter().all(|f| f.palette.is_none()));
    assert!(q.colors_used() <= 32);
    assert_every_pixel_in_palette(&q);
}

#[test]
fn undithered_remap_is_nearest_colour() {
    let frames = vec![FrameRgb::filled(4, 4, Rgb8::new(250, 5, 5)); 2];
    let palette = Palette::new([Rgb8::new(255, 0, 0), Rgb8::new(0, 0, 255)]).unwrap();
    let idx = palette.remap(&frames[0], Dither::None).unwrap();
    assert!(idx.iter().all(|&i| i == 0));
}

#[test]
fn dithered_remap_lands_on_palette_colours() {
    let f = gradient(16, 16, 7);
    let palette = Palette::new([Rgb8::BLACK, Rgb8::WHITE, Rgb8::new(255, 0, 0)]).unwrap();
    let idx = palette.remap(&f, Dither::FloydSteinberg).unwrap();
    assert_eq!(idx.len(), 256);
    assert!(idx.iter().all(|&i| i < 3));
}

#[test]
fn single_frame_uses_local_palette() {
    let frames = vec![gradient(16, 16, 0)];
    let q = quantize(&frames, 8, Dither::FloydSteinberg, true).unwrap();
    assert!(q.global_palette.is_none());
    assert!(q.frames[0].palette.as_ref().unwrap().len() <= 8);
    assert_every_pixel_in_palette(&q);
}

#[test]
fn disabling_global_mode_quantizes_per_frame() {
    let frames: Vec<_> = (0..3u8).map(|i| gradient(16, 16, i * 80)).collect();
    let q = quantize(&frames, 8, Dither::None, false).unwrap();
    assert_eq!(q.len(), 3);
    assert!(q.global_palette.is_none());
    assert!(q.frames.iter().all(|f| f.palette.is_some()));
    assert_every_pixel_in_palette(&q);
}

#[test]
fn single_colour_sequence_quantizes_to_one_entry() {
    let frames = vec![FrameRgb::filled(8, 8, Rgb8::new(9, 9, 9)); 4];
    let q = quantize(&frames, 48, Dither::FloydSteinberg, true).unwrap();
    assert_eq!(q.len(), 4);
    assert_eq!(q.palette_len(), 1);
    assert_eq!(q.colors_used(), 1);
    assert_eq!(q.to_rgb_frames().unwrap(), frames);
}

#[test]
fn quantizing_nothing_is_an_error() {
    assert!(quantize(&[], 8, Dither::None, true).is_err());
}

#[test]
fn mixed_sizes_are_rejected() {
    let frames = vec![FrameRgb::filled(8, 8, Rgb8::BLACK), FrameRgb::filled(4, 4, Rgb8::BLACK)];
    assert!(quantize_per_frame(&frames, 8, Dither::None).is_err());
}

#[test]
fn failed_global_palette_falls_back_to_per_frame() {
    let frames: Vec<_> = (0..3u8).map(|i| gradient(16, 16, i * 80)).collect();
    let q = quantize_with_fallback(&frames, 8, Dither::None, true, |_, _, _| {
        Err(GifwrightError::quantize("palette synthesis failed"))
    })
    .unwrap();
    assert_eq!(q.len(), 3);
    assert!(q.global_palette.is_none());
    assert!(q.frames.iter().all(|f| f.palette.is_some()));
    assert_every_pixel_in_palette(&q);
}

#[test]
fn successful_global_stage_is_used_as_is() {
    let frames: Vec<_> = (0..2u8).map(|i| gradient(8, 8, i * 40)).collect();
    let q = quantize_with_fallback(&frames, 8, Dither::None, true, quantize_global).unwrap();
    assert!(q.global_palette.is_some());
    assert!(q.frames.iter().all(|f| f.palette.is_none()));
}
