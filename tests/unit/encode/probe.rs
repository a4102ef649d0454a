use super::*;
use crate::encode::gif::{GifEncodeOpts, encode_gif};
use crate::foundation::core::{Fps, Rgb8};
use crate::optimize::profile::DimensionFit;
use crate::optimize::quantize::{Dither, quantize};

fn encoded(w: u32, h: u32, n: usize, fps: u32, loop_forever: bool) -> Vec<u8> {
    let frames: Vec<FrameRgb> = (0..n)
        .map(|i| {
            let mut f = FrameRgb::filled(w, h, Rgb8::new(10, 10, 10));
            f.put_pixel(i as u32 % w, 0, Rgb8::new(250, 200, 0));
            f
        })
        .collect();
    let q = quantize(&frames, 16, Dither::None, true).unwrap();
    let opts = GifEncodeOpts {
        loop_forever,
        ..GifEncodeOpts::for_fps(Fps::whole(fps).unwrap())
    };
    encode_gif(&q, &opts).unwrap()
}

#[test]
fn probe_reads_back_geometry_and_timing() {
    let bytes = encoded(20, 10, 6, 10, true);
    let p = probe_gif_bytes(&bytes).unwrap();
    assert_eq!((p.width, p.height), (20, 10));
    assert_eq!(p.frame_count, 6);
    assert!(p.delays_ms.iter().all(|&d| (d - 100.0).abs() < 1e-9));
    assert!((p.duration_secs - 0.6).abs() < 1e-9);
    assert!((p.fps.unwrap() - 10.0).abs() < 1e-9);
    assert!(p.loops_forever);
    assert_eq!(p.size_bytes, bytes.len() as u64);
}

#[test]
fn play_once_stream_is_not_looping() {
    let bytes = encoded(4, 4, 2, 10, false);
    assert!(!probe_gif_bytes(&bytes).unwrap().loops_forever);
}

#[test]
fn decoded_frames_match_what_was_drawn() {
    let bytes = encoded(8, 8, 3, 20, true);
    let (probe, frames) = decode_gif_frames(&bytes).unwrap();
    assert_eq!(frames.len(), probe.frame_count);
    // Cropped frames are composited back into full canvases by the decoder.
    let last = &frames[2];
    assert_eq!(last.pixel(2, 0), Some(Rgb8::new(250, 200, 0)));
    assert_eq!(last.pixel(0, 0), Some(Rgb8::new(10, 10, 10)));
    assert_eq!(last.pixel(5, 5), Some(Rgb8::new(10, 10, 10)));
}

#[test]
fn garbage_is_rejected() {
    assert!(probe_gif_bytes(b"definitely not a gif").is_err());
}

#[test]
fn validation_flags_oversized_emoji() {
    let bytes = encoded(20, 10, 2, 10, true);
    let probe = probe_gif_bytes(&bytes).unwrap();
    let report = validate_probe(probe, &OptimizationProfile::emoji());
    assert!(report.size.passes);
    assert_eq!(report.dimensions.fit, DimensionFit::Unsuitable);
    assert!(!report.passes);
    assert!(!report.suggestions.is_empty());
}
