use super::*;
use crate::optimize::quantize::{IndexedFrame, Palette};

fn two_colour_sequence(frames: Vec<Vec<u8>>, w: u32, h: u32) -> QuantizedSequence {
    QuantizedSequence {
        width: w,
        height: h,
        frames: frames
            .into_iter()
            .map(|indices| IndexedFrame {
                indices,
                palette: None,
            })
            .collect(),
        global_palette: Some(Palette::new([Rgb8::BLACK, Rgb8::WHITE]).unwrap()),
    }
}

#[test]
fn whole_centisecond_rates_use_a_constant_delay() {
    let fps = Fps::whole(20).unwrap();
    assert!((0..50).all(|i| delay_centis(fps, i) == 5));
    let fps = Fps::whole(10).unwrap();
    assert!((0..50).all(|i| delay_centis(fps, i) == 10));
}

#[test]
fn fractional_delays_follow_the_ideal_timeline() {
    let fps = Fps::whole(15).unwrap();
    let delays: Vec<u16> = (0..6).map(|i| delay_centis(fps, i)).collect();
    assert_eq!(delays, vec![7, 6, 7, 7, 6, 7]);

    for rate in [15, 30, 24, 12] {
        let fps = Fps::whole(rate).unwrap();
        let mut total = 0u64;
        for i in 0..120 {
            total += u64::from(delay_centis(fps, i));
            let ideal = (i as f64 + 1.0) * 100.0 / f64::from(rate);
            assert!((total as f64 - ideal).abs() <= 0.5, "{rate} fps, frame {i}");
        }
    }
}

#[test]
fn very_high_rates_clamp_to_one_centisecond() {
    let fps = Fps::whole(500).unwrap();
    assert!((0..10).all(|i| delay_centis(fps, i) == 1));
}

#[test]
fn changed_rect_bounds_differences() {
    let a = vec![Rgb8::BLACK; 16];
    let mut b = a.clone();
    b[4 + 1] = Rgb8::WHITE; // (1, 1)
    b[2 * 4 + 2] = Rgb8::WHITE; // (2, 2)
    assert_eq!(
        changed_rect(&a, &b, 4),
        FrameRect {
            left: 1,
            top: 1,
            width: 2,
            height: 2
        }
    );
}

#[test]
fn identical_frames_change_one_pixel_rect() {
    let a = vec![Rgb8::BLACK; 9];
    let r = changed_rect(&a, &a, 3);
    assert_eq!((r.left, r.top, r.width, r.height), (0, 0, 1, 1));
}

#[test]
fn crop_extracts_rows() {
    let idx: Vec<u8> = (0..16).collect();
    let rect = FrameRect {
        left: 1,
        top: 2,
        width: 2,
        height: 2,
    };
    assert_eq!(crop_indices(&idx, 4, rect), vec![9, 10, 13, 14]);
}

#[test]
fn encoded_stream_has_header_and_loop_extension() {
    let q = two_colour_sequence(vec![vec![0; 16], vec![1; 16]], 4, 4);
    let bytes = encode_gif(&q, &GifEncodeOpts::for_fps(Fps::whole(10).unwrap())).unwrap();
    assert_eq!(&bytes[..6], b"GIF89a");
    assert!(bytes.windows(11).any(|w| w == b"NETSCAPE2.0"));
    assert_eq!(*bytes.last().unwrap(), 0x3B);
}

#[test]
fn play_once_omits_loop_extension() {
    let q = two_colour_sequence(vec![vec![0; 4]], 2, 2);
    let opts = GifEncodeOpts {
        fps: Fps::whole(10).unwrap(),
        loop_forever: false,
        crop_unchanged: false,
    };
    let bytes = encode_gif(&q, &opts).unwrap();
    assert!(!bytes.windows(11).any(|w| w == b"NETSCAPE2.0"));
}

#[test]
fn empty_sequence_is_rejected() {
    let q = two_colour_sequence(Vec::new(), 4, 4);
    assert!(matches!(
        encode_gif(&q, &GifEncodeOpts::for_fps(Fps::whole(10).unwrap())),
        Err(GifwrightError::Empty(_))
    ));
}

#[test]
fn wrong_index_count_is_rejected() {
    let q = two_colour_sequence(vec![vec![0; 3]], 2, 2);
    assert!(matches!(
        encode_gif(&q, &GifEncodeOpts::for_fps(Fps::whole(10).unwrap())),
        Err(GifwrightError::Encode(_))
    ));
}

#[test]
fn out_of_range_index_is_rejected() {
    let q = two_colour_sequence(vec![vec![0, 1, 7, 0]], 2, 2);
    assert!(encode_gif(&q, &GifEncodeOpts::for_fps(Fps::whole(10).unwrap())).is_err());
}
