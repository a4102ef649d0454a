use super::*;
use crate::foundation::core::Rgb8;

fn fps15() -> Fps {
    Fps::whole(15).unwrap()
}

#[test]
fn new_rejects_empty_canvas() {
    assert!(FrameSequence::new(0, 480, fps15()).is_err());
}

#[test]
fn mismatched_frames_are_resampled_on_insert() {
    let mut seq = FrameSequence::new(480, 480, fps15()).unwrap();
    seq.add_frame(FrameRgb::filled(256, 256, Rgb8::new(200, 10, 10)))
        .unwrap();
    seq.add_frame(FrameRgb::filled(256, 256, Rgb8::new(10, 200, 10)))
        .unwrap();

    assert_eq!(seq.len(), 2);
    for f in seq.frames() {
        assert_eq!((f.width, f.height), (480, 480));
        assert_eq!(f.data.len(), 480 * 480 * 3);
    }
}

#[test]
fn non_square_input_is_stretched_to_canvas() {
    let mut seq = FrameSequence::new(64, 32, fps15()).unwrap();
    seq.add_frame(FrameRgb::filled(10, 90, Rgb8::WHITE)).unwrap();
    let f = &seq.frames()[0];
    assert_eq!((f.width, f.height), (64, 32));
}

#[test]
fn add_frames_preserves_order() {
    let mut seq = FrameSequence::new(4, 4, fps15()).unwrap();
    let colors = [Rgb8::new(1, 0, 0), Rgb8::new(2, 0, 0), Rgb8::new(3, 0, 0)];
    seq.add_frames(colors.iter().map(|&c| FrameRgb::filled(4, 4, c)))
        .unwrap();
    let firsts: Vec<u8> = seq.frames().iter().map(|f| f.data[0]).collect();
    assert_eq!(firsts, vec![1, 2, 3]);
}

#[test]
fn clear_keeps_configuration() {
    let mut seq = FrameSequence::new(32, 16, fps15()).unwrap();
    seq.add_frame(FrameRgb::filled(32, 16, Rgb8::WHITE)).unwrap();
    seq.clear();
    assert!(seq.is_empty());
    assert_eq!(seq.canvas(), Canvas::new(32, 16).unwrap());
    assert_eq!(seq.fps(), fps15());
}

#[test]
fn saving_empty_sequence_is_a_no_content_error() {
    let mut seq = FrameSequence::new(32, 32, fps15()).unwrap();
    let err = seq.encode(&SaveOpts::default()).unwrap_err();
    assert!(matches!(err, GifwrightError::Empty(_)));
}

#[test]
fn snapshot_survives_destructive_emoji_save() {
    let mut seq = FrameSequence::new(160, 160, fps15()).unwrap();
    for i in 0..20u8 {
        seq.add_frame(FrameRgb::filled(160, 160, Rgb8::new(i * 12, 0, 255 - i * 12)))
            .unwrap();
    }
    let before = seq.snapshot();
    let artifact = seq.encode(&SaveOpts::emoji()).unwrap();

    assert_eq!(before.len(), 20);
    assert_eq!(before.canvas(), Canvas::new(160, 160).unwrap());
    assert_eq!(seq.canvas(), Canvas::new(128, 128).unwrap());
    assert_eq!(seq.len(), artifact.report.frame_count);
    assert!(seq.len() <= 12);
}

#[test]
fn failed_write_leaves_frames_untouched() {
    let dir = std::path::PathBuf::from("target").join("sequence_unit");
    std::fs::create_dir_all(&dir).unwrap();
    // A regular file where the output directory should be.
    let blocker = dir.join("blocker");
    std::fs::write(&blocker, b"x").unwrap();

    let mut seq = FrameSequence::new(160, 160, fps15()).unwrap();
    for i in 0..4u8 {
        seq.add_frame(FrameRgb::filled(160, 160, Rgb8::new(i * 60, 0, 0)))
            .unwrap();
    }
    assert!(seq.save(blocker.join("out.gif"), &SaveOpts::emoji()).is_err());
    assert_eq!(seq.len(), 4);
    assert_eq!(seq.canvas(), Canvas::new(160, 160).unwrap());
}
